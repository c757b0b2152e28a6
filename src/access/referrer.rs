//! Referrer-based allowance.
//!
//! # Responsibilities
//! - Sanitize the raw `Referer` header (attacker controlled)
//! - Require the referrer to point back at the platform's own host
//! - Match the referrer's query against the allowed referrers
//!
//! # Design Decisions
//! - Host comparison is exact and case-insensitive
//! - Any parse problem means "not applicable", never an error
//! - The query is decoded exactly once; an escaped `&amp;` stays part of
//!   the parameter name and never separates parameters

use url::Url;

use super::error::ReferrerError;
use super::matcher::matches;
use super::params::ParamSet;
use super::pattern::PatternList;

/// A referrer reduced to the parts the allow-list check needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReferrer {
    pub host: String,
    pub query: String,
}

/// Strip surrounding whitespace and control characters from a raw header.
pub fn sanitize_referrer(raw: &str) -> String {
    raw.trim().chars().filter(|c| !c.is_control()).collect()
}

/// Parse a raw referrer into host and query.
pub fn parse_referrer(raw: Option<&str>) -> Result<ParsedReferrer, ReferrerError> {
    let raw = raw.ok_or(ReferrerError::Missing)?;
    let url = Url::parse(&sanitize_referrer(raw))?;

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(ReferrerError::NoHost)?
        .to_string();
    let query = url
        .query()
        .filter(|q| !q.is_empty())
        .ok_or(ReferrerError::NoQuery)?
        .to_string();

    Ok(ParsedReferrer { host, query })
}

/// Returns true if the referrer is same-host and its query satisfies one of
/// the allowed referrer patterns.
pub fn is_referrer_allowed(
    referrer: Option<&str>,
    platform_host: &str,
    allowed_referrers: &PatternList,
) -> bool {
    if allowed_referrers.is_empty() {
        return false;
    }

    let parsed = match parse_referrer(referrer) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(reason = %e, "Referrer not applicable");
            return false;
        }
    };

    if !parsed.host.eq_ignore_ascii_case(platform_host) {
        tracing::debug!(
            referrer_host = %parsed.host,
            platform_host = %platform_host,
            "Referrer host is not the platform host"
        );
        return false;
    }

    let params = ParamSet::from_query(&parsed.query);
    matches(&params, allowed_referrers)
}
