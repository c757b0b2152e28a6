//! Validated access rules.
//!
//! Built once per configuration snapshot from the raw `[access]` table and
//! the platform URL, then shared read-only by every request.

use url::Url;

use super::normalize::sanitize;
use super::pattern::PatternList;
use super::request::allowed_requests;
use crate::config::schema::AccessConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRules {
    /// Configured entries followed by the built-in ones.
    pub allowed_requests: PatternList,
    pub allowed_referrers: PatternList,
    /// Present only when the configured target is a valid absolute URL.
    pub redirect_unallowed_to: Option<Url>,
    /// Host of the platform's own base URL, lowercased.
    pub platform_host: String,
}

impl AccessRules {
    pub fn from_config(access: &AccessConfig, platform_host: &str) -> Self {
        Self {
            allowed_requests: allowed_requests(&access.allowed_requests),
            allowed_referrers: sanitize(&access.allowed_referrers),
            redirect_unallowed_to: access
                .redirect_unallowed_to
                .as_deref()
                .and_then(parse_redirect_target),
            platform_host: platform_host.to_ascii_lowercase(),
        }
    }
}

/// Accept a redirect target only if it is an absolute URL with a host.
pub fn parse_redirect_target(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) if url.has_host() => Some(url),
        Ok(_) => {
            tracing::warn!(redirect = %raw, "Redirect target has no host, redirect disabled");
            None
        }
        Err(e) => {
            tracing::warn!(redirect = %raw, error = %e, "Invalid redirect target, redirect disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let access = AccessConfig {
            allowed_requests: vec!["module=API&method=Foo".into(), "".into()],
            allowed_referrers: vec![" module=CoreHome ".into(), "module=CoreHome".into()],
            redirect_unallowed_to: Some("https://www.example/login".into()),
        };
        let rules = AccessRules::from_config(&access, "Analytics.Example");

        assert_eq!(rules.allowed_requests.len(), 5);
        assert_eq!(rules.allowed_referrers.sources(), vec!["module=CoreHome"]);
        assert_eq!(
            rules.redirect_unallowed_to.as_ref().map(Url::as_str),
            Some("https://www.example/login")
        );
        assert_eq!(rules.platform_host, "analytics.example");
    }

    #[test]
    fn test_redirect_target_validation() {
        assert!(parse_redirect_target("https://www.example/login").is_some());
        assert!(parse_redirect_target("http://127.0.0.1:8080/").is_some());
        assert!(parse_redirect_target("/login").is_none());
        assert!(parse_redirect_target("not a url").is_none());
        assert!(parse_redirect_target("mailto:admin@example.org").is_none());
        assert!(parse_redirect_target("").is_none());
    }
}
