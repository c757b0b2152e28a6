//! Access error definitions.

use thiserror::Error;

/// Terminal access failures surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Anonymous request matched no allow-list entry.
    #[error("you must be logged in")]
    LoginRequired,
}

/// Reasons a referrer cannot take part in the allow-list check.
///
/// These are recovered locally: the referrer path is skipped and the
/// request's own parameters decide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferrerError {
    #[error("no referrer header")]
    Missing,

    #[error("unparseable referrer: {0}")]
    Unparseable(#[from] url::ParseError),

    #[error("referrer has no host")]
    NoHost,

    #[error("referrer has no query")]
    NoQuery,
}
