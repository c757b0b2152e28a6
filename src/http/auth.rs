//! Caller identification.
//!
//! The gate does not authenticate anyone itself. A trusted layer in front
//! of it (SSO proxy, session service) marks authenticated requests with an
//! identity header; everything else is anonymous.
//!
//! # Design Decisions
//! - The identity header is honoured only from configured trusted peers
//! - From any other peer it is removed before the decision, so it is
//!   neither believed nor forwarded upstream

use std::net::IpAddr;

use axum::http::{HeaderMap, HeaderName};

/// Answers whether a request comes from an anonymous caller.
pub trait Authenticator: Send + Sync + std::fmt::Debug {
    fn is_anonymous(&self, headers: &HeaderMap) -> bool;

    /// Remove identity claims that `peer` may not make. Runs before
    /// `is_anonymous` on every inbound request.
    fn strip_untrusted(&self, _peer: Option<IpAddr>, _headers: &mut HeaderMap) {}
}

/// Treats a request as authenticated when the identity header is present,
/// non-empty, and was set by a trusted proxy.
#[derive(Debug, Clone)]
pub struct HeaderAuthenticator {
    header: HeaderName,
    trusted_proxies: Vec<IpAddr>,
}

impl HeaderAuthenticator {
    pub fn new(header: HeaderName, trusted_proxies: Vec<IpAddr>) -> Self {
        Self {
            header,
            trusted_proxies: trusted_proxies.iter().map(IpAddr::to_canonical).collect(),
        }
    }

    fn is_trusted(&self, peer: Option<IpAddr>) -> bool {
        peer.is_some_and(|ip| self.trusted_proxies.contains(&ip.to_canonical()))
    }
}

impl Authenticator for HeaderAuthenticator {
    fn is_anonymous(&self, headers: &HeaderMap) -> bool {
        !headers
            .get(&self.header)
            .map(|v| !v.as_bytes().iter().all(u8::is_ascii_whitespace))
            .unwrap_or(false)
    }

    fn strip_untrusted(&self, peer: Option<IpAddr>, headers: &mut HeaderMap) {
        if self.is_trusted(peer) {
            return;
        }
        if headers.remove(&self.header).is_some() {
            tracing::warn!(
                peer = ?peer,
                header = %self.header,
                "Dropped identity header from untrusted peer"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const PROXY: &str = "10.0.0.1";

    fn authenticator() -> HeaderAuthenticator {
        HeaderAuthenticator::new(
            HeaderName::from_static("x-authenticated-user"),
            vec![PROXY.parse().unwrap()],
        )
    }

    fn identified(user: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("X-Authenticated-User", HeaderValue::from_static(user));
        headers
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert!(authenticator().is_anonymous(&HeaderMap::new()));
    }

    #[test]
    fn test_blank_header_is_anonymous() {
        assert!(authenticator().is_anonymous(&identified("  ")));
    }

    #[test]
    fn test_identity_header_authenticates() {
        assert!(!authenticator().is_anonymous(&identified("alice")));
    }

    #[test]
    fn test_trusted_peer_keeps_identity() {
        let mut headers = identified("alice");
        authenticator().strip_untrusted(Some(PROXY.parse().unwrap()), &mut headers);
        assert!(!authenticator().is_anonymous(&headers));

        let mut headers = identified("alice");
        authenticator().strip_untrusted(Some("::ffff:10.0.0.1".parse().unwrap()), &mut headers);
        assert!(!authenticator().is_anonymous(&headers));
    }

    #[test]
    fn test_untrusted_peer_loses_identity() {
        let mut headers = identified("anyone");
        headers.append("x-authenticated-user", HeaderValue::from_static("admin"));
        authenticator().strip_untrusted(Some("203.0.113.9".parse().unwrap()), &mut headers);
        assert!(headers.get("x-authenticated-user").is_none());
        assert!(authenticator().is_anonymous(&headers));
    }

    #[test]
    fn test_unknown_peer_loses_identity() {
        let mut headers = identified("anyone");
        authenticator().strip_untrusted(None, &mut headers);
        assert!(authenticator().is_anonymous(&headers));
    }

    #[test]
    fn test_no_trusted_proxies_trusts_nobody() {
        let auth = HeaderAuthenticator::new(HeaderName::from_static("x-authenticated-user"), vec![]);
        let mut headers = identified("alice");
        auth.strip_untrusted(Some("127.0.0.1".parse().unwrap()), &mut headers);
        assert!(auth.is_anonymous(&headers));
    }
}
