//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Platform URL must be absolute with a host
//! - Upstream and listener addresses must be socket addresses
//! - Value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Allow-list problems are not errors here; they degrade at rule build time

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

use crate::config::schema::{AuthConfig, GateConfig, PlatformConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("platform.url {url:?} is not a valid URL: {reason}")]
    PlatformUrl { url: String, reason: String },

    #[error("platform.url {0:?} has no host")]
    PlatformHost(String),

    #[error("{field} {value:?} is not a socket address")]
    Address { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("auth.identity_header {0:?} is not a valid header name")]
    IdentityHeader(String),

    #[error("auth.trusted_proxies entry {0:?} is not an IP address")]
    TrustedProxy(String),
}

/// Host component of the platform base URL.
pub fn platform_host(platform: &PlatformConfig) -> Result<String, ValidationError> {
    let url = Url::parse(&platform.url).map_err(|e| ValidationError::PlatformUrl {
        url: platform.url.clone(),
        reason: e.to_string(),
    })?;

    url.host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ValidationError::PlatformHost(platform.url.clone()))
}

/// Peers whose identity header is trusted.
pub fn trusted_proxies(auth: &AuthConfig) -> Result<Vec<IpAddr>, ValidationError> {
    auth.trusted_proxies
        .iter()
        .map(|entry| {
            entry
                .trim()
                .parse()
                .map_err(|_| ValidationError::TrustedProxy(entry.clone()))
        })
        .collect()
}

pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = platform_host(&config.platform) {
        errors.push(e);
    }

    for (field, value) in [
        ("listener.bind_address", &config.listener.bind_address),
        ("upstream.address", &config.upstream.address),
    ] {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::Address {
                field,
                value: value.clone(),
            });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if axum::http::HeaderName::from_bytes(config.auth.identity_header.as_bytes()).is_err() {
        errors.push(ValidationError::IdentityHeader(
            config.auth.identity_header.clone(),
        ));
    }

    errors.extend(
        config
            .auth
            .trusted_proxies
            .iter()
            .filter(|entry| entry.trim().parse::<IpAddr>().is_err())
            .map(|entry| ValidationError::TrustedProxy(entry.clone())),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
