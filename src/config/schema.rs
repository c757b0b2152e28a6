//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration for the access gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// The analytics platform the gate protects.
    pub platform: PlatformConfig,

    /// Where allowed requests are forwarded.
    pub upstream: UpstreamConfig,

    /// How callers are identified.
    pub auth: AuthConfig,

    /// Anonymous access allow-lists.
    pub access: AccessConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Platform settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Public base URL of the platform. Its host is the only host accepted
    /// in referrers.
    pub url: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost/".to_string(),
        }
    }
}

/// Upstream platform backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Backend address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Caller identification.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Header set by the trusted authentication layer in front of the gate.
    /// A request without it (or with an empty value) is anonymous.
    pub identity_header: String,

    /// Peer IP addresses allowed to set the identity header. The header is
    /// removed from requests arriving from any other peer.
    pub trusted_proxies: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            identity_header: "x-authenticated-user".to_string(),
            trusted_proxies: Vec::new(),
        }
    }
}

/// Anonymous access configuration.
///
/// Every field is optional and leniently typed: a value of the wrong shape
/// is treated as absent instead of failing the whole file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AccessConfig {
    /// Query-string patterns anonymous requests may match,
    /// e.g. `"module=API&method=Som.eMethod"`.
    #[serde(deserialize_with = "lenient_string_list")]
    pub allowed_requests: Vec<String>,

    /// Query-string patterns a same-host referrer may match.
    #[serde(deserialize_with = "lenient_string_list")]
    pub allowed_referrers: Vec<String>,

    /// Where to send rejected anonymous requests instead of failing them.
    #[serde(deserialize_with = "lenient_string")]
    pub redirect_unallowed_to: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientList {
    List(Vec<LenientItem>),
    Other(serde::de::IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientItem {
    Str(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match LenientList::deserialize(deserializer)? {
        LenientList::List(items) => {
            let total = items.len();
            let strings: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    LenientItem::Str(s) => Some(s),
                    LenientItem::Other(_) => None,
                })
                .collect();
            if strings.len() != total {
                tracing::warn!(
                    skipped = total - strings.len(),
                    "Ignoring non-string allow-list entries"
                );
            }
            Ok(strings)
        }
        LenientList::Other(_) => {
            tracing::warn!("Allow-list is not a list, treating it as empty");
            Ok(Vec::new())
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match LenientItem::deserialize(deserializer)? {
        LenientItem::Str(s) => Ok(Some(s)),
        LenientItem::Other(_) => {
            tracing::warn!("redirect_unallowed_to is not a string, ignoring it");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: GateConfig = toml::from_str("").unwrap();
        assert_eq!(config.access, AccessConfig::default());
        assert_eq!(config.auth.identity_header, "x-authenticated-user");
        assert!(config.auth.trusted_proxies.is_empty());
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_access_section() {
        let config: GateConfig = toml::from_str(
            r#"
            [platform]
            url = "https://analytics.example/"

            [access]
            allowed_requests = ["module=API&method=Som.eMethod", " module=Widgetize "]
            allowed_referrers = ["module=CoreHome"]
            redirect_unallowed_to = "https://www.example/login"
            "#,
        )
        .unwrap();

        assert_eq!(config.platform.url, "https://analytics.example/");
        assert_eq!(
            config.access.allowed_requests,
            vec!["module=API&method=Som.eMethod", " module=Widgetize "]
        );
        assert_eq!(config.access.allowed_referrers, vec!["module=CoreHome"]);
        assert_eq!(
            config.access.redirect_unallowed_to.as_deref(),
            Some("https://www.example/login")
        );
    }

    #[test]
    fn test_wrong_shapes_degrade_to_empty() {
        let config: GateConfig = toml::from_str(
            r#"
            [access]
            allowed_requests = "module=API"
            allowed_referrers = ["module=CoreHome", 42, true]
            redirect_unallowed_to = 7
            "#,
        )
        .unwrap();

        assert!(config.access.allowed_requests.is_empty());
        assert_eq!(config.access.allowed_referrers, vec!["module=CoreHome"]);
        assert_eq!(config.access.redirect_unallowed_to, None);
    }
}
