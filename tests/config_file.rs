//! The sample configuration shipped with the repository stays loadable.

use std::path::Path;

use anon_gate::access::AccessRules;
use anon_gate::config::loader::load_config;
use anon_gate::config::validation::{platform_host, trusted_proxies};

#[test]
fn test_sample_config_loads() {
    let config = load_config(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/anon-gate.toml")))
        .expect("sample config should be valid");

    let host = platform_host(&config.platform).unwrap();
    assert_eq!(host, "analytics.example");

    let rules = AccessRules::from_config(&config.access, &host);
    assert_eq!(rules.allowed_requests.len(), 6);
    assert_eq!(rules.allowed_referrers.len(), 1);
    assert!(rules.redirect_unallowed_to.is_none());

    let trusted = trusted_proxies(&config.auth).unwrap();
    assert_eq!(trusted, vec!["127.0.0.1".parse::<std::net::IpAddr>().unwrap()]);
}
