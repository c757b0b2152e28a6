//! Request-parameter allowance.

use super::matcher::matches;
use super::normalize::sanitize;
use super::params::ParamSet;
use super::pattern::PatternList;

/// Entries every deployment allows so the login page can render.
pub const ALWAYS_ALLOWED: [&str; 4] = [
    "module=Login",
    "module=Proxy&action=getCss",
    "module=Proxy&action=getCoreJs",
    "module=Proxy&action=getNonCoreJs",
];

/// Merge the configured entries with the built-in ones and normalize.
pub fn allowed_requests<S: AsRef<str>>(configured: &[S]) -> PatternList {
    let mut merged: Vec<&str> = configured.iter().map(|entry| entry.as_ref()).collect();
    merged.extend(ALWAYS_ALLOWED);
    sanitize(&merged)
}

/// Returns true if the request's own parameters satisfy an allowed entry.
pub fn is_request_allowed(actual: &ParamSet, allowed: &PatternList) -> bool {
    matches(actual, allowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_apply_without_configuration() {
        let allowed = allowed_requests::<&str>(&[]);
        assert!(is_request_allowed(&ParamSet::from_query("module=Login"), &allowed));
        assert!(is_request_allowed(
            &ParamSet::from_query("module=Proxy&action=getCss"),
            &allowed
        ));
        assert!(!is_request_allowed(
            &ParamSet::from_query("module=Proxy&action=getTagManagerJs"),
            &allowed
        ));
        assert!(!is_request_allowed(&ParamSet::from_query("module=CoreHome"), &allowed));
    }

    #[test]
    fn test_configured_entries_come_first() {
        let allowed = allowed_requests(&["module=API&method=Foo", " module=Login "]);
        assert_eq!(
            allowed.sources(),
            vec![
                "module=API&method=Foo",
                "module=Login",
                "module=Proxy&action=getCss",
                "module=Proxy&action=getCoreJs",
                "module=Proxy&action=getNonCoreJs",
            ]
        );
    }

    #[test]
    fn test_case_insensitive_configured_match() {
        let allowed = allowed_requests(&["module=API&method=Foo"]);
        assert!(is_request_allowed(
            &ParamSet::from_query("module=API&method=foo"),
            &allowed
        ));
    }
}
