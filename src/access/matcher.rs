//! Parameter-set matching.
//!
//! # Responsibilities
//! - Decide whether a request satisfies any configured pattern
//!
//! # Design Decisions
//! - OR across patterns, AND within a pattern
//! - Values compare case-insensitively, names exactly
//! - A missing parameter fails only the pattern that names it
//! - A request parameter with an empty value counts as missing
//! - Empty list never matches

use super::params::ParamSet;
use super::pattern::{Pattern, PatternList};

/// Returns true if `actual` satisfies every constraint of at least one
/// pattern in `allowed`.
pub fn matches(actual: &ParamSet, allowed: &PatternList) -> bool {
    for pattern in allowed {
        if pattern_matches(actual, pattern) {
            tracing::trace!(pattern = %pattern, "Allow-list pattern matched");
            return true;
        }
    }
    false
}

/// Returns true if every parameter of `pattern` is present in `actual` with
/// a non-empty, case-insensitively equal value.
pub fn pattern_matches(actual: &ParamSet, pattern: &Pattern) -> bool {
    for (name, expected) in pattern.params().iter() {
        match actual.get(name).filter(|v| !v.is_empty()) {
            Some(value) if values_equal(value, expected) => {}
            _ => return false,
        }
    }
    true
}

fn values_equal(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
