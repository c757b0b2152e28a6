//! Allow-list normalization.
//!
//! # Responsibilities
//! - Trim raw configuration entries and drop the empty ones
//! - Remove exact duplicates, keeping first-seen order
//! - Decode each surviving entry into a `Pattern`
//!
//! # Design Decisions
//! - Never fails: malformed input degrades to fewer (or no) patterns
//! - An entry that decodes to no parameters is dropped, since it would
//!   match every request

use std::collections::HashSet;

use super::pattern::{Pattern, PatternList};

/// Normalize raw allow-list entries into a `PatternList`.
pub fn sanitize<S: AsRef<str>>(raw: &[S]) -> PatternList {
    let mut seen = HashSet::new();
    let mut patterns = Vec::new();

    for entry in raw {
        let entry = entry.as_ref().trim();
        if entry.is_empty() || !seen.insert(entry) {
            continue;
        }

        let pattern = Pattern::parse(entry);
        if pattern.params().is_empty() {
            tracing::warn!(
                entry = %entry,
                "Ignoring allow-list entry without parameters; \
                 kept, it would have allowed every anonymous request"
            );
            continue;
        }
        patterns.push(pattern);
    }

    PatternList::new(patterns)
}
