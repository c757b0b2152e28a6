//! Allow-list patterns.

use std::fmt;

use super::params::ParamSet;

/// One allow-list entry: every parameter it names must be present in a
/// request with an equal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    params: ParamSet,
}

impl Pattern {
    /// Decode a canonical `key1=value1&key2=value2` entry.
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let params = ParamSet::from_query(&source);
        Self { source, params }
    }

    /// The entry as it was configured (trimmed).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Ordered allow-list. Evaluation stops at the first matching entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }

    /// Source strings in evaluation order.
    pub fn sources(&self) -> Vec<&str> {
        self.patterns.iter().map(Pattern::source).collect()
    }
}

impl<'a> IntoIterator for &'a PatternList {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
