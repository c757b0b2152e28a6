//! Query parameter sets.
//!
//! # Responsibilities
//! - Decode `key=value&key2=value2` strings into a lookup map
//!
//! # Design Decisions
//! - Order of pairs is irrelevant; a repeated key keeps its last value
//! - Lookups return `Option` so an absent key is an ordinary outcome

use std::collections::HashMap;

/// An immutable mapping from parameter name to parameter value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    params: HashMap<String, String>,
}

impl ParamSet {
    /// Decode a URL query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        Self::from_pairs(
            url::form_urlencoded::parse(query.as_bytes())
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, value)| (name.into_owned(), value.into_owned())),
        )
    }

    /// Build a set from name/value pairs. Later pairs overwrite earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a parameter value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
