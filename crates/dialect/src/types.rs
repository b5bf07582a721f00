//! Shared value types for building requests against the dialect.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::DialectError;

// ---------------------------------------------------------------------------
// HTTP verbs
// ---------------------------------------------------------------------------

/// The HTTP verb a request is issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    /// Returns the upper-case wire name of the verb.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpVerb {
    type Err = DialectError;

    /// Parses a verb case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpVerb::Get),
            "POST" => Ok(HttpVerb::Post),
            "PUT" => Ok(HttpVerb::Put),
            "PATCH" => Ok(HttpVerb::Patch),
            "DELETE" => Ok(HttpVerb::Delete),
            _ => Err(DialectError::UnsupportedVerb {
                verb: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Header sets
// ---------------------------------------------------------------------------

/// An ordered mapping from header name to value.
///
/// Iteration follows insertion order. Inserting a name that is already present
/// replaces its value in place, so the header keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderSet(IndexMap<String, String>);

impl HeaderSet {
    /// Creates an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Returns the value for `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// The store operation a request or a response belongs to.
///
/// Determines both which URL form is built and whether the response is
/// normalised as a single record or as a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestType {
    FindRecord,
    FindAll,
    Query,
    QueryRecord,
    FindMany,
    FindHasMany,
    FindBelongsTo,
    CreateRecord,
    UpdateRecord,
    DeleteRecord,
}

impl RequestType {
    /// Returns `true` if responses to this request carry a single record.
    pub fn is_single(self) -> bool {
        !matches!(
            self,
            RequestType::FindAll
                | RequestType::Query
                | RequestType::FindMany
                | RequestType::FindHasMany
        )
    }
}
