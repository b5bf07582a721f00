//! Newtype names and record identifiers.
//!
//! Model, attribute and relationship names are all strings under the hood but
//! are never interchangeable: a [`RelationshipName`] is looked up in a record
//! under its PascalCase dialect key, a [`ModelName`] is pluralised into a URL
//! segment. Keeping them distinct stops one from leaking into the other's role.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DialectError;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display,
// TryFrom<String> (used by serde) and FromStr.
// ---------------------------------------------------------------------------
macro_rules! string_name {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new name, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DialectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(DialectError::EmptyName {
                    kind: stringify!($name),
                })
            }
        }

        impl std::str::FromStr for $name {
            type Err = DialectError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_name! {
    /// The host framework's name for an entity type, e.g. `"person"` or
    /// `"lineItem"`.
    ///
    /// Used verbatim as the singular payload key and pluralised for URL
    /// segments and collection payload keys.
    ModelName
}

string_name! {
    /// The host framework's camelCase name for a declared attribute,
    /// e.g. `"fullName"`.
    AttributeName
}

string_name! {
    /// The host framework's camelCase name for a declared relationship,
    /// e.g. `"modifiedBy"`.
    ///
    /// Also the key under which the relationship appears in the normalised
    /// relationship map and in a record's `links` collection.
    RelationshipName
}

// ---------------------------------------------------------------------------
// Record identifiers
// ---------------------------------------------------------------------------

/// Identifies a single record on the remote service.
///
/// The dialect formats numeric and textual identifiers differently: numeric
/// ones go in parentheses after the entity path (`/people(1)`), textual ones
/// are percent-encoded into their own path segment (`/people/abc`). A
/// [`RecordId::Text`] whose content reads as a number counts as numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// An integer identifier as assigned by the service.
    Number(i64),
    /// Any other identifier, kept exactly as received.
    Text(String),
}

impl RecordId {
    /// Returns `true` if the identifier reads as a finite number.
    ///
    /// `0` is numeric. Surrounding whitespace is ignored; the empty string is
    /// not numeric.
    pub fn is_numeric(&self) -> bool {
        match self {
            RecordId::Number(_) => true,
            RecordId::Text(text) => is_numeric_text(text),
        }
    }

    /// Returns `true` for an empty textual identifier.
    ///
    /// The URL builder treats an empty identifier as if none was supplied.
    pub fn is_empty(&self) -> bool {
        matches!(self, RecordId::Text(text) if text.is_empty())
    }

    /// Returns the identifier as text, without any encoding applied.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RecordId::Number(n) => Cow::Owned(n.to_string()),
            RecordId::Text(text) => Cow::Borrowed(text),
        }
    }

    /// Converts a JSON value taken from a payload into an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::InvalidIdentifier`] for anything other than a
    /// string or a number.
    pub fn from_json(value: &Value) -> Result<Self, DialectError> {
        match value {
            Value::String(text) => Ok(RecordId::Text(text.clone())),
            Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => RecordId::Number(i),
                None => RecordId::Text(n.to_string()),
            }),
            other => Err(DialectError::InvalidIdentifier {
                found: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

fn is_numeric_text(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_is_numeric() {
        assert!(RecordId::Number(0).is_numeric());
        assert!(RecordId::from("0").is_numeric());
    }

    #[test]
    fn text_identifiers_that_read_as_numbers_are_numeric() {
        assert!(RecordId::from("42").is_numeric());
        assert!(RecordId::from(" 7 ").is_numeric());
        assert!(RecordId::from("1.5").is_numeric());
        assert!(!RecordId::from("abc").is_numeric());
        assert!(!RecordId::from("../place/1").is_numeric());
        assert!(!RecordId::from("").is_numeric());
        assert!(!RecordId::from("inf").is_numeric());
        assert!(!RecordId::from("Infinity").is_numeric());
        assert!(!RecordId::from("0x10").is_numeric());
    }

    #[test]
    fn from_json_accepts_strings_and_numbers_only() {
        assert_eq!(RecordId::from_json(&json!(10)).unwrap(), RecordId::Number(10));
        assert_eq!(
            RecordId::from_json(&json!("a-1")).unwrap(),
            RecordId::Text("a-1".into())
        );
        assert_eq!(
            RecordId::from_json(&json!(2.5)).unwrap(),
            RecordId::Text("2.5".into())
        );
        assert!(matches!(
            RecordId::from_json(&json!({"Id": 1})),
            Err(DialectError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(ModelName::new("").is_none());
        assert_eq!(
            "".parse::<RelationshipName>(),
            Err(DialectError::EmptyName {
                kind: "RelationshipName"
            })
        );
        let parsed: Result<ModelName, _> = serde_json::from_value(json!(""));
        assert!(parsed.is_err());
    }
}
