//! Mapping from host names to dialect keys.
//!
//! The service names every attribute and relationship in PascalCase; the host
//! uses camelCase. Links are keyed by the host's own relationship name.

use dialect::{capitalize, wire, AttributeName, RelationshipName};

/// Field holding a record's identifier: `Id`.
pub fn primary_key() -> &'static str {
    wire::PRIMARY_KEY
}

/// `fullName` → `FullName`.
pub fn key_for_attribute(name: &AttributeName) -> String {
    capitalize(name.as_str())
}

/// `modifiedBy` → `ModifiedBy`.
pub fn key_for_relationship(name: &RelationshipName) -> String {
    capitalize(name.as_str())
}

/// Key of a relationship inside a record's `links` collection.
pub fn key_for_link(name: &RelationshipName) -> String {
    name.as_str().to_string()
}
