//! Payload normaliser for the OData web-service dialect.
//!
//! Responses from the service arrive wrapped in a `d` envelope, collections
//! nested one level deeper under `results`, and relationships either expanded
//! inline or stubbed out as `__deferred` links. This crate unwraps and
//! re-keys those payloads into the shape a generic normaliser expects, and
//! extracts relationship references in declaration order.
//!
//! ```
//! use dialect::ModelName;
//! use serde_json::json;
//! use serializer::response::unwrap_collection;
//!
//! let post = ModelName::new("post").unwrap();
//! let payload = json!({ "d": { "results": [{ "Id": 1 }] } });
//! assert_eq!(unwrap_collection(&post, payload), json!({ "posts": [{ "Id": 1 }] }));
//! ```
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`keys`] | Host name → dialect key mapping |
//! | [`response`] | [`ResponseNormalizer`] and the [`GenericNormalizer`] port |
//! | [`relationships`] | [`extract_relationships`] and the [`RelationshipExtractor`] hook |
//! | [`document`] | [`JsonApiNormalizer`], the default generic normaliser |
//! | [`attributes`] | Write-side serialisation of changed attributes |

pub mod attributes;
pub mod document;
pub mod keys;
pub mod relationships;
pub mod response;

pub use attributes::{serialize, serialize_attribute, SerializeOptions, Snapshot};
pub use document::{Document, JsonApiNormalizer, PrimaryData, Resource};
pub use keys::{key_for_attribute, key_for_link, key_for_relationship, primary_key};
pub use relationships::{
    extract_relationships, DefaultExtractor, PolymorphicContext, Relationship, RelationshipData,
    RelationshipExtractor, RelationshipLinks, RelationshipMap, ResourceIdentifier,
};
pub use response::{GenericNormalizer, ResponseContext, ResponseNormalizer};
