//! Domain vocabulary for the OData web-service dialect.
//!
//! This crate contains every identifier, shared value type, schema descriptor
//! and naming rule used by the URL builder (`adapter`) and the payload
//! normaliser (`serializer`). Those crates compute URLs and reshape payloads;
//! the words they use to do it live here.
//!
//! ## Architectural Layer
//!
//! **Domain vocabulary.** This crate has no I/O dependencies. It never talks to
//! a transport and never owns process-wide configuration.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype names (`ModelName`, `RelationshipName`, ...) and [`RecordId`] |
//! | [`types`] | Shared value types (`HttpVerb`, `HeaderSet`, `RequestType`) |
//! | [`schema`] | Read-only entity schema descriptors |
//! | [`inflector`] | English pluralisation and capitalisation |
//! | [`wire`] | Bit-exact field names of the dialect's JSON envelope |
//! | [`errors`] | Conversion errors raised at the crate's edges |

pub mod errors;
pub mod identifiers;
pub mod inflector;
pub mod schema;
pub mod types;
pub mod wire;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::DialectError;
pub use identifiers::{AttributeName, ModelName, RecordId, RelationshipName};
pub use inflector::{capitalize, pluralize};
pub use schema::{AttributeMeta, EntitySchema, RelationshipKind, RelationshipMeta, SchemaRegistry};
pub use types::{HeaderSet, HttpVerb, RequestType};
