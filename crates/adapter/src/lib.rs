//! Request builder for the OData web-service dialect.
//!
//! Given a model name, an optional record identifier and the adapter's
//! configuration, [`RequestBuilder`] computes the resource URL and the
//! [`RequestOptions`] a transport should send. It never performs the request:
//! executing [`RequestOptions`] is the job of a [`Transport`] supplied by the
//! host. [`OdataAdapter`] wires the two together for the usual store
//! operations.
//!
//! ## URL shape
//!
//! | Input | URL |
//! |-------|-----|
//! | `person`, id `1` | `/people(1)` |
//! | `person`, id `../place/1` | `/people/..%2Fplace%2F1` |
//! | `person`, no id, fragments `["$top=5"]` | `/people?$top=5` |
//!
//! ## Update semantics
//!
//! The service does not accept `PUT`. Updates are sent as `POST` with an
//! `X-HTTP-Method: MERGE` header and an `If-Match: *` header; see
//! [`RequestBuilder::build_request_options`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | [`AdapterConfig`] and its TOML loader |
//! | [`hooks`] | Overridable type→path mapping and query-param ordering |
//! | [`builder`] | [`RequestBuilder`]: `build_url`, `url_for`, `query` |
//! | [`options`] | [`RequestOptions`] and the pre-send header hook |
//! | [`transport`] | The [`Transport`] port and [`TransportError`] |
//! | [`facade`] | [`OdataAdapter`], one method per store operation |

pub mod builder;
pub mod config;
mod encoding;
pub mod facade;
pub mod hooks;
pub mod options;
pub mod transport;

pub use builder::RequestBuilder;
pub use config::{AdapterConfig, ConfigError};
pub use facade::OdataAdapter;
pub use hooks::{PathForType, PluralizingPaths, QueryParamOrder, SortedQueryParams};
pub use options::{
    HeaderSink, Payload, PreSend, RequestInit, RequestOptions, CONTENT_TYPE_JSON, DATA_TYPE_JSON,
    HEADER_IF_MATCH, HEADER_X_HTTP_METHOD,
};
pub use transport::{Transport, TransportError};
