//! Field names of the dialect's JSON wire shape.
//!
//! These are bit-exact: the service emits and expects them verbatim.
//!
//! ```json
//! { "d": { "results": [ { "Id": 1, "Comments": { "__deferred": { "uri": "..." } } } ] } }
//! ```

use serde_json::Value;

/// Envelope field wrapping every response body.
pub const ENVELOPE: &str = "d";

/// Field inside the envelope (or inside an expanded to-many value) holding a
/// sequence of records.
pub const RESULTS: &str = "results";

/// Field marking a relationship that was not expanded inline.
pub const DEFERRED: &str = "__deferred";

/// Field inside [`DEFERRED`] carrying the relationship's URI.
pub const DEFERRED_URI: &str = "uri";

/// Primary-key field of every record.
pub const PRIMARY_KEY: &str = "Id";

/// Record field collecting relationship links, keyed by relationship name.
pub const LINKS: &str = "links";

/// Optional field of a reference object naming its concrete type.
pub const TYPE: &str = "type";

/// Attribute the service maintains itself; never sent on writes.
pub const RESERVED_ATTRIBUTE: &str = "modified";

/// Returns `true` if `value` counts as present in the dialect's payloads.
///
/// `null`, `false`, `0` and `""` are absent; every array and object, even an
/// empty one, is present.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
