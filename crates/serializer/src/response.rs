//! Envelope unwrapping and response dispatch.
//!
//! The service wraps every body in a `d` envelope; collections sit one level
//! further in under `results`. [`unwrap_single`] and [`unwrap_collection`]
//! strip those layers and re-key the payload under the model name (singular
//! for one record, pluralised for many). Payloads without the envelope pass
//! through untouched, so unwrapping twice changes nothing.
//!
//! [`ResponseNormalizer`] applies the right unwrapping for a request type and
//! then delegates to a [`GenericNormalizer`].

use dialect::{pluralize, wire, EntitySchema, ModelName, RecordId, RequestType};
use serde_json::{Map, Value};

/// What the caller knows about the request a payload answers.
#[derive(Debug, Clone, Copy)]
pub struct ResponseContext<'a> {
    /// Schema of the requested model.
    pub schema: &'a EntitySchema,
    /// Identifier of the requested record, for single-record requests.
    pub id: Option<&'a RecordId>,
    pub request_type: RequestType,
}

impl<'a> ResponseContext<'a> {
    pub fn new(schema: &'a EntitySchema, request_type: RequestType) -> Self {
        Self {
            schema,
            id: None,
            request_type,
        }
    }

    pub fn with_id(mut self, id: &'a RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn model(&self) -> &'a ModelName {
        &self.schema.model
    }
}

/// The normaliser that runs after the dialect layers have been removed.
///
/// It receives a payload keyed by model name (`{"post": {...}}` or
/// `{"posts": [...]}`) plus any sideloaded keys the service returned.
pub trait GenericNormalizer {
    type Output;

    fn normalize(&self, ctx: &ResponseContext<'_>, payload: Value, is_single: bool) -> Self::Output;
}

// ---------------------------------------------------------------------------
// Unwrapping
// ---------------------------------------------------------------------------

/// `{"d": record}` → `{model: record}`.
///
/// Returns `payload` unchanged when `d` is missing or absent.
pub fn unwrap_single(model: &ModelName, payload: Value) -> Value {
    let Value::Object(mut map) = payload else {
        return payload;
    };
    if !map.get(wire::ENVELOPE).is_some_and(wire::is_present) {
        return Value::Object(map);
    }

    let record = map.remove(wire::ENVELOPE).unwrap_or_default();
    let mut unwrapped = Map::new();
    unwrapped.insert(model.as_str().to_string(), record);
    Value::Object(unwrapped)
}

/// `{"d": {"results": [...]}}` → `{pluralize(model): [...]}`.
///
/// Returns `payload` unchanged when `d.results` is missing or absent.
pub fn unwrap_collection(model: &ModelName, payload: Value) -> Value {
    let Value::Object(mut map) = payload else {
        return payload;
    };
    let has_results = map
        .get(wire::ENVELOPE)
        .and_then(|envelope| envelope.get(wire::RESULTS))
        .is_some_and(wire::is_present);
    if !has_results {
        return Value::Object(map);
    }

    let results = match map.remove(wire::ENVELOPE) {
        Some(Value::Object(mut envelope)) => envelope.remove(wire::RESULTS).unwrap_or_default(),
        _ => Value::Null,
    };
    let mut unwrapped = Map::new();
    unwrapped.insert(pluralize(model.as_str()), results);
    Value::Object(unwrapped)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Unwraps dialect payloads and hands them to a [`GenericNormalizer`].
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer<G> {
    generic: G,
}

impl<G: GenericNormalizer> ResponseNormalizer<G> {
    pub fn new(generic: G) -> Self {
        Self { generic }
    }

    pub fn generic(&self) -> &G {
        &self.generic
    }

    /// Normalises the answer to a single-record request.
    pub fn normalize_single(&self, ctx: &ResponseContext<'_>, payload: Value) -> G::Output {
        let payload = unwrap_single(ctx.model(), payload);
        self.generic.normalize(ctx, payload, true)
    }

    /// Normalises the answer to a collection request.
    pub fn normalize_collection(&self, ctx: &ResponseContext<'_>, payload: Value) -> G::Output {
        let payload = unwrap_collection(ctx.model(), payload);
        self.generic.normalize(ctx, payload, false)
    }

    /// Picks single or collection handling from `ctx.request_type`.
    ///
    /// `findBelongsTo` fetches one related record and is treated as single.
    pub fn normalize_response(&self, ctx: &ResponseContext<'_>, payload: Value) -> G::Output {
        tracing::debug!(
            model = %ctx.model(),
            request_type = ?ctx.request_type,
            "normalising response"
        );
        if ctx.request_type.is_single() {
            self.normalize_single(ctx, payload)
        } else {
            self.normalize_collection(ctx, payload)
        }
    }
}
