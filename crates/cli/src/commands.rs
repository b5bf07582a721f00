//! Sub-command implementations.
//!
//! Each command is a pure function from parsed arguments to the JSON (or
//! text) printed on stdout, so it can be tested without spawning the binary.

use adapter::{RequestBuilder, RequestInit, SortedQueryParams};
use anyhow::{bail, Context, Result};
use dialect::{EntitySchema, HttpVerb, ModelName, RecordId, RequestType, SchemaRegistry};
use serde_json::Value;
use serializer::{JsonApiNormalizer, ResponseContext, ResponseNormalizer};

/// Reads an identifier typed on the command line: integers become numeric
/// identifiers, anything else stays text.
pub fn parse_record_id(raw: &str) -> Result<RecordId, std::convert::Infallible> {
    Ok(match raw.parse::<i64>() {
        Ok(n) => RecordId::Number(n),
        Err(_) => RecordId::Text(raw.to_string()),
    })
}

/// Reads a request type by its camelCase name, e.g. `findRecord`.
pub fn parse_request_type(raw: &str) -> Result<RequestType> {
    serde_json::from_value(Value::String(raw.to_string()))
        .with_context(|| format!("Unknown request type '{raw}'"))
}

pub fn url(
    builder: &RequestBuilder,
    model: &ModelName,
    id: Option<&RecordId>,
    request_type: Option<RequestType>,
) -> String {
    match request_type {
        Some(request_type) => builder.url_for(request_type, model, id),
        None => builder.build_url(Some(model), id),
    }
}

pub fn query(builder: &RequestBuilder, model: &ModelName, params: Value, sorted: bool) -> Result<Value> {
    let Value::Object(params) = params else {
        bail!("Query parameters must be a JSON object");
    };
    let options = if sorted {
        builder
            .clone()
            .with_query_param_order(SortedQueryParams)
            .query(model, &params)
    } else {
        builder.query(model, &params)
    };
    serde_json::to_value(options).context("Failed to render request options")
}

pub fn options(builder: &RequestBuilder, url: String, verb: HttpVerb, data: Option<Value>) -> Result<Value> {
    let init = match data {
        Some(data) => RequestInit::with_data(data),
        None => RequestInit::default(),
    };
    let options = builder.build_request_options(url, verb, init);
    serde_json::to_value(options).context("Failed to render request options")
}

/// Normalises a captured response body for `model`.
///
/// `model` must be present in `registry`.
pub fn normalize(
    registry: SchemaRegistry,
    model: &ModelName,
    request_type: RequestType,
    id: Option<&RecordId>,
    payload: Value,
) -> Result<Value> {
    let schema: EntitySchema = registry
        .get(model)
        .cloned()
        .with_context(|| format!("No schema declared for model '{model}'"))?;

    let normalizer = ResponseNormalizer::new(JsonApiNormalizer::new(registry));
    let mut ctx = ResponseContext::new(&schema, request_type);
    if let Some(id) = id {
        ctx = ctx.with_id(id);
    }

    let document = normalizer.normalize_response(&ctx, payload);
    serde_json::to_value(document).context("Failed to render normalised document")
}
