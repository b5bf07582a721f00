//! The default [`GenericNormalizer`]: a JSON:API-style document.
//!
//! ```json
//! {
//!   "data": { "id": "1", "type": "post", "attributes": { ... }, "relationships": { ... } },
//!   "included": [ ... ],
//!   "meta": { ... }
//! }
//! ```
//!
//! The payload handed in is already keyed by model name. Keys naming the
//! requested model (singular or plural) become primary data, keys naming any
//! other registered model become `included`, and `meta` passes through.

use dialect::{pluralize, EntitySchema, ModelName, SchemaRegistry};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::keys::{key_for_attribute, primary_key};
use crate::relationships::{
    coerce_id, extract_relationships, DefaultExtractor, RelationshipExtractor, RelationshipMap,
};
use crate::response::{GenericNormalizer, ResponseContext};

/// One normalised record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub model: ModelName,
    /// Declared attributes present in the record, keyed by host name.
    pub attributes: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub relationships: RelationshipMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    /// Answer to a single-record request; `None` when the payload held none.
    Single(Option<Resource>),
    Collection(Vec<Resource>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

// ---------------------------------------------------------------------------

/// Builds [`Document`]s from re-keyed payloads.
///
/// Sideloaded records are only recognised for models present in the
/// registry; the requested model is always recognised through its context.
#[derive(Debug, Clone, Default)]
pub struct JsonApiNormalizer<E = DefaultExtractor> {
    registry: SchemaRegistry,
    extractor: E,
}

impl JsonApiNormalizer<DefaultExtractor> {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            registry,
            extractor: DefaultExtractor,
        }
    }
}

impl<E: RelationshipExtractor> JsonApiNormalizer<E> {
    /// Replaces the relationship extractor.
    pub fn with_extractor<X: RelationshipExtractor>(self, extractor: X) -> JsonApiNormalizer<X> {
        JsonApiNormalizer {
            registry: self.registry,
            extractor,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Normalises one raw record. Returns `None` for non-objects and records
    /// without an identifier.
    pub fn normalize_record(&self, schema: &EntitySchema, record: Value) -> Option<Resource> {
        let Value::Object(mut record) = record else {
            tracing::warn!(model = %schema.model, "skipping non-object record");
            return None;
        };
        let Some(id) = record.get(primary_key()).and_then(coerce_id) else {
            tracing::warn!(model = %schema.model, "skipping record without identifier");
            return None;
        };

        let relationships = extract_relationships(&self.extractor, schema, &mut record);
        let attributes = schema
            .each_attribute()
            .filter_map(|meta| {
                record
                    .get(&key_for_attribute(&meta.name))
                    .map(|value| (meta.name.to_string(), value.clone()))
            })
            .collect();

        Some(Resource {
            id,
            model: schema.model.clone(),
            attributes,
            relationships,
        })
    }

    fn normalize_records(&self, schema: &EntitySchema, value: Value) -> Vec<Resource> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| self.normalize_record(schema, item))
                .collect(),
            other => self.normalize_record(schema, other).into_iter().collect(),
        }
    }

    fn sideloaded_schema(&self, key: &str) -> Option<&EntitySchema> {
        self.registry
            .iter()
            .find(|schema| schema.model.as_str() == key || pluralize(schema.model.as_str()) == key)
    }
}

impl<E: RelationshipExtractor> GenericNormalizer for JsonApiNormalizer<E> {
    type Output = Document;

    fn normalize(&self, ctx: &ResponseContext<'_>, payload: Value, is_single: bool) -> Document {
        let primary_keys = [ctx.model().to_string(), pluralize(ctx.model().as_str())];
        let mut primary = Vec::new();
        let mut included = Vec::new();
        let mut meta = None;

        let entries = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                tracing::warn!(model = %ctx.model(), payload = %other, "payload is not an object");
                Map::new()
            }
        };

        for (key, value) in entries {
            if primary_keys.contains(&key) {
                primary.extend(self.normalize_records(ctx.schema, value));
            } else if key == "meta" {
                meta = Some(value);
            } else if let Some(schema) = self.sideloaded_schema(&key) {
                included.extend(self.normalize_records(schema, value));
            } else {
                tracing::warn!(model = %ctx.model(), key = %key, "skipping unknown payload key");
            }
        }

        let data = if is_single {
            PrimaryData::Single(pick_single(primary, ctx, &mut included))
        } else {
            PrimaryData::Collection(primary)
        };

        Document {
            data,
            included,
            meta,
        }
    }
}

/// The record matching the requested id, else the first one. Any other
/// primary records are moved to `included`.
fn pick_single(
    mut primary: Vec<Resource>,
    ctx: &ResponseContext<'_>,
    included: &mut Vec<Resource>,
) -> Option<Resource> {
    if primary.is_empty() {
        return None;
    }
    let index = ctx
        .id
        .and_then(|id| {
            let wanted = id.to_string();
            primary.iter().position(|resource| resource.id == wanted)
        })
        .unwrap_or(0);
    let chosen = primary.remove(index);
    included.extend(primary);
    Some(chosen)
}
