//! Write-side serialisation.
//!
//! Only what changed goes over the wire: a persisted record sends the
//! attributes in its changed set, a new record sends all of them. The
//! service-maintained `modified` attribute is never sent.

use std::collections::HashSet;

use dialect::{wire, AttributeName, EntitySchema, RecordId, RelationshipKind, RelationshipName};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::keys::{key_for_attribute, key_for_relationship, primary_key};

/// The state of one record at the time it is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub id: Option<RecordId>,

    /// `true` until the record has been persisted once.
    pub is_new: bool,

    /// Current attribute values, keyed by host name.
    pub attributes: IndexMap<AttributeName, Value>,

    /// Attributes modified since the record was last persisted.
    pub changed_attributes: HashSet<AttributeName>,

    /// Current to-one references, keyed by relationship name.
    pub belongs_to: IndexMap<RelationshipName, Option<RecordId>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializeOptions {
    /// Emit the record's identifier under `Id`.
    pub include_id: bool,
}

/// Returns `true` if `name` should be written for `snapshot`.
pub fn serialize_attribute(snapshot: &Snapshot, name: &AttributeName) -> bool {
    if name.as_str() == wire::RESERVED_ATTRIBUTE {
        return false;
    }
    snapshot.is_new || snapshot.changed_attributes.contains(name)
}

/// Builds the write payload for `snapshot`.
///
/// Attributes and to-one references are emitted in schema-declaration order
/// under their PascalCase keys. To-many relationships are never written. An
/// attribute declared in the schema but missing from the snapshot is written
/// as `null` if it passes [`serialize_attribute`].
pub fn serialize(schema: &EntitySchema, snapshot: &Snapshot, options: SerializeOptions) -> Map<String, Value> {
    let mut payload = Map::new();

    if options.include_id {
        if let Some(id) = &snapshot.id {
            payload.insert(primary_key().to_string(), id_value(id));
        }
    }

    for meta in schema.each_attribute() {
        if !serialize_attribute(snapshot, &meta.name) {
            continue;
        }
        let value = snapshot.attributes.get(&meta.name).cloned().unwrap_or(Value::Null);
        payload.insert(key_for_attribute(&meta.name), value);
    }

    for meta in schema.each_relationship() {
        if meta.kind != RelationshipKind::BelongsTo {
            continue;
        }
        let Some(reference) = snapshot.belongs_to.get(&meta.name) else {
            continue;
        };
        let value = reference.as_ref().map_or(Value::Null, id_value);
        payload.insert(key_for_relationship(&meta.name), value);
    }

    tracing::trace!(model = %schema.model, fields = payload.len(), "serialised record");
    payload
}

fn id_value(id: &RecordId) -> Value {
    match id {
        RecordId::Number(n) => Value::from(*n),
        RecordId::Text(text) => Value::String(text.clone()),
    }
}
