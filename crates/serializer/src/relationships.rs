//! Relationship extraction.
//!
//! For every relationship an [`EntitySchema`] declares, [`extract_relationships`]
//! looks up the record's PascalCase field and turns what it finds into a
//! [`Relationship`]:
//!
//! | Field value | Result |
//! |-------------|--------|
//! | to-one id or reference object | `data: {id, type}` |
//! | to-many `{ "results": [{ "Id": 10 }, ...] }` | `data: [{id: "10", type}, ...]`; the record field is rewritten to `[10, ...]` |
//! | to-many `[10, 11]` | `data: [{id: "10", type}, {id: "11", type}]` |
//! | `{ "__deferred": { "uri": "..." } }` without `results` | `links.related = uri`, no `data`; the record field is removed |
//! | `null`, absent, or anything else | no `data` |
//!
//! A link already present in the record's `links` collection is attached as
//! `links.related` whatever the field held. Relationships with neither data
//! nor a link are left out of the result.

use dialect::{
    wire, EntitySchema, ModelName, RecordId, RelationshipKind, RelationshipMeta, RelationshipName,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::keys::{key_for_link, key_for_relationship};

// ---------------------------------------------------------------------------
// Relationship entries
// ---------------------------------------------------------------------------

/// A `{id, type}` reference to a related record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIdentifier {
    /// Identifier as text, whatever its type on the wire.
    pub id: String,
    #[serde(rename = "type")]
    pub model: ModelName,
}

impl ResourceIdentifier {
    pub fn new(id: impl Into<String>, model: ModelName) -> Self {
        Self {
            id: id.into(),
            model,
        }
    }
}

/// Resolved relationship data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// To-one reference.
    One(ResourceIdentifier),
    /// To-many references, in payload order, duplicates kept.
    Many(Vec<ResourceIdentifier>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipLinks {
    /// URI from which the related records can be fetched.
    pub related: String,
}

/// One entry of the relationship map.
///
/// At least one of `data` and `links` is always set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Relationship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
}

/// Relationships keyed by the host's relationship name, in declaration order.
pub type RelationshipMap = IndexMap<RelationshipName, Relationship>;

// ---------------------------------------------------------------------------
// Extraction hook
// ---------------------------------------------------------------------------

/// Extra context handed to [`RelationshipExtractor::extract_polymorphic_relationship`].
#[derive(Debug, Clone, Copy)]
pub struct PolymorphicContext<'a> {
    /// The relationship's name on the host model.
    pub key: &'a RelationshipName,
    /// The full record the relationship was read from.
    pub record: &'a Map<String, Value>,
    pub meta: &'a RelationshipMeta,
}

/// Turns one raw relationship value into a reference.
///
/// Both methods have defaults; override
/// [`extract_polymorphic_relationship`](Self::extract_polymorphic_relationship)
/// when the concrete type of a polymorphic to-one must be read from elsewhere
/// in the record.
pub trait RelationshipExtractor {
    /// Reads a reference from `value`, defaulting its type to `related`.
    ///
    /// Accepts a bare identifier (string or number) or an object carrying `Id`
    /// (or `id`) and optionally `type`. Returns `None` for anything else.
    fn extract_relationship(&self, related: &ModelName, value: &Value) -> Option<ResourceIdentifier> {
        match value {
            Value::Object(object) => {
                let id = object
                    .get(wire::PRIMARY_KEY)
                    .or_else(|| object.get("id"))
                    .and_then(coerce_id)?;
                let model = object
                    .get(wire::TYPE)
                    .and_then(Value::as_str)
                    .and_then(ModelName::new)
                    .unwrap_or_else(|| related.clone());
                Some(ResourceIdentifier { id, model })
            }
            other => coerce_id(other).map(|id| ResourceIdentifier::new(id, related.clone())),
        }
    }

    /// Reads a reference for a polymorphic to-one relationship.
    ///
    /// A bare identifier takes its concrete type from the record's
    /// `{Key}Type` field (`AuthorType` for `author`) when present; a reference
    /// object names its type itself.
    fn extract_polymorphic_relationship(
        &self,
        related: &ModelName,
        value: &Value,
        context: PolymorphicContext<'_>,
    ) -> Option<ResourceIdentifier> {
        let mut reference = self.extract_relationship(related, value)?;
        if !value.is_object() {
            let type_key = format!("{}Type", key_for_relationship(context.key));
            if let Some(model) = context
                .record
                .get(&type_key)
                .and_then(Value::as_str)
                .and_then(ModelName::new)
            {
                reference.model = model;
            }
        }
        Some(reference)
    }
}

/// The stock extractor, using the trait's default methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl RelationshipExtractor for DefaultExtractor {}

/// Renders a scalar identifier as text. `null`, `""` and non-scalars yield `None`.
pub(crate) fn coerce_id(value: &Value) -> Option<String> {
    match RecordId::from_json(value).ok()? {
        RecordId::Text(text) if text.is_empty() => None,
        id => Some(id.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Builds the relationship map for `record`, in schema-declaration order.
///
/// `record` is updated in place: expanded to-many fields are replaced by
/// their identifier list, deferred fields are removed, and deferred URIs are
/// recorded under the record's `links` collection.
pub fn extract_relationships(
    extractor: &(impl RelationshipExtractor + ?Sized),
    schema: &EntitySchema,
    record: &mut Map<String, Value>,
) -> RelationshipMap {
    let mut relationships = RelationshipMap::new();

    for meta in schema.each_relationship() {
        let key = key_for_relationship(&meta.name);
        let mut data = None;

        if let Some(value) = record.get(&key).cloned() {
            let inline = meta.kind == RelationshipKind::HasMany && has_inline_results(&value);
            if let Some(deferred) = value.get(wire::DEFERRED).filter(|_| !inline) {
                let uri = deferred.get(wire::DEFERRED_URI).and_then(Value::as_str);
                tracing::debug!(relationship = %meta.name, ?uri, "relationship deferred");
                if let Some(uri) = uri {
                    insert_link(record, &meta.name, uri);
                }
                record.remove(&key);
            } else {
                data = match meta.kind {
                    RelationshipKind::BelongsTo => {
                        extract_to_one(extractor, meta, &value, record).map(RelationshipData::One)
                    }
                    RelationshipKind::HasMany => {
                        extract_to_many(extractor, meta, &key, value, record)
                            .map(RelationshipData::Many)
                    }
                };
            }
        }

        let links = record
            .get(wire::LINKS)
            .and_then(|links| links.get(key_for_link(&meta.name)))
            .and_then(Value::as_str)
            .map(|related| RelationshipLinks {
                related: related.to_string(),
            });

        if data.is_some() || links.is_some() {
            relationships.insert(meta.name.clone(), Relationship { data, links });
        }
    }

    relationships
}

/// An expanded to-many value: `{ "results": [...] }`. Takes precedence over a
/// `__deferred` stub carried alongside it.
fn has_inline_results(value: &Value) -> bool {
    value.get(wire::RESULTS).is_some_and(Value::is_array)
}

fn extract_to_one(
    extractor: &(impl RelationshipExtractor + ?Sized),
    meta: &RelationshipMeta,
    value: &Value,
    record: &Map<String, Value>,
) -> Option<ResourceIdentifier> {
    if meta.polymorphic {
        let context = PolymorphicContext {
            key: &meta.name,
            record,
            meta,
        };
        extractor.extract_polymorphic_relationship(&meta.related, value, context)
    } else {
        extractor.extract_relationship(&meta.related, value)
    }
}

fn extract_to_many(
    extractor: &(impl RelationshipExtractor + ?Sized),
    meta: &RelationshipMeta,
    key: &str,
    value: Value,
    record: &mut Map<String, Value>,
) -> Option<Vec<ResourceIdentifier>> {
    let items = match value {
        Value::Object(object) => {
            let results = object.get(wire::RESULTS)?.as_array()?;
            let ids: Vec<Value> = results
                .iter()
                .filter_map(|item| item.get(wire::PRIMARY_KEY).cloned())
                .collect();
            record.insert(key.to_string(), Value::Array(ids.clone()));
            ids
        }
        Value::Array(items) => items,
        _ => return None,
    };

    Some(
        items
            .iter()
            .filter_map(|item| extractor.extract_relationship(&meta.related, item))
            .collect(),
    )
}

fn insert_link(record: &mut Map<String, Value>, name: &RelationshipName, uri: &str) {
    let links = record
        .entry(wire::LINKS)
        .or_insert_with(|| Value::Object(Map::new()));
    if !links.is_object() {
        *links = Value::Object(Map::new());
    }
    if let Value::Object(links) = links {
        links.insert(key_for_link(name), Value::String(uri.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn name(s: &str) -> RelationshipName {
        RelationshipName::new(s).unwrap()
    }

    fn model(s: &str) -> ModelName {
        ModelName::new(s).unwrap()
    }

    fn post_schema() -> EntitySchema {
        EntitySchema::new(model("post"))
            .belongs_to(name("author"), model("person"))
            .has_many(name("comments"), model("comment"))
    }

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn inline_results_resolve_to_many_references() {
        let mut post = record(json!({
            "Id": 1,
            "Comments": { "results": [{ "Id": 10 }, { "Id": 11 }, { "Id": 10 }] }
        }));

        let rels = extract_relationships(&DefaultExtractor, &post_schema(), &mut post);

        assert_eq!(
            rels[&name("comments")],
            Relationship {
                data: Some(RelationshipData::Many(vec![
                    ResourceIdentifier::new("10", model("comment")),
                    ResourceIdentifier::new("11", model("comment")),
                    ResourceIdentifier::new("10", model("comment")),
                ])),
                links: None,
            }
        );
        assert_eq!(post["Comments"], json!([10, 11, 10]));
    }

    #[test]
    fn inline_results_win_over_a_deferred_stub() {
        let mut post = record(json!({
            "Id": 1,
            "Comments": { "results": [{ "Id": 10 }], "__deferred": { "uri": "/x" } }
        }));

        let rels = extract_relationships(&DefaultExtractor, &post_schema(), &mut post);

        assert_eq!(
            rels[&name("comments")],
            Relationship {
                data: Some(RelationshipData::Many(vec![ResourceIdentifier::new(
                    "10",
                    model("comment")
                )])),
                links: None,
            }
        );
        assert_eq!(post["Comments"], json!([10]));
        assert!(!post.contains_key("links"));
    }

    #[test]
    fn deferred_stub_becomes_a_link_and_drops_the_field() {
        let mut post = record(json!({
            "Id": 1,
            "Comments": { "__deferred": { "uri": "https://example.com/posts(1)/Comments" } }
        }));

        let rels = extract_relationships(&DefaultExtractor, &post_schema(), &mut post);

        assert_eq!(
            rels[&name("comments")],
            Relationship {
                data: None,
                links: Some(RelationshipLinks {
                    related: "https://example.com/posts(1)/Comments".into()
                }),
            }
        );
        assert!(!post.contains_key("Comments"));
        assert_eq!(
            post["links"],
            json!({ "comments": "https://example.com/posts(1)/Comments" })
        );
    }

    #[test]
    fn deferred_to_one_is_link_only() {
        let mut post = record(json!({
            "Author": { "__deferred": { "uri": "/posts(1)/Author" } }
        }));

        let rels = extract_relationships(&DefaultExtractor, &post_schema(), &mut post);

        assert_eq!(rels[&name("author")].data, None);
        assert_eq!(
            rels[&name("author")].links.as_ref().map(|l| l.related.as_str()),
            Some("/posts(1)/Author")
        );
        assert!(!post.contains_key("Author"));
    }

    #[test]
    fn plain_arrays_and_scalar_ids_resolve() {
        let mut post = record(json!({ "Author": 7, "Comments": [3, "4"] }));

        let rels = extract_relationships(&DefaultExtractor, &post_schema(), &mut post);

        assert_eq!(
            rels[&name("author")].data,
            Some(RelationshipData::One(ResourceIdentifier::new("7", model("person"))))
        );
        assert_eq!(
            rels[&name("comments")].data,
            Some(RelationshipData::Many(vec![
                ResourceIdentifier::new("3", model("comment")),
                ResourceIdentifier::new("4", model("comment")),
            ]))
        );
    }

    #[test]
    fn expanded_to_one_object_uses_its_id_and_type() {
        let mut post = record(json!({ "Author": { "Id": 2, "type": "editor", "Title": "x" } }));

        let rels = extract_relationships(&DefaultExtractor, &post_schema(), &mut post);

        assert_eq!(
            rels[&name("author")].data,
            Some(RelationshipData::One(ResourceIdentifier::new("2", model("editor"))))
        );
    }

    #[test]
    fn empty_and_malformed_values_are_omitted() {
        let mut post = record(json!({ "Author": null, "Comments": { "unexpected": true } }));

        let rels = extract_relationships(&DefaultExtractor, &post_schema(), &mut post);

        assert!(rels.is_empty());
        assert_eq!(post["Comments"], json!({ "unexpected": true }));
    }

    #[test]
    fn existing_links_coexist_with_data() {
        let mut post = record(json!({
            "Comments": [5],
            "links": { "comments": "/posts(1)/Comments", "author": "/posts(1)/Author" }
        }));

        let rels = extract_relationships(&DefaultExtractor, &post_schema(), &mut post);

        let keys: Vec<_> = rels.keys().map(RelationshipName::as_str).collect();
        assert_eq!(keys, vec!["author", "comments"]);
        assert_eq!(
            rels[&name("comments")],
            Relationship {
                data: Some(RelationshipData::Many(vec![ResourceIdentifier::new(
                    "5",
                    model("comment")
                )])),
                links: Some(RelationshipLinks {
                    related: "/posts(1)/Comments".into()
                }),
            }
        );
        assert_eq!(rels[&name("author")].data, None);
    }

    #[test]
    fn empty_inline_results_resolve_to_an_empty_list() {
        let mut post = record(json!({ "Comments": { "results": [] } }));

        let rels = extract_relationships(&DefaultExtractor, &post_schema(), &mut post);

        assert_eq!(rels[&name("comments")].data, Some(RelationshipData::Many(vec![])));
    }

    fn polymorphic_schema() -> EntitySchema {
        EntitySchema::new(model("post")).relationship(
            name("author"),
            RelationshipKind::BelongsTo,
            model("person"),
            true,
        )
    }

    #[test]
    fn polymorphic_to_one_reads_the_type_field() {
        let mut post = record(json!({ "Author": 3, "AuthorType": "robot" }));

        let rels = extract_relationships(&DefaultExtractor, &polymorphic_schema(), &mut post);

        assert_eq!(
            rels[&name("author")].data,
            Some(RelationshipData::One(ResourceIdentifier::new("3", model("robot"))))
        );
    }

    #[test]
    fn polymorphic_reference_object_keeps_its_own_type() {
        let mut post = record(json!({
            "Author": { "Id": 3, "type": "editor" },
            "AuthorType": "robot"
        }));

        let rels = extract_relationships(&DefaultExtractor, &polymorphic_schema(), &mut post);

        assert_eq!(
            rels[&name("author")].data,
            Some(RelationshipData::One(ResourceIdentifier::new("3", model("editor"))))
        );
    }

    #[test]
    fn polymorphic_without_type_field_defaults_to_related() {
        let mut post = record(json!({ "Author": 3 }));

        let rels = extract_relationships(&DefaultExtractor, &polymorphic_schema(), &mut post);

        assert_eq!(
            rels[&name("author")].data,
            Some(RelationshipData::One(ResourceIdentifier::new("3", model("person"))))
        );
    }

    struct KindField;

    impl RelationshipExtractor for KindField {
        fn extract_polymorphic_relationship(
            &self,
            related: &ModelName,
            value: &Value,
            context: PolymorphicContext<'_>,
        ) -> Option<ResourceIdentifier> {
            let mut reference = self.extract_relationship(related, value)?;
            if let Some(kind) = context.record.get("Kind").and_then(Value::as_str) {
                reference.model = model(kind);
            }
            Some(reference)
        }
    }

    #[test]
    fn polymorphic_hook_can_be_overridden() {
        let mut post = record(json!({ "Author": 3, "AuthorType": "robot", "Kind": "bot" }));

        let rels = extract_relationships(&KindField, &polymorphic_schema(), &mut post);

        assert_eq!(
            rels[&name("author")].data,
            Some(RelationshipData::One(ResourceIdentifier::new("3", model("bot"))))
        );
    }

    #[test]
    fn serialised_entry_omits_absent_parts() {
        let entry = Relationship {
            data: None,
            links: Some(RelationshipLinks {
                related: "/x".into(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({ "links": { "related": "/x" } })
        );
    }
}
