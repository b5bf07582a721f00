//! Read-only entity schema descriptors.
//!
//! The host framework knows which attributes and relationships each entity
//! type declares. The normaliser needs that knowledge but must not reflect
//! over live model objects, so the host hands it an [`EntitySchema`]: a plain
//! value listing attributes and relationships in declaration order.
//!
//! Schemas deserialise from JSON of the form:
//!
//! ```json
//! {
//!   "model": "post",
//!   "attributes": [{ "name": "title" }],
//!   "relationships": [
//!     { "name": "author", "kind": "belongsTo", "type": "person" },
//!     { "name": "comments", "kind": "hasMany", "type": "comment" }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{AttributeName, ModelName, RelationshipName};

/// Cardinality of a declared relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    /// To-one: the record references at most one related record.
    BelongsTo,
    /// To-many: the record references an ordered list of related records.
    HasMany,
}

/// A declared attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMeta {
    pub name: AttributeName,

    /// Transform name declared with the attribute (e.g. `"date"`), if any.
    ///
    /// Carried for the host's benefit; this crate applies no transforms.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

/// A declared relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipMeta {
    /// The relationship's camelCase name on the host model.
    pub name: RelationshipName,

    pub kind: RelationshipKind,

    /// Model name of the related entity type.
    #[serde(rename = "type")]
    pub related: ModelName,

    /// Whether the related record may be of a subtype of [`Self::related`].
    #[serde(default)]
    pub polymorphic: bool,
}

/// The declared shape of one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub model: ModelName,

    #[serde(default)]
    pub attributes: Vec<AttributeMeta>,

    #[serde(default)]
    pub relationships: Vec<RelationshipMeta>,
}

impl EntitySchema {
    /// Creates a schema with no attributes or relationships.
    pub fn new(model: ModelName) -> Self {
        Self {
            model,
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Declares an attribute.
    pub fn attribute(mut self, name: AttributeName) -> Self {
        self.attributes.push(AttributeMeta {
            name,
            transform: None,
        });
        self
    }

    /// Declares a non-polymorphic to-one relationship.
    pub fn belongs_to(self, name: RelationshipName, related: ModelName) -> Self {
        self.relationship(name, RelationshipKind::BelongsTo, related, false)
    }

    /// Declares a to-many relationship.
    pub fn has_many(self, name: RelationshipName, related: ModelName) -> Self {
        self.relationship(name, RelationshipKind::HasMany, related, false)
    }

    /// Declares a relationship with every property spelled out.
    pub fn relationship(
        mut self,
        name: RelationshipName,
        kind: RelationshipKind,
        related: ModelName,
        polymorphic: bool,
    ) -> Self {
        self.relationships.push(RelationshipMeta {
            name,
            kind,
            related,
            polymorphic,
        });
        self
    }

    /// Iterates declared relationships in declaration order.
    pub fn each_relationship(&self) -> impl Iterator<Item = &RelationshipMeta> {
        self.relationships.iter()
    }

    /// Iterates declared attributes in declaration order.
    pub fn each_attribute(&self) -> impl Iterator<Item = &AttributeMeta> {
        self.attributes.iter()
    }

    /// Looks up a declared relationship by name.
    pub fn relationship_named(&self, name: &str) -> Option<&RelationshipMeta> {
        self.relationships.iter().find(|r| r.name.as_str() == name)
    }
}

// ---------------------------------------------------------------------------

/// All entity schemas the host has declared, keyed by model name.
///
/// Used to recognise sideloaded payload keys that belong to a model other than
/// the one a response was requested for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry(IndexMap<ModelName, EntitySchema>);

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema, replacing any earlier schema for the same model.
    pub fn register(&mut self, schema: EntitySchema) {
        self.0.insert(schema.model.clone(), schema);
    }

    pub fn get(&self, model: &ModelName) -> Option<&EntitySchema> {
        self.0.get(model)
    }

    /// Iterates schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySchema> {
        self.0.values()
    }
}

impl FromIterator<EntitySchema> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = EntitySchema>>(iter: I) -> Self {
        let mut registry = Self::new();
        for schema in iter {
            registry.register(schema);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_deserialises_in_declaration_order() {
        let schema: EntitySchema = serde_json::from_value(json!({
            "model": "post",
            "attributes": [{ "name": "title" }, { "name": "publishedAt", "type": "date" }],
            "relationships": [
                { "name": "comments", "kind": "hasMany", "type": "comment" },
                { "name": "author", "kind": "belongsTo", "type": "person", "polymorphic": true }
            ]
        }))
        .unwrap();

        let names: Vec<_> = schema.each_relationship().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["comments", "author"]);
        assert_eq!(schema.attributes[1].transform.as_deref(), Some("date"));

        let author = schema.relationship_named("author").unwrap();
        assert_eq!(author.kind, RelationshipKind::BelongsTo);
        assert!(author.polymorphic);
        assert!(!schema.relationship_named("comments").unwrap().polymorphic);
    }

    #[test]
    fn registry_replaces_schema_for_same_model() {
        let post = ModelName::new("post").unwrap();
        let mut registry = SchemaRegistry::new();
        registry.register(EntitySchema::new(post.clone()));
        registry.register(
            EntitySchema::new(post.clone()).attribute(AttributeName::new("title").unwrap()),
        );

        assert_eq!(registry.iter().count(), 1);
        assert_eq!(registry.get(&post).unwrap().attributes.len(), 1);
    }
}
