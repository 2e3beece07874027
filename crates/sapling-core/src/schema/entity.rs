use super::{Attribute, Relationship};
use crate::KeyPath;
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Entity {
    /// Uniquely identifies the entity within the schema
    pub id: EntityId,

    /// Name of the entity
    pub name: String,

    /// The entity this one inherits attributes and relationships from
    pub parent: Option<EntityId>,

    /// Concrete entities have instances, abstract ones resolve to a
    /// descendant first
    pub kind: EntityKind,

    /// The attribute whose value identifies instances within the store.
    /// Always set for concrete entities.
    pub identity: Option<usize>,

    /// Attributes, inherited ones first
    pub attributes: Vec<Attribute>,

    /// Relationships, inherited ones first
    pub relationships: Vec<Relationship>,

    /// Name of the dictionary transformer applied to incoming JSON objects
    pub dictionary_transformer: Option<String>,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Concrete,
    Abstract(Polymorphism),
}

/// How an abstract entity picks the concrete entity for a JSON object.
#[derive(Debug, Clone)]
pub enum Polymorphism {
    /// Read the value at `key_path` and look it up in `variants`.
    Discriminator {
        key_path: KeyPath,
        variants: IndexMap<String, EntityId>,
    },

    /// Ask the named entity mapper for an entity name.
    Mapper(String),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

impl Entity {
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, EntityKind::Abstract(_))
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self.kind, EntityKind::Concrete)
    }

    pub fn polymorphism(&self) -> Option<&Polymorphism> {
        match &self.kind {
            EntityKind::Abstract(polymorphism) => Some(polymorphism),
            EntityKind::Concrete => None,
        }
    }

    pub fn identity_attribute(&self) -> Option<&Attribute> {
        self.identity.map(|index| &self.attributes[index])
    }

    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn relationship_by_name(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|rel| rel.name == name)
    }

    /// Attributes that take part in JSON mapping.
    pub fn mapped_attributes(&self) -> impl Iterator<Item = (&Attribute, &KeyPath)> + '_ {
        self.attributes
            .iter()
            .filter_map(|attr| attr.key_path.as_ref().map(|key_path| (attr, key_path)))
    }

    /// Relationships that take part in JSON mapping.
    pub fn mapped_relationships(
        &self,
    ) -> impl Iterator<Item = (&Relationship, &KeyPath)> + '_ {
        self.relationships
            .iter()
            .filter_map(|rel| rel.key_path.as_ref().map(|key_path| (rel, key_path)))
    }
}

impl From<&Self> for EntityId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Entity> for EntityId {
    fn from(value: &Entity) -> Self {
        value.id
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "EntityId({})", self.0)
    }
}
