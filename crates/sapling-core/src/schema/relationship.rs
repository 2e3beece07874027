use super::EntityId;
use crate::KeyPath;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Relationship {
    /// Uniquely identifies the relationship within its entity
    pub id: RelationshipId,

    /// The relationship name
    pub name: String,

    /// Where the related JSON lives. `None` keeps the relationship out of
    /// mapping and serialization.
    pub key_path: Option<KeyPath>,

    /// Related entity. May be abstract.
    pub target: EntityId,

    pub cardinality: Cardinality,

    /// What happens to objects removed from this relationship
    pub orphans: OrphanPolicy,

    /// How a to-many payload combines with the current members
    pub merge: MergePolicy,

    /// Name of the relationship on the target that pairs with this one
    pub inverse: Option<String>,

    /// Serialize related objects as their identity values rather than as
    /// nested objects
    pub by_identity: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipId {
    pub entity: EntityId,
    pub index: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cardinality {
    ToOne,
    OrderedToMany,
    UnorderedToMany,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Leave removed objects in the store
    #[default]
    Retain,

    /// Delete removed objects that nothing else references
    Delete,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The payload becomes the full membership
    #[default]
    Replace,

    /// The payload is added to the current members
    Union,
}

impl Relationship {
    pub fn is_to_many(&self) -> bool {
        self.cardinality.is_to_many()
    }
}

impl Cardinality {
    pub fn is_to_many(self) -> bool {
        matches!(self, Self::OrderedToMany | Self::UnorderedToMany)
    }

    pub fn is_ordered(self) -> bool {
        matches!(self, Self::OrderedToMany)
    }
}

impl From<&Relationship> for RelationshipId {
    fn from(val: &Relationship) -> Self {
        val.id
    }
}

impl fmt::Debug for RelationshipId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "RelationshipId({}/{})", self.entity.0, self.index)
    }
}
