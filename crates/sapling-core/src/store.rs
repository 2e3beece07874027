//! The seam between the mapper and the storage engine.

use crate::{
    schema::{AttributeId, EntityId, RelationshipId},
    Key, Result, Value,
};
use indexmap::IndexMap;
use std::fmt;

/// Handle to an object owned by a [`Store`].
///
/// Handles are only meaningful to the store that issued them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// The value of a relationship on one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Related {
    One(Option<ObjectId>),

    /// Members in order. Unordered relationships still hold their members in
    /// insertion order; the order just carries no meaning.
    Many(Vec<ObjectId>),
}

/// A storage engine the mapper reads and writes objects through.
///
/// Mapping uses `find_by_identity` and `create_new` for identity
/// resolution, the attribute and relationship accessors to fill objects in,
/// `referrers` and `delete` for orphan cleanup. The mapper never calls
/// `save`: committing is the caller's decision.
pub trait Store {
    /// Looks up existing objects of `entity` by identity, in one batch.
    /// Identities with no object are left out of the result.
    fn find_by_identity(&self, entity: EntityId, keys: &[Key]) -> Result<IndexMap<Key, ObjectId>>;

    /// Creates an object of `entity` with its identity attribute set to
    /// `key`.
    fn create_new(&mut self, entity: EntityId, key: Key) -> Result<ObjectId>;

    /// Deletes an object. Relationships on other objects that referenced it
    /// no longer do afterwards.
    fn delete(&mut self, object: ObjectId) -> Result<()>;

    /// Commits pending changes.
    fn save(&mut self) -> Result<()>;

    fn entity_of(&self, object: ObjectId) -> Result<EntityId>;

    fn attribute(&self, object: ObjectId, attribute: AttributeId) -> Result<Value>;

    fn set_attribute(&mut self, object: ObjectId, attribute: AttributeId, value: Value)
        -> Result<()>;

    fn related(&self, object: ObjectId, relationship: RelationshipId) -> Result<Related>;

    fn set_related(
        &mut self,
        object: ObjectId,
        relationship: RelationshipId,
        related: Related,
    ) -> Result<()>;

    /// Every `(object, relationship)` pair whose relationship currently
    /// includes `object`.
    fn referrers(&self, object: ObjectId) -> Result<Vec<(ObjectId, RelationshipId)>>;
}

impl Related {
    pub fn empty_for(to_many: bool) -> Self {
        if to_many {
            Related::Many(vec![])
        } else {
            Related::One(None)
        }
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        match self {
            Related::One(one) => *one == Some(object),
            Related::Many(many) => many.contains(&object),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Related::One(one) => one.is_none(),
            Related::Many(many) => many.is_empty(),
        }
    }

    /// Members as a slice, whatever the cardinality.
    pub fn as_slice(&self) -> &[ObjectId] {
        match self {
            Related::One(one) => one.as_slice(),
            Related::Many(many) => many,
        }
    }

    /// Removes `object`, returning `true` if it was a member.
    pub fn remove(&mut self, object: ObjectId) -> bool {
        match self {
            Related::One(one) if *one == Some(object) => {
                *one = None;
                true
            }
            Related::One(_) => false,
            Related::Many(many) => {
                let before = many.len();
                many.retain(|member| *member != object);
                many.len() != before
            }
        }
    }

    #[track_caller]
    pub fn expect_one(&self) -> Option<ObjectId> {
        match self {
            Related::One(one) => *one,
            Related::Many(_) => panic!("expected to-one relationship value, but was {self:?}"),
        }
    }

    #[track_caller]
    pub fn expect_many(&self) -> &[ObjectId] {
        match self {
            Related::Many(many) => many,
            Related::One(_) => panic!("expected to-many relationship value, but was {self:?}"),
        }
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ObjectId({})", self.0)
    }
}
