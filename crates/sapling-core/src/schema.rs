//! Entity descriptions: what the mapper maps JSON onto.

mod attribute;
pub use attribute::{Attribute, AttributeId, AttributeType};

mod builder;
pub use builder::{AttributeDef, Builder, EntityDef, RelationshipDef};

mod entity;
pub use entity::{Entity, EntityId, EntityKind, Polymorphism};

mod relationship;
pub use relationship::{Cardinality, MergePolicy, OrphanPolicy, Relationship, RelationshipId};

mod verify;

use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Schema {
    pub entities: IndexMap<EntityId, Entity>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Get an entity by ID
    pub fn entity(&self, id: impl Into<EntityId>) -> &Entity {
        self.entities.get(&id.into()).expect("invalid entity ID")
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.values().find(|entity| entity.name == name)
    }

    /// Get an attribute by ID
    pub fn attribute(&self, id: AttributeId) -> &Attribute {
        self.entity(id.entity)
            .attributes
            .get(id.index)
            .expect("invalid attribute ID")
    }

    /// Get a relationship by ID
    pub fn relationship(&self, id: RelationshipId) -> &Relationship {
        self.entity(id.entity)
            .relationships
            .get(id.index)
            .expect("invalid relationship ID")
    }

    /// Returns `true` if `entity` is `ancestor` or inherits from it.
    pub fn is_kind_of(&self, entity: impl Into<EntityId>, ancestor: impl Into<EntityId>) -> bool {
        let ancestor = ancestor.into();
        let mut current = Some(entity.into());

        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.entity(id).parent;
        }

        false
    }

    /// Resolves the relationship that pairs with `relationship` on the
    /// concrete entity `target`, if one is declared.
    ///
    /// Inverses are stored by name because inherited relationships get a
    /// distinct [`RelationshipId`] in every descendant entity.
    pub fn inverse_of(
        &self,
        relationship: &Relationship,
        target: EntityId,
    ) -> Option<&Relationship> {
        let name = relationship.inverse.as_deref()?;
        self.entity(target).relationship_by_name(name)
    }
}
