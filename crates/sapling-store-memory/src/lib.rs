mod pending;
pub use pending::Pending;

use indexmap::IndexMap;
use sapling_core::{
    bail,
    schema::{AttributeId, Entity, EntityId, RelationshipId},
    store::{ObjectId, Related},
    Error, Key, Result, Schema, Store, Value,
};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// An in-memory [`Store`].
///
/// Objects live in an arena of slots addressed by [`ObjectId`]. Slots of
/// deleted objects are never reused, so stale handles fail with
/// `ObjectNotFound` instead of reaching another object.
#[derive(Debug)]
pub struct MemoryStore {
    schema: Arc<Schema>,
    slots: Vec<Option<Slot>>,

    /// Live objects by concrete entity and identity key
    index: HashMap<(EntityId, Key), ObjectId>,

    pending: Pending,
}

#[derive(Debug)]
struct Slot {
    entity: EntityId,
    key: Key,
    attributes: Vec<Value>,
    relationships: Vec<Related>,
}

impl MemoryStore {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            slots: vec![],
            index: HashMap::new(),
            pending: Pending::default(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Changes made since the last [`save`](Store::save).
    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `object` is still stored.
    pub fn contains(&self, object: ObjectId) -> bool {
        self.slot(object).is_ok()
    }

    pub fn find(&self, entity: impl Into<EntityId>, key: impl Into<Key>) -> Option<ObjectId> {
        self.index.get(&(entity.into(), key.into())).copied()
    }

    /// Live objects of `entity` or any of its descendants, in creation
    /// order.
    pub fn objects_of(&self, entity: impl Into<EntityId>) -> Vec<ObjectId> {
        let entity = entity.into();
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let slot = slot.as_ref()?;
                self.schema
                    .is_kind_of(slot.entity, entity)
                    .then_some(ObjectId(index))
            })
            .collect()
    }

    fn slot(&self, object: ObjectId) -> Result<&Slot> {
        self.slots
            .get(object.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::object_not_found(object))
    }

    fn slot_mut(&mut self, object: ObjectId) -> Result<&mut Slot> {
        self.slots
            .get_mut(object.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::object_not_found(object))
    }

    /// Validates that `id` belongs to the object's entity and returns its
    /// index.
    fn member_index(slot: &Slot, entity: EntityId, index: usize, what: &str) -> Result<usize> {
        if slot.entity != entity {
            bail!("{what} belongs to {entity:?}, not to the object's {:?}", slot.entity);
        }
        Ok(index)
    }

    fn entity(&self, id: EntityId) -> &Entity {
        self.schema.entity(id)
    }
}

impl Store for MemoryStore {
    fn find_by_identity(&self, entity: EntityId, keys: &[Key]) -> Result<IndexMap<Key, ObjectId>> {
        Ok(keys
            .iter()
            .filter_map(|key| {
                let object = self.index.get(&(entity, key.clone()))?;
                Some((key.clone(), *object))
            })
            .collect())
    }

    fn create_new(&mut self, entity: EntityId, key: Key) -> Result<ObjectId> {
        let description = self.entity(entity);

        if description.is_abstract() {
            bail!("cannot create an object of abstract entity `{}`", description.name);
        }

        if self.index.contains_key(&(entity, key.clone())) {
            bail!(
                "an object of `{}` with identity `{}` already exists",
                description.name,
                key
            );
        }

        let mut attributes = vec![Value::Null; description.attributes.len()];
        if let Some(identity) = description.identity {
            attributes[identity] = key.to_value();
        }

        let relationships = description
            .relationships
            .iter()
            .map(|rel| Related::empty_for(rel.is_to_many()))
            .collect();

        let object = ObjectId(self.slots.len());
        self.slots.push(Some(Slot {
            entity,
            key: key.clone(),
            attributes,
            relationships,
        }));
        self.index.insert((entity, key), object);
        self.pending.inserted(object);

        Ok(object)
    }

    fn delete(&mut self, object: ObjectId) -> Result<()> {
        let slot = self
            .slots
            .get_mut(object.0)
            .and_then(Option::take)
            .ok_or_else(|| Error::object_not_found(object))?;
        self.index.remove(&(slot.entity, slot.key));

        // Nothing may keep pointing at a deleted object
        for (index, other) in self.slots.iter_mut().enumerate() {
            let Some(other) = other else { continue };
            let mut scrubbed = false;
            for related in &mut other.relationships {
                scrubbed |= related.remove(object);
            }
            if scrubbed {
                self.pending.updated(ObjectId(index));
            }
        }

        self.pending.deleted(object);
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        debug!(
            inserted = self.pending.inserted_objects().len(),
            updated = self.pending.updated_objects().len(),
            deleted = self.pending.deleted_objects().len(),
            "saving memory store"
        );
        self.pending.clear();
        Ok(())
    }

    fn entity_of(&self, object: ObjectId) -> Result<EntityId> {
        Ok(self.slot(object)?.entity)
    }

    fn attribute(&self, object: ObjectId, attribute: AttributeId) -> Result<Value> {
        let slot = self.slot(object)?;
        let index = Self::member_index(slot, attribute.entity, attribute.index, "attribute")?;
        Ok(slot.attributes[index].clone())
    }

    fn set_attribute(
        &mut self,
        object: ObjectId,
        attribute: AttributeId,
        value: Value,
    ) -> Result<()> {
        let identity = self.schema.entity(attribute.entity).identity;
        let slot = self.slot(object)?;
        let index = Self::member_index(slot, attribute.entity, attribute.index, "attribute")?;
        let (entity, current) = (slot.entity, slot.key.clone());

        // Rewriting the identity moves the object in the index
        if identity == Some(index) {
            let Some(key) = Key::from_value(&value) else {
                bail!("identity of {object:?} cannot be set to {value:?}");
            };

            if key != current {
                if self.index.contains_key(&(entity, key.clone())) {
                    bail!("identity `{key}` is already taken");
                }
                self.index.remove(&(entity, current));
                self.index.insert((entity, key.clone()), object);
                self.slot_mut(object)?.key = key;
            }
        }

        let slot = self.slot_mut(object)?;
        if slot.attributes[index] != value {
            slot.attributes[index] = value;
            self.pending.updated(object);
        }

        Ok(())
    }

    fn related(&self, object: ObjectId, relationship: RelationshipId) -> Result<Related> {
        let slot = self.slot(object)?;
        let index =
            Self::member_index(slot, relationship.entity, relationship.index, "relationship")?;
        Ok(slot.relationships[index].clone())
    }

    fn set_related(
        &mut self,
        object: ObjectId,
        relationship: RelationshipId,
        related: Related,
    ) -> Result<()> {
        let to_many = self.schema.relationship(relationship).is_to_many();
        if to_many != matches!(related, Related::Many(_)) {
            bail!("{relationship:?} cannot hold {related:?}");
        }

        for member in related.as_slice() {
            self.slot(*member)?;
        }

        let slot = self.slot_mut(object)?;
        let index =
            Self::member_index(slot, relationship.entity, relationship.index, "relationship")?;
        if slot.relationships[index] != related {
            slot.relationships[index] = related;
            self.pending.updated(object);
        }

        Ok(())
    }

    fn referrers(&self, object: ObjectId) -> Result<Vec<(ObjectId, RelationshipId)>> {
        self.slot(object)?;

        let mut referrers = vec![];
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(slot) = slot else { continue };
            for (rel, related) in self
                .entity(slot.entity)
                .relationships
                .iter()
                .zip(&slot.relationships)
            {
                if related.contains(object) {
                    referrers.push((ObjectId(index), rel.id));
                }
            }
        }

        Ok(referrers)
    }
}
