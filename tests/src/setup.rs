use crate::fixtures;
use sapling::{
    schema::EntityId,
    store::{ObjectId, Related},
    Key, Mapped, Mapper, MapperOptions, Result, Schema, Serializer, Store, Value,
};
use sapling_store_memory::MemoryStore;
use serde_json::Value as Json;
use std::sync::Arc;

/// A mapper and an empty memory store over the comic-book schema.
pub struct Setup {
    pub schema: Arc<Schema>,
    pub mapper: Mapper,
    pub store: MemoryStore,
}

impl Setup {
    pub fn new() -> Self {
        let schema = Arc::new(fixtures::schema());
        let mapper = Self::mapper(&schema, MapperOptions::default());
        let store = MemoryStore::new(schema.clone());

        Self {
            schema,
            mapper,
            store,
        }
    }

    /// Rebuilds the mapper with `options`, keeping the store.
    pub fn set_options(&mut self, options: MapperOptions) {
        self.mapper = Self::mapper(&self.schema, options);
    }

    fn mapper(schema: &Arc<Schema>, options: MapperOptions) -> Mapper {
        Mapper::builder(schema.clone())
            .registry(fixtures::registry())
            .options(options)
            .build()
            .unwrap()
    }

    pub fn entity(&self, name: &str) -> EntityId {
        match self.schema.entity_by_name(name) {
            Some(entity) => entity.id,
            None => panic!("no entity named `{name}`"),
        }
    }

    pub fn map_object(&mut self, entity: &str, json: Json) -> Result<Mapped<ObjectId>> {
        let entity = self.entity(entity);
        self.mapper.map_object(&mut self.store, &json, entity)
    }

    pub fn map_array(&mut self, entity: &str, json: Json) -> Result<Mapped<Vec<ObjectId>>> {
        let entity = self.entity(entity);
        let Json::Array(items) = json else {
            panic!("expected a JSON array, got {json}");
        };
        self.mapper.map_array(&mut self.store, &items, entity)
    }

    /// The stored value of the attribute called `name`.
    pub fn attr(&self, object: ObjectId, name: &str) -> Value {
        let entity = self.schema.entity(self.store.entity_of(object).unwrap());
        let attr = entity
            .attribute_by_name(name)
            .unwrap_or_else(|| panic!("`{}` has no attribute `{name}`", entity.name));
        self.store.attribute(object, attr.id).unwrap()
    }

    /// Members of the relationship called `name`, whatever its cardinality.
    pub fn related(&self, object: ObjectId, name: &str) -> Vec<ObjectId> {
        let entity = self.schema.entity(self.store.entity_of(object).unwrap());
        let rel = entity
            .relationship_by_name(name)
            .unwrap_or_else(|| panic!("`{}` has no relationship `{name}`", entity.name));
        match self.store.related(object, rel.id).unwrap() {
            Related::One(one) => one.into_iter().collect(),
            Related::Many(many) => many,
        }
    }

    pub fn find(&self, entity: &str, key: impl Into<Key>) -> Option<ObjectId> {
        self.store.find(self.entity(entity), key)
    }

    pub fn entity_name(&self, object: ObjectId) -> &str {
        &self
            .schema
            .entity(self.store.entity_of(object).unwrap())
            .name
    }

    /// Number of stored objects of `entity`, descendants included.
    pub fn count(&self, entity: &str) -> usize {
        self.store.objects_of(self.entity(entity)).len()
    }

    pub fn serializer(&self) -> Serializer {
        Serializer::new(self.schema.clone(), self.mapper.registry().clone())
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::new()
    }
}
