use sapling_core::{
    schema::{Attribute, Relationship, RelationshipId},
    store::{ObjectId, Related},
    transform::{JsonObject, Registry},
    Result, Schema, Store, Value,
};
use serde_json::Value as Json;
use std::{collections::HashSet, sync::Arc};

/// Turns stored objects back into JSON shaped by the schema's key paths.
#[derive(Debug, Clone)]
pub struct Serializer {
    schema: Arc<Schema>,
    registry: Arc<Registry>,
}

struct Walk<'a> {
    schema: &'a Schema,
    registry: &'a Registry,
    store: &'a dyn Store,

    /// Relationships on the current path; their inverses are skipped
    entered: Vec<RelationshipId>,

    /// Objects on the current path, written by identity when reached again
    path: HashSet<ObjectId>,
}

impl Serializer {
    pub fn new(schema: Arc<Schema>, registry: Arc<Registry>) -> Self {
        Self { schema, registry }
    }

    pub fn to_json(&self, store: &dyn Store, object: ObjectId) -> Result<Json> {
        self.walk(store).object(object).map(Json::Object)
    }

    pub fn to_json_array(&self, store: &dyn Store, objects: &[ObjectId]) -> Result<Json> {
        objects
            .iter()
            .map(|object| self.to_json(store, *object))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array)
    }

    fn walk<'a>(&'a self, store: &'a dyn Store) -> Walk<'a> {
        Walk {
            schema: &self.schema,
            registry: &self.registry,
            store,
            entered: vec![],
            path: HashSet::new(),
        }
    }
}

impl Walk<'_> {
    fn object(&mut self, object: ObjectId) -> Result<JsonObject> {
        let schema = self.schema;
        let entity = schema.entity(self.store.entity_of(object)?);
        let mut json = JsonObject::new();
        self.path.insert(object);

        for (attr, key_path) in entity.mapped_attributes() {
            let value = self.store.attribute(object, attr.id)?;
            key_path.set(&mut json, self.attribute(attr, value)?);
        }

        for (rel, key_path) in entity.mapped_relationships() {
            if self.inverse_entered(rel) {
                continue;
            }
            self.entered.push(rel.id);

            let value = match self.store.related(object, rel.id)? {
                Related::One(None) => Json::Null,
                Related::One(Some(target)) => self.related(rel, target)?,
                Related::Many(members) => Json::Array(
                    members
                        .into_iter()
                        .map(|target| self.related(rel, target))
                        .collect::<Result<_>>()?,
                ),
            };
            key_path.set(&mut json, value);

            self.entered.pop();
        }

        self.path.remove(&object);
        Ok(json)
    }

    fn related(&mut self, rel: &Relationship, target: ObjectId) -> Result<Json> {
        if !rel.by_identity && !self.path.contains(&target) {
            return self.object(target).map(Json::Object);
        }

        let schema = self.schema;
        let entity = schema.entity(self.store.entity_of(target)?);
        let identity = entity
            .identity_attribute()
            .expect("concrete entities have an identity attribute");
        let value = self.store.attribute(target, identity.id)?;
        self.attribute(identity, value)
    }

    fn attribute(&self, attr: &Attribute, value: Value) -> Result<Json> {
        let value = match &attr.transformer {
            Some(name) if !value.is_null() && self.registry.allows_reverse(name) => {
                self.registry.reverse_transform(name, value)?
            }
            _ => value,
        };

        Ok(value.to_json())
    }

    /// Returns `true` if the relationship pairing with `rel` is being
    /// serialized higher up.
    fn inverse_entered(&self, rel: &Relationship) -> bool {
        let Some(inverse) = &rel.inverse else {
            return false;
        };

        self.entered.iter().any(|id| {
            let entered = self.schema.relationship(*id);
            entered.name == *inverse && self.schema.is_kind_of(id.entity, rel.target)
        })
    }
}
