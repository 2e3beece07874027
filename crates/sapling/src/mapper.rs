mod attribute;
mod context;
mod identity;
mod options;
mod orphan;
mod polymorphic;
mod relationship;

pub use options::{DuplicatePolicy, MapperOptions};

use context::Context;
use sapling_core::{
    err,
    schema::{Entity, EntityId, Polymorphism},
    store::ObjectId,
    transform::{JsonObject, Registry},
    Error, Result, Schema, Store,
};
use serde_json::Value as Json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maps JSON onto objects held by a [`Store`].
///
/// A mapper holds shared, read-only state and can be cloned and used from
/// several threads. Each mapping call borrows the store it writes to.
#[derive(Debug, Clone)]
pub struct Mapper {
    schema: Arc<Schema>,
    registry: Arc<Registry>,
    options: MapperOptions,
}

#[derive(Debug)]
pub struct Builder {
    schema: Arc<Schema>,
    registry: Arc<Registry>,
    options: MapperOptions,
}

/// The result of a mapping call.
#[derive(Debug)]
pub struct Mapped<T> {
    pub value: T,

    /// Attribute type mismatches skipped over while mapping
    pub issues: Vec<Error>,
}

/// One top-level mapping call in progress.
struct Run<'a> {
    schema: &'a Schema,
    registry: &'a Registry,
    options: &'a MapperOptions,
    store: &'a mut dyn Store,
    cx: Context,
}

/// A JSON element ready for identity resolution.
struct Prepared {
    index: usize,

    /// Concrete entity the element maps to
    entity: EntityId,

    object: JsonObject,

    /// Bare identity values only reference an object
    reference: bool,
}

impl Mapper {
    pub fn new(schema: Arc<Schema>, registry: Arc<Registry>) -> Self {
        Self {
            schema,
            registry,
            options: MapperOptions::default(),
        }
    }

    pub fn builder(schema: Arc<Schema>) -> Builder {
        Builder {
            schema,
            registry: Arc::default(),
            options: MapperOptions::default(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Maps one JSON object, or a bare identity value, onto an object of
    /// `entity`.
    pub fn map_object(
        &self,
        store: &mut dyn Store,
        json: &Json,
        entity: impl Into<EntityId>,
    ) -> Result<Mapped<ObjectId>> {
        let entity = self.schema.entity(entity);

        if json.is_array() || json.is_null() {
            return Err(Error::invalid_json_object(
                &entity.name,
                sapling_core::json_kind(json),
            ));
        }

        let mut run = Run::new(self, store);
        let result = run
            .map_elements(std::slice::from_ref(json), entity.id)
            .map(|mut objects| objects.remove(0));
        let keep: Vec<_> = result.iter().copied().collect();
        run.finish(entity, result, &keep)
    }

    /// Maps every element of `json` onto objects of `entity`.
    ///
    /// The result holds one handle per non-null element, in input order.
    /// Elements sharing an identity value share a handle.
    pub fn map_array(
        &self,
        store: &mut dyn Store,
        json: &[Json],
        entity: impl Into<EntityId>,
    ) -> Result<Mapped<Vec<ObjectId>>> {
        let entity = self.schema.entity(entity);
        let mut run = Run::new(self, store);
        let result = run.map_elements(json, entity.id);
        let keep: Vec<_> = result.iter().flatten().copied().collect();
        run.finish(entity, result, &keep)
    }

    /// Maps a JSON array, or a single object treated as a one-element
    /// array.
    pub fn map(
        &self,
        store: &mut dyn Store,
        json: &Json,
        entity: impl Into<EntityId>,
    ) -> Result<Mapped<Vec<ObjectId>>> {
        match json {
            Json::Array(items) => self.map_array(store, items, entity),
            _ => {
                let mapped = self.map_object(store, json, entity)?;
                Ok(Mapped {
                    value: vec![mapped.value],
                    issues: mapped.issues,
                })
            }
        }
    }
}

impl Builder {
    pub fn registry(&mut self, registry: impl Into<Arc<Registry>>) -> &mut Self {
        self.registry = registry.into();
        self
    }

    pub fn options(&mut self, options: MapperOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn duplicates(&mut self, policy: DuplicatePolicy) -> &mut Self {
        self.options.duplicates = policy;
        self
    }

    pub fn strict_attributes(&mut self, strict: bool) -> &mut Self {
        self.options.strict_attributes = strict;
        self
    }

    /// Builds the mapper, checking that every transformer the schema names
    /// is registered.
    pub fn build(&self) -> Result<Mapper> {
        for entity in self.schema.entities() {
            self.verify_entity(entity)?;
        }

        Ok(Mapper {
            schema: self.schema.clone(),
            registry: self.registry.clone(),
            options: self.options.clone(),
        })
    }

    fn verify_entity(&self, entity: &Entity) -> Result<()> {
        for attr in &entity.attributes {
            if let Some(name) = &attr.transformer {
                if !self.registry.contains(name) {
                    return Err(Error::unknown_transformer(name)
                        .context(err!("attribute `{}.{}`", entity.name, attr.name)));
                }
            }
        }

        if let Some(name) = &entity.dictionary_transformer {
            if !self.registry.contains_dictionary_transformer(name) {
                return Err(Error::unknown_transformer(name)
                    .context(err!("dictionary transformer of `{}`", entity.name)));
            }
        }

        if let Some(Polymorphism::Mapper(name)) = entity.polymorphism() {
            if !self.registry.contains_entity_mapper(name) {
                return Err(Error::unknown_transformer(name)
                    .context(err!("entity mapper of `{}`", entity.name)));
            }
        }

        Ok(())
    }
}

impl<T> Mapped<T> {
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns `true` if every attribute mapped cleanly.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl<'a> Run<'a> {
    fn new(mapper: &'a Mapper, store: &'a mut dyn Store) -> Self {
        Run {
            schema: &mapper.schema,
            registry: &mapper.registry,
            options: &mapper.options,
            store,
            cx: Context::default(),
        }
    }

    /// Maps a batch of JSON elements declared as `entity`.
    ///
    /// Elements are resolved to their concrete entity first, then identity
    /// lookups are batched per concrete entity, then each element is
    /// applied in input order.
    fn map_elements(&mut self, json: &[Json], entity: EntityId) -> Result<Vec<ObjectId>> {
        let schema = self.schema;
        let declared = schema.entity(entity);

        let mut prepared = Vec::with_capacity(json.len());
        for (index, element) in json.iter().enumerate() {
            if element.is_null() {
                continue;
            }

            let element = self
                .prepare(declared, index, element)
                .map_err(|err| err.context(element_context(declared, index)))?;
            prepared.push(element);
        }

        let objects = self.resolve_identities(declared, &prepared)?;

        for (element, object) in prepared.iter().zip(&objects) {
            if element.reference {
                continue;
            }

            if self.options.duplicates == DuplicatePolicy::FirstWriteWins
                && !self.cx.first_write(*object)
            {
                continue;
            }

            self.populate(*object, element)
                .map_err(|err| err.context(element_context(declared, element.index)))?;
        }

        Ok(objects)
    }

    fn prepare(&self, declared: &Entity, index: usize, element: &Json) -> Result<Prepared> {
        let schema = self.schema;

        if let Json::Object(object) = element {
            let mut object = object.clone();
            if let Some(name) = &declared.dictionary_transformer {
                object = self.registry.transform_dictionary(name, object)?;
            }

            let concrete = polymorphic::resolve(schema, self.registry, declared, &object)?;
            let concrete = schema.entity(concrete);

            if let Some(name) = &concrete.dictionary_transformer {
                if concrete.dictionary_transformer != declared.dictionary_transformer {
                    object = self.registry.transform_dictionary(name, object)?;
                }
            }

            return Ok(Prepared {
                index,
                entity: concrete.id,
                object,
                reference: false,
            });
        }

        if element.is_array() {
            return Err(Error::invalid_json_object(&declared.name, "array"));
        }

        // A scalar stands for the identity value of a concrete entity
        if declared.is_abstract() {
            return Err(Error::unknown_discriminator_value(&declared.name, None));
        }

        let object = identity::reference_object(declared, element);
        Ok(Prepared {
            index,
            entity: declared.id,
            object,
            reference: true,
        })
    }

    fn resolve_identities(
        &mut self,
        declared: &Entity,
        prepared: &[Prepared],
    ) -> Result<Vec<ObjectId>> {
        let schema = self.schema;
        let mut objects = vec![None; prepared.len()];

        // Group element positions by concrete entity, keeping first-seen order
        let mut groups = indexmap::IndexMap::<EntityId, Vec<usize>>::new();
        for (position, element) in prepared.iter().enumerate() {
            groups.entry(element.entity).or_default().push(position);
        }

        for (entity, positions) in groups {
            let entity = schema.entity(entity);
            let mut keys = Vec::with_capacity(positions.len());

            for &position in &positions {
                let element = &prepared[position];
                let key = identity::key(self.registry, entity, &element.object)
                    .map_err(|err| err.context(element_context(declared, element.index)))?;
                keys.push(key);
            }

            let resolved = identity::resolve(self, entity, &keys)?;
            for (position, object) in positions.into_iter().zip(resolved) {
                objects[position] = Some(object);
            }
        }

        Ok(objects.into_iter().flatten().collect())
    }

    fn populate(&mut self, object: ObjectId, element: &Prepared) -> Result<()> {
        let schema = self.schema;
        let entity = schema.entity(element.entity);
        attribute::apply(self, object, entity, &element.object)?;
        relationship::apply(self, object, entity, &element.object)
    }

    /// Ends the call: cleans up orphans after success, removes created
    /// objects after failure.
    fn finish<T>(
        mut self,
        entity: &Entity,
        result: Result<T>,
        keep: &[ObjectId],
    ) -> Result<Mapped<T>> {
        let result = result.and_then(|value| {
            orphan::cleanup(&mut self, keep)?;
            Ok(value)
        });

        match result {
            Ok(value) => {
                debug!(
                    entity = %entity.name,
                    created = self.cx.created().len(),
                    issues = self.cx.issue_count(),
                    "mapped JSON"
                );
                Ok(Mapped {
                    value,
                    issues: self.cx.take_issues(),
                })
            }
            Err(err) => {
                debug!(entity = %entity.name, error = %err, "mapping failed, rolling back");
                if let Err(rollback) = self.roll_back() {
                    warn!(entity = %entity.name, error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Deletes every object this call created that is still in the store.
    fn roll_back(&mut self) -> Result<()> {
        for object in self.cx.created().iter().rev() {
            match self.store.delete(*object) {
                Ok(()) => {}
                Err(err) if err.is_object_not_found() => {}
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

fn element_context(entity: &Entity, index: usize) -> Error {
    err!("mapping `{}` element [{}]", entity.name, index)
}
