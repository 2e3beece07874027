use super::{JsonObject, ValueTransformer};
use crate::{Error, Result, Value};
use indexmap::IndexMap;
use std::{fmt, sync::Arc};

type EntityMapperFn = dyn Fn(&JsonObject) -> Option<String> + Send + Sync;
type DictionaryFn = dyn Fn(JsonObject) -> JsonObject + Send + Sync;

/// Named transformers looked up by attributes and entities.
///
/// Registering under an existing name replaces the previous entry.
#[derive(Clone, Default)]
pub struct Registry {
    transformers: IndexMap<String, ValueTransformer>,
    entity_mappers: IndexMap<String, Arc<EntityMapperFn>>,
    dictionary_transformers: IndexMap<String, Arc<DictionaryFn>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, transformer: ValueTransformer) -> &mut Self {
        self.transformers.insert(name.to_string(), transformer);
        self
    }

    /// Registers a one-way transformer from a typed function.
    ///
    /// ```
    /// use sapling_core::{transform::Registry, Value};
    ///
    /// let mut registry = Registry::new();
    /// registry.register_fn("Uppercase", |s: String| Some(s.to_uppercase()));
    ///
    /// assert_eq!(
    ///     Value::from("DC"),
    ///     registry.transform("Uppercase", Value::from("dc")).unwrap()
    /// );
    /// ```
    pub fn register_fn<T, U>(
        &mut self,
        name: &str,
        forward: impl Fn(T) -> Option<U> + Send + Sync + 'static,
    ) -> &mut Self
    where
        T: TryFrom<Value>,
        U: Into<Value>,
    {
        self.register(name, ValueTransformer::typed(forward))
    }

    /// Registers a transformer and its inverse from typed functions.
    pub fn register_reversible<T, U>(
        &mut self,
        name: &str,
        forward: impl Fn(T) -> Option<U> + Send + Sync + 'static,
        reverse: impl Fn(U) -> Option<T> + Send + Sync + 'static,
    ) -> &mut Self
    where
        T: TryFrom<Value> + Into<Value>,
        U: TryFrom<Value> + Into<Value>,
    {
        self.register(name, ValueTransformer::typed_reversible(forward, reverse))
    }

    pub fn transformer(&self, name: &str) -> Result<&ValueTransformer> {
        self.transformers
            .get(name)
            .ok_or_else(|| Error::unknown_transformer(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transformers.contains_key(name)
    }

    /// Returns `true` if `name` is registered with an inverse.
    pub fn allows_reverse(&self, name: &str) -> bool {
        self.transformers
            .get(name)
            .is_some_and(ValueTransformer::allows_reverse)
    }

    pub fn transform(&self, name: &str, value: Value) -> Result<Value> {
        let transformer = self.transformer(name)?;
        let input = value.clone();
        transformer
            .transform(value)
            .ok_or_else(|| Error::invalid_transform_input(name, &input))
    }

    pub fn reverse_transform(&self, name: &str, value: Value) -> Result<Value> {
        let transformer = self.transformer(name)?;
        let input = value.clone();
        match transformer.reverse_transform(value) {
            None => Err(Error::unsupported_reverse_transform(name)),
            Some(None) => Err(Error::invalid_transform_input(name, &input)),
            Some(Some(value)) => Ok(value),
        }
    }

    /// Registers a function that names the concrete entity for a JSON object.
    pub fn register_entity_mapper(
        &mut self,
        name: &str,
        mapper: impl Fn(&JsonObject) -> Option<String> + Send + Sync + 'static,
    ) -> &mut Self {
        self.entity_mappers.insert(name.to_string(), Arc::new(mapper));
        self
    }

    pub fn contains_entity_mapper(&self, name: &str) -> bool {
        self.entity_mappers.contains_key(name)
    }

    pub fn map_entity(&self, name: &str, object: &JsonObject) -> Result<Option<String>> {
        let mapper = self
            .entity_mappers
            .get(name)
            .ok_or_else(|| Error::unknown_transformer(name))?;
        Ok(mapper(object))
    }

    /// Registers a function that rewrites JSON objects before they are mapped.
    pub fn register_dictionary_transformer(
        &mut self,
        name: &str,
        transformer: impl Fn(JsonObject) -> JsonObject + Send + Sync + 'static,
    ) -> &mut Self {
        self.dictionary_transformers
            .insert(name.to_string(), Arc::new(transformer));
        self
    }

    pub fn contains_dictionary_transformer(&self, name: &str) -> bool {
        self.dictionary_transformers.contains_key(name)
    }

    pub fn transform_dictionary(&self, name: &str, object: JsonObject) -> Result<JsonObject> {
        let transformer = self
            .dictionary_transformers
            .get(name)
            .ok_or_else(|| Error::unknown_transformer(name))?;
        Ok(transformer(object))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Registry")
            .field("transformers", &self.transformers)
            .field("entity_mappers", &self.entity_mappers.keys())
            .field(
                "dictionary_transformers",
                &self.dictionary_transformers.keys(),
            )
            .finish()
    }
}
