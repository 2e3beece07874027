//! Maps JSON documents onto stored objects described by a [`Schema`].
//!
//! ```
//! use sapling::{schema::*, Mapper, Schema};
//! use sapling_store_memory::MemoryStore;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut builder = Schema::builder();
//! builder
//!     .entity("Character")
//!     .identity("id")
//!     .attribute(AttributeDef::new("id", AttributeType::Integer))
//!     .attribute(AttributeDef::new("name", AttributeType::String));
//! let schema = Arc::new(builder.build().unwrap());
//!
//! let mapper = Mapper::builder(schema.clone()).build().unwrap();
//! let mut store = MemoryStore::new(schema.clone());
//!
//! let character = schema.entity_by_name("Character").unwrap();
//! let batman = mapper
//!     .map_object(&mut store, &json!({"id": 1699, "name": "Batman"}), character)
//!     .unwrap()
//!     .into_value();
//!
//! let again = mapper
//!     .map_object(&mut store, &json!({"id": 1699}), character)
//!     .unwrap()
//!     .into_value();
//! assert_eq!(batman, again);
//! ```

mod mapper;
pub use mapper::{Builder, DuplicatePolicy, Mapped, Mapper, MapperOptions};

mod serialize;
pub use serialize::Serializer;

pub use sapling_core::{
    bail, err, schema, store, transform, Error, Key, KeyPath, Result, Schema, Store, Value,
};
