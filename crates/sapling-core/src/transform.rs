//! Named value transformers, entity mappers and dictionary transformers.
//!
//! A [`Registry`] is filled once at startup and then shared read-only with
//! the mapper and serializer.

mod registry;
pub use registry::Registry;

mod transformer;
pub use transformer::ValueTransformer;

use serde_json::{Map, Value as Json};

/// A JSON object as handed to entity mappers and dictionary transformers.
pub type JsonObject = Map<String, Json>;
