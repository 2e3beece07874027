use sapling_core::{
    schema::{Entity, EntityId, Polymorphism},
    transform::{JsonObject, Registry},
    Error, Result, Schema,
};
use serde_json::Value as Json;
use tracing::trace;

/// Picks the concrete entity `object` maps to.
///
/// Concrete entities resolve to themselves. Abstract entities consult their
/// discriminator or entity mapper, repeatedly, until a concrete descendant
/// is reached.
pub(super) fn resolve(
    schema: &Schema,
    registry: &Registry,
    entity: &Entity,
    object: &JsonObject,
) -> Result<EntityId> {
    let mut current = entity;

    // Each step moves strictly down the hierarchy, so this terminates
    // within the depth of the schema.
    while let Some(polymorphism) = current.polymorphism() {
        let selected = match polymorphism {
            Polymorphism::Discriminator { key_path, variants } => {
                let Some(value) = key_path.get(object).and_then(discriminator_text) else {
                    return Err(Error::unknown_discriminator_value(&current.name, None));
                };

                match variants.get(&value) {
                    Some(id) => *id,
                    None => {
                        return Err(Error::unknown_discriminator_value(
                            &current.name,
                            Some(&value),
                        ))
                    }
                }
            }
            Polymorphism::Mapper(name) => {
                let Some(selected) = registry.map_entity(name, object)? else {
                    return Err(Error::unknown_discriminator_value(&current.name, None));
                };

                match schema.entity_by_name(&selected) {
                    Some(selected) => selected.id,
                    None => {
                        return Err(Error::unknown_discriminator_value(
                            &current.name,
                            Some(&selected),
                        ))
                    }
                }
            }
        };

        if selected == current.id || !schema.is_kind_of(selected, current) {
            return Err(Error::unknown_discriminator_value(
                &current.name,
                Some(&schema.entity(selected).name),
            ));
        }

        trace!(from = %current.name, to = %schema.entity(selected).name, "resolved subtype");
        current = schema.entity(selected);
    }

    Ok(current.id)
}

/// Discriminators match on text; numbers and booleans use their canonical
/// form.
fn discriminator_text(value: &Json) -> Option<String> {
    match value {
        Json::String(value) => Some(value.clone()),
        Json::Number(value) if value.is_i64() || value.is_u64() => Some(value.to_string()),
        Json::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}
