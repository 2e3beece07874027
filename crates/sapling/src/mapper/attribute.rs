use super::Run;
use sapling_core::{
    schema::{Attribute, Entity},
    store::ObjectId,
    transform::{JsonObject, Registry},
    Error, Result, Value,
};
use serde_json::Value as Json;
use tracing::{trace, warn};

/// Writes every mapped attribute present in `json` onto `object`.
///
/// Absent key paths leave the stored value alone. Type mismatches are
/// reported and skipped unless the mapper is strict.
pub(super) fn apply(
    run: &mut Run<'_>,
    object: ObjectId,
    entity: &Entity,
    json: &JsonObject,
) -> Result<()> {
    for (attr, key_path) in entity.mapped_attributes() {
        let Some(raw) = key_path.get(json) else {
            continue;
        };

        match value_for(run.registry, entity, attr, raw) {
            Ok(value) => {
                trace!(entity = %entity.name, attribute = %attr.name, ?value, "set attribute");
                run.store.set_attribute(object, attr.id, value)?;
            }
            Err(err) if err.is_attribute_type_mismatch() && !run.options.strict_attributes => {
                warn!(error = %err, "skipping attribute");
                run.cx.report(err);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

/// Converts a raw JSON value into the value stored for `attr`.
pub(super) fn value_for(
    registry: &Registry,
    entity: &Entity,
    attr: &Attribute,
    raw: &Json,
) -> Result<Value> {
    if raw.is_null() {
        if !attr.nullable {
            return Err(Error::attribute_type_mismatch(
                &entity.name,
                &attr.name,
                format_args!("non-null {}", attr.ty),
                &Value::Null,
            ));
        }
        return Ok(Value::Null);
    }

    let mut value = Value::from_json(raw);

    if let Some(name) = &attr.transformer {
        value = match registry.transform(name, value.clone()) {
            Ok(transformed) => transformed,
            Err(err) if err.is_invalid_transform_input() => {
                return Err(err.context(Error::attribute_type_mismatch(
                    &entity.name,
                    &attr.name,
                    attr.ty,
                    &value,
                )))
            }
            Err(err) => return Err(err),
        };
    }

    attr.ty
        .coerce(value)
        .map_err(|found| Error::attribute_type_mismatch(&entity.name, &attr.name, attr.ty, &found))
}
