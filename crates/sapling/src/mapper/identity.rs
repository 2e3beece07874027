use super::{attribute, Run};
use indexmap::IndexSet;
use sapling_core::{
    schema::Entity,
    store::ObjectId,
    transform::{JsonObject, Registry},
    Error, Key, Result,
};
use serde_json::Value as Json;
use tracing::debug;

/// Builds the JSON object a bare identity value stands for.
pub(super) fn reference_object(entity: &Entity, value: &Json) -> JsonObject {
    let identity = entity
        .identity_attribute()
        .expect("concrete entities have an identity attribute");
    let key_path = identity
        .key_path
        .as_ref()
        .expect("identity attributes have a key path");

    key_path.wrap(value.clone())
}

/// Extracts the identity key of `object`, applying the identity
/// attribute's transformer and type.
pub(super) fn key(registry: &Registry, entity: &Entity, object: &JsonObject) -> Result<Key> {
    let identity = entity
        .identity_attribute()
        .expect("concrete entities have an identity attribute");
    let key_path = identity
        .key_path
        .as_ref()
        .expect("identity attributes have a key path");

    let raw = match key_path.get(object) {
        None | Some(Json::Null) => {
            return Err(Error::missing_identity_value(
                &entity.name,
                &key_path.to_string(),
            ))
        }
        Some(raw) => raw,
    };

    let value = attribute::value_for(registry, entity, identity, raw)?;

    match Key::from_value(&value) {
        Some(key) => Ok(key),
        None => Err(Error::attribute_type_mismatch(
            &entity.name,
            &identity.name,
            identity.ty,
            &value,
        )),
    }
}

/// Finds or creates one object per key, in order.
///
/// Keys already resolved in this call are reused. The rest are looked up in
/// one batch; those the store does not know are created in order of first
/// appearance.
pub(super) fn resolve(run: &mut Run<'_>, entity: &Entity, keys: &[Key]) -> Result<Vec<ObjectId>> {
    let pending: IndexSet<&Key> = keys
        .iter()
        .filter(|key| run.cx.resolved(entity.id, key).is_none())
        .collect();

    if !pending.is_empty() {
        let lookup: Vec<Key> = pending.iter().map(|key| (*key).clone()).collect();
        let found = run.store.find_by_identity(entity.id, &lookup)?;
        let mut created = 0;

        for key in lookup {
            let object = match found.get(&key) {
                Some(object) => *object,
                None => {
                    let object = run.store.create_new(entity.id, key.clone())?;
                    run.cx.record_created(object);
                    created += 1;
                    object
                }
            };
            run.cx.remember(entity.id, key, object);
        }

        debug!(
            entity = %entity.name,
            elements = keys.len(),
            found = found.len(),
            created,
            "resolved identities"
        );
    }

    Ok(keys
        .iter()
        .map(|key| {
            run.cx
                .resolved(entity.id, key)
                .expect("every key was resolved above")
        })
        .collect())
}
