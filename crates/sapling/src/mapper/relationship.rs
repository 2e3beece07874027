use super::Run;
use indexmap::IndexSet;
use sapling_core::{
    json_kind,
    schema::{Cardinality, Entity, MergePolicy, OrphanPolicy, Relationship},
    store::{ObjectId, Related},
    transform::JsonObject,
    Error, Result,
};
use serde_json::Value as Json;
use std::slice;

/// Maps every relationship whose key path is present in `json`.
pub(super) fn apply(
    run: &mut Run<'_>,
    owner: ObjectId,
    entity: &Entity,
    json: &JsonObject,
) -> Result<()> {
    for (rel, key_path) in entity.mapped_relationships() {
        if let Some(value) = key_path.get(json) {
            apply_one(run, owner, entity, rel, value)?;
        }
    }

    Ok(())
}

fn apply_one(
    run: &mut Run<'_>,
    owner: ObjectId,
    entity: &Entity,
    rel: &Relationship,
    json: &Json,
) -> Result<()> {
    match (rel.cardinality, json) {
        (Cardinality::ToOne, Json::Null) => assign_one(run, owner, rel, None),
        (Cardinality::ToOne, Json::Array(_)) => Err(Error::malformed_relationship_payload(
            &entity.name,
            &rel.name,
            "an object or identity value",
            "array",
        )),
        (Cardinality::ToOne, _) => {
            let target = run.map_elements(slice::from_ref(json), rel.target)?;
            assign_one(run, owner, rel, target.first().copied())
        }
        (_, Json::Null) => assign_many(run, owner, rel, vec![], MergePolicy::Replace),
        (_, Json::Array(items)) => {
            let targets = run.map_elements(items, rel.target)?;
            assign_many(run, owner, rel, targets, rel.merge)
        }
        (_, other) => Err(Error::malformed_relationship_payload(
            &entity.name,
            &rel.name,
            "array",
            json_kind(other),
        )),
    }
}

fn assign_one(
    run: &mut Run<'_>,
    owner: ObjectId,
    rel: &Relationship,
    target: Option<ObjectId>,
) -> Result<()> {
    let previous = run.store.related(owner, rel.id)?.expect_one();
    if previous == target {
        return Ok(());
    }

    run.store.set_related(owner, rel.id, Related::One(target))?;

    if let Some(previous) = previous {
        unlink_inverse(run, owner, rel, previous)?;
        removed(run, rel, previous);
    }

    if let Some(target) = target {
        link_inverse(run, owner, rel, target)?;
    }

    Ok(())
}

fn assign_many(
    run: &mut Run<'_>,
    owner: ObjectId,
    rel: &Relationship,
    targets: Vec<ObjectId>,
    merge: MergePolicy,
) -> Result<()> {
    let previous = run.store.related(owner, rel.id)?.expect_many().to_vec();

    // Repeated objects keep their first position
    let mut members = IndexSet::new();
    if merge == MergePolicy::Union {
        members.extend(previous.iter().copied());
    }
    members.extend(targets);
    let members: Vec<ObjectId> = members.into_iter().collect();

    if members == previous {
        return Ok(());
    }

    run.store
        .set_related(owner, rel.id, Related::Many(members.clone()))?;

    for object in previous.iter().filter(|object| !members.contains(object)) {
        unlink_inverse(run, owner, rel, *object)?;
        removed(run, rel, *object);
    }

    for object in members.iter().filter(|object| !previous.contains(object)) {
        link_inverse(run, owner, rel, *object)?;
    }

    Ok(())
}

fn removed(run: &mut Run<'_>, rel: &Relationship, object: ObjectId) {
    if rel.orphans == OrphanPolicy::Delete {
        run.cx.orphan_candidate(object);
    }
}

/// Adds `owner` to the inverse side of `rel` on `target`.
///
/// A to-one inverse that pointed at another owner is detached from that
/// owner's side first.
fn link_inverse(
    run: &mut Run<'_>,
    owner: ObjectId,
    rel: &Relationship,
    target: ObjectId,
) -> Result<()> {
    let schema = run.schema;
    let target_entity = run.store.entity_of(target)?;
    let Some(inverse) = schema.inverse_of(rel, target_entity) else {
        return Ok(());
    };

    match run.store.related(target, inverse.id)? {
        Related::One(current) if current == Some(owner) => Ok(()),
        Related::One(current) => {
            if let Some(previous_owner) = current {
                detach(run, previous_owner, &rel.name, target)?;
            }
            run.store
                .set_related(target, inverse.id, Related::One(Some(owner)))
        }
        Related::Many(mut members) => {
            if members.contains(&owner) {
                return Ok(());
            }
            members.push(owner);
            run.store
                .set_related(target, inverse.id, Related::Many(members))
        }
    }
}

/// Removes `owner` from the inverse side of `rel` on `target`.
fn unlink_inverse(
    run: &mut Run<'_>,
    owner: ObjectId,
    rel: &Relationship,
    target: ObjectId,
) -> Result<()> {
    let schema = run.schema;
    let target_entity = run.store.entity_of(target)?;
    let Some(inverse) = schema.inverse_of(rel, target_entity) else {
        return Ok(());
    };

    let mut related = run.store.related(target, inverse.id)?;
    if related.remove(owner) {
        run.store.set_related(target, inverse.id, related)?;
    }

    Ok(())
}

/// Removes `target` from the relationship named `name` on `owner`.
fn detach(run: &mut Run<'_>, owner: ObjectId, name: &str, target: ObjectId) -> Result<()> {
    let schema = run.schema;
    let entity = schema.entity(run.store.entity_of(owner)?);
    let Some(rel) = entity.relationship_by_name(name) else {
        return Ok(());
    };

    let mut related = run.store.related(owner, rel.id)?;
    if related.remove(target) {
        run.store.set_related(owner, rel.id, related)?;
    }

    Ok(())
}
