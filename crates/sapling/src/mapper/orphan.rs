use super::Run;
use sapling_core::{
    schema::{OrphanPolicy, RelationshipId},
    store::ObjectId,
    Result,
};
use tracing::debug;

/// Deletes orphan candidates that nothing references any more.
///
/// Runs once the whole call has mapped, so an object removed in one place
/// and referenced again later in the document survives. Objects in `keep`
/// are the call's own results and are never deleted.
pub(super) fn cleanup(run: &mut Run<'_>, keep: &[ObjectId]) -> Result<()> {
    for candidate in run.cx.take_orphan_candidates() {
        if keep.contains(&candidate) {
            continue;
        }

        match run.store.entity_of(candidate) {
            Ok(_) => {}
            Err(err) if err.is_object_not_found() => continue,
            Err(err) => return Err(err),
        }

        if !is_referenced(run, candidate)? {
            debug!(object = ?candidate, "deleting orphan");
            run.store.delete(candidate)?;
        }
    }

    Ok(())
}

fn is_referenced(run: &Run<'_>, candidate: ObjectId) -> Result<bool> {
    for (referrer, rel) in run.store.referrers(candidate)? {
        if !mirrors_own_link(run, candidate, referrer, rel)? {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Returns `true` if `referrer` only points at `candidate` as the inverse of
/// a link the candidate holds itself. Relationships that delete their
/// orphans always count as references.
fn mirrors_own_link(
    run: &Run<'_>,
    candidate: ObjectId,
    referrer: ObjectId,
    rel: RelationshipId,
) -> Result<bool> {
    let rel = run.schema.relationship(rel);
    if rel.orphans == OrphanPolicy::Delete {
        return Ok(false);
    }

    let Some(inverse) = &rel.inverse else {
        return Ok(false);
    };

    let entity = run.schema.entity(run.store.entity_of(candidate)?);
    let Some(own) = entity.relationship_by_name(inverse) else {
        return Ok(false);
    };

    Ok(run.store.related(candidate, own.id)?.contains(referrer))
}
