use indexmap::IndexSet;
use sapling_core::{schema::EntityId, store::ObjectId, Error, Key};
use std::collections::{HashMap, HashSet};

/// State shared by every step of one top-level mapping call.
#[derive(Debug, Default)]
pub(super) struct Context {
    /// Objects already resolved in this call, by concrete entity and key
    identities: HashMap<(EntityId, Key), ObjectId>,

    /// Objects this call created, in creation order
    created: Vec<ObjectId>,

    /// Objects that already had their attributes and relationships applied
    written: HashSet<ObjectId>,

    /// Objects removed from a relationship that deletes orphans
    orphans: IndexSet<ObjectId>,

    /// Attribute mismatches collected in best-effort mode
    issues: Vec<Error>,
}

impl Context {
    pub(super) fn resolved(&self, entity: EntityId, key: &Key) -> Option<ObjectId> {
        self.identities.get(&(entity, key.clone())).copied()
    }

    pub(super) fn remember(&mut self, entity: EntityId, key: Key, object: ObjectId) {
        self.identities.insert((entity, key), object);
    }

    pub(super) fn record_created(&mut self, object: ObjectId) {
        self.created.push(object);
    }

    pub(super) fn created(&self) -> &[ObjectId] {
        &self.created
    }

    /// Marks `object` as written, returning `false` if it already was.
    pub(super) fn first_write(&mut self, object: ObjectId) -> bool {
        self.written.insert(object)
    }

    pub(super) fn orphan_candidate(&mut self, object: ObjectId) {
        self.orphans.insert(object);
    }

    pub(super) fn take_orphan_candidates(&mut self) -> IndexSet<ObjectId> {
        std::mem::take(&mut self.orphans)
    }

    pub(super) fn report(&mut self, issue: Error) {
        self.issues.push(issue);
    }

    pub(super) fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub(super) fn take_issues(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.issues)
    }
}
