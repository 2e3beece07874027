use indexmap::IndexSet;
use sapling_core::store::ObjectId;

/// Objects changed since the last save.
///
/// An object is listed once: objects inserted and then updated stay
/// inserted, objects inserted and then deleted drop out entirely.
#[derive(Debug, Default)]
pub struct Pending {
    inserted: IndexSet<ObjectId>,
    updated: IndexSet<ObjectId>,
    deleted: IndexSet<ObjectId>,
}

impl Pending {
    pub fn inserted_objects(&self) -> &IndexSet<ObjectId> {
        &self.inserted
    }

    pub fn updated_objects(&self) -> &IndexSet<ObjectId> {
        &self.updated
    }

    pub fn deleted_objects(&self) -> &IndexSet<ObjectId> {
        &self.deleted
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    pub(crate) fn inserted(&mut self, object: ObjectId) {
        self.inserted.insert(object);
    }

    pub(crate) fn updated(&mut self, object: ObjectId) {
        if !self.inserted.contains(&object) {
            self.updated.insert(object);
        }
    }

    pub(crate) fn deleted(&mut self, object: ObjectId) {
        self.updated.shift_remove(&object);
        if !self.inserted.shift_remove(&object) {
            self.deleted.insert(object);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.inserted.clear();
        self.updated.clear();
        self.deleted.clear();
    }
}
