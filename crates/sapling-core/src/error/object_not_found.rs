use super::Error;
use crate::store::ObjectId;

/// Error when a store is handed an object handle it does not hold, usually
/// because the object was deleted.
#[derive(Debug)]
pub(super) struct ObjectNotFound {
    object: ObjectId,
}

impl std::error::Error for ObjectNotFound {}

impl core::fmt::Display for ObjectNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "object not found: {:?}", self.object)
    }
}

impl Error {
    /// Creates an object not found error.
    pub fn object_not_found(object: ObjectId) -> Error {
        Error::from(super::ErrorKind::ObjectNotFound(ObjectNotFound { object }))
    }

    /// Returns `true` if this error is an object not found error.
    pub fn is_object_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ObjectNotFound(_))
    }
}
