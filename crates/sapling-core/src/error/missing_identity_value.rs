use super::Error;

/// Error when a JSON object has no usable value for its entity's identity
/// attribute.
#[derive(Debug)]
pub(super) struct MissingIdentityValue {
    entity: Box<str>,
    key_path: Box<str>,
}

impl std::error::Error for MissingIdentityValue {}

impl core::fmt::Display for MissingIdentityValue {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "missing identity value for {} at `{}`",
            self.entity, self.key_path
        )
    }
}

impl Error {
    /// Creates a missing identity value error.
    ///
    /// Raised when the identity key path is absent or holds `null`.
    pub fn missing_identity_value(entity: &str, key_path: &str) -> Error {
        Error::from(super::ErrorKind::MissingIdentityValue(MissingIdentityValue {
            entity: entity.into(),
            key_path: key_path.into(),
        }))
    }

    /// Returns `true` if this error is a missing identity value error.
    pub fn is_missing_identity_value(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingIdentityValue(_))
    }
}
