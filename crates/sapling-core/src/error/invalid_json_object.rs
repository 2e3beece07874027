use super::Error;

/// Error when a top-level JSON element is neither an object nor a bare
/// identity value.
#[derive(Debug)]
pub(super) struct InvalidJsonObject {
    entity: Box<str>,
    found: &'static str,
}

impl std::error::Error for InvalidJsonObject {}

impl core::fmt::Display for InvalidJsonObject {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot map {} into {}; expected object or identity value",
            self.found, self.entity
        )
    }
}

impl Error {
    /// Creates an invalid JSON object error.
    pub fn invalid_json_object(entity: &str, found: &'static str) -> Error {
        Error::from(super::ErrorKind::InvalidJsonObject(InvalidJsonObject {
            entity: entity.into(),
            found,
        }))
    }

    /// Returns `true` if this error is an invalid JSON object error.
    pub fn is_invalid_json_object(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidJsonObject(_))
    }
}
