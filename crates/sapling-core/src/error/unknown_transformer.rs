use super::Error;

/// Error when a schema refers to a transformer, entity mapper or dictionary
/// transformer name that is not registered.
#[derive(Debug)]
pub(super) struct UnknownTransformer {
    name: Box<str>,
}

impl std::error::Error for UnknownTransformer {}

impl core::fmt::Display for UnknownTransformer {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no transformer registered as `{}`", self.name)
    }
}

impl Error {
    /// Creates an unknown transformer error.
    pub fn unknown_transformer(name: &str) -> Error {
        Error::from(super::ErrorKind::UnknownTransformer(UnknownTransformer {
            name: name.into(),
        }))
    }

    /// Returns `true` if this error is an unknown transformer error.
    pub fn is_unknown_transformer(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownTransformer(_))
    }
}
