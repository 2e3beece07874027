use super::Error;
use crate::Value;

/// Error when a transformer function rejects its input.
#[derive(Debug)]
pub(super) struct InvalidTransformInput {
    transformer: Box<str>,
    value: Value,
}

impl std::error::Error for InvalidTransformInput {}

impl core::fmt::Display for InvalidTransformInput {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "transformer `{}` rejected {:?}",
            self.transformer, self.value
        )
    }
}

impl Error {
    /// Creates an invalid transform input error.
    pub fn invalid_transform_input(transformer: &str, value: &Value) -> Error {
        Error::from(super::ErrorKind::InvalidTransformInput(
            InvalidTransformInput {
                transformer: transformer.into(),
                value: value.clone(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid transform input error.
    pub fn is_invalid_transform_input(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidTransformInput(_))
    }
}
