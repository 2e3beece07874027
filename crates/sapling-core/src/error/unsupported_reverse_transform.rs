use super::Error;

/// Error when a reverse transformation is requested from a transformer that
/// was registered without an inverse.
#[derive(Debug)]
pub(super) struct UnsupportedReverseTransform {
    transformer: Box<str>,
}

impl std::error::Error for UnsupportedReverseTransform {}

impl core::fmt::Display for UnsupportedReverseTransform {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "transformer `{}` does not support reverse transformation",
            self.transformer
        )
    }
}

impl Error {
    /// Creates an unsupported reverse transform error.
    pub fn unsupported_reverse_transform(transformer: &str) -> Error {
        Error::from(super::ErrorKind::UnsupportedReverseTransform(
            UnsupportedReverseTransform {
                transformer: transformer.into(),
            },
        ))
    }

    /// Returns `true` if this error is an unsupported reverse transform error.
    pub fn is_unsupported_reverse_transform(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::UnsupportedReverseTransform(_)
        )
    }
}
