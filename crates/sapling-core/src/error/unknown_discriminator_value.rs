use super::Error;

/// Error when an abstract entity cannot be resolved to a concrete one.
///
/// This occurs when:
/// - The JSON object lacks the discriminator field
/// - The discriminator value has no mapped concrete entity
/// - An entity mapper returns no entity, or one outside the hierarchy
#[derive(Debug)]
pub(super) struct UnknownDiscriminatorValue {
    entity: Box<str>,
    value: Option<Box<str>>,
}

impl std::error::Error for UnknownDiscriminatorValue {}

impl core::fmt::Display for UnknownDiscriminatorValue {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown discriminator value for {}: ", self.entity)?;
        match &self.value {
            Some(value) => write!(f, "`{}`", value),
            None => f.write_str("discriminator missing"),
        }
    }
}

impl Error {
    /// Creates an unknown discriminator value error.
    ///
    /// `value` is `None` when the JSON object carried no discriminator at all.
    pub fn unknown_discriminator_value(entity: &str, value: Option<&str>) -> Error {
        Error::from(super::ErrorKind::UnknownDiscriminatorValue(
            UnknownDiscriminatorValue {
                entity: entity.into(),
                value: value.map(Into::into),
            },
        ))
    }

    /// Returns `true` if this error is an unknown discriminator value error.
    pub fn is_unknown_discriminator_value(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownDiscriminatorValue(_))
    }
}
