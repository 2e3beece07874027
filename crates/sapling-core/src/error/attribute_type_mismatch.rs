use super::Error;
use crate::Value;

/// Error when a JSON value cannot be coerced into an attribute's declared
/// type.
#[derive(Debug)]
pub(super) struct AttributeTypeMismatch {
    entity: Box<str>,
    attribute: Box<str>,
    expected: Box<str>,
    found: Value,
}

impl std::error::Error for AttributeTypeMismatch {}

impl core::fmt::Display for AttributeTypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "attribute type mismatch: {}.{} expects {}, found {:?}",
            self.entity, self.attribute, self.expected, self.found
        )
    }
}

impl Error {
    /// Creates an attribute type mismatch error.
    ///
    /// Mapping reports these per attribute and keeps going with the
    /// remaining attributes of the object.
    pub fn attribute_type_mismatch(
        entity: &str,
        attribute: &str,
        expected: impl core::fmt::Display,
        found: &Value,
    ) -> Error {
        Error::from(super::ErrorKind::AttributeTypeMismatch(
            AttributeTypeMismatch {
                entity: entity.into(),
                attribute: attribute.into(),
                expected: expected.to_string().into(),
                found: found.clone(),
            },
        ))
    }

    /// Returns `true` if this error is an attribute type mismatch error.
    pub fn is_attribute_type_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AttributeTypeMismatch(_))
    }
}
