use super::Error;

/// Error when the JSON at a relationship's key path has the wrong shape for
/// the relationship's cardinality (an object for a to-many, an array for a
/// to-one).
#[derive(Debug)]
pub(super) struct MalformedRelationshipPayload {
    entity: Box<str>,
    relationship: Box<str>,
    expected: &'static str,
    found: &'static str,
}

impl std::error::Error for MalformedRelationshipPayload {}

impl core::fmt::Display for MalformedRelationshipPayload {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "malformed relationship payload: {}.{} expects {}, found {}",
            self.entity, self.relationship, self.expected, self.found
        )
    }
}

impl Error {
    /// Creates a malformed relationship payload error.
    pub fn malformed_relationship_payload(
        entity: &str,
        relationship: &str,
        expected: &'static str,
        found: &'static str,
    ) -> Error {
        Error::from(super::ErrorKind::MalformedRelationshipPayload(
            MalformedRelationshipPayload {
                entity: entity.into(),
                relationship: relationship.into(),
                expected,
                found,
            },
        ))
    }

    /// Returns `true` if this error is a malformed relationship payload error.
    pub fn is_malformed_relationship_payload(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::MalformedRelationshipPayload(_)
        )
    }
}
