use serde::Deserialize;

/// Tunes how a [`Mapper`](crate::Mapper) treats its input.
///
/// Every field has a default, so partial configuration deserializes:
///
/// ```
/// use sapling::{DuplicatePolicy, MapperOptions};
///
/// let options: MapperOptions =
///     serde_json::from_str(r#"{ "duplicates": "first_write_wins" }"#).unwrap();
///
/// assert_eq!(DuplicatePolicy::FirstWriteWins, options.duplicates);
/// assert!(!options.strict_attributes);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperOptions {
    /// Which occurrence of a repeated identity value writes the object
    pub duplicates: DuplicatePolicy,

    /// Abort the call on the first attribute type mismatch instead of
    /// collecting it in [`Mapped::issues`](crate::Mapped::issues)
    pub strict_attributes: bool,
}

/// Resolution of JSON elements that share an identity value within one
/// mapping call. Every occurrence resolves to the same object either way.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Every occurrence is applied in document order, so the last one wins
    #[default]
    LastWriteWins,

    /// Only the first occurrence writes attributes and relationships
    FirstWriteWins,
}
