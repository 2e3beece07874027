use super::Value;
use std::fmt;
use uuid::Uuid;

/// An identity attribute value.
///
/// Keys are the hashable subset of [`Value`]: stores index objects by
/// `(EntityId, Key)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Bool(bool),
    I64(i64),
    String(String),
    Uuid(Uuid),
}

impl Key {
    /// Converts a value into a key. Returns `None` for null, floats, lists
    /// and JSON objects, none of which can identify an object.
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Bool(v) => Some(Key::Bool(*v)),
            Value::I64(v) => Some(Key::I64(*v)),
            Value::String(v) => Some(Key::String(v.clone())),
            Value::Uuid(v) => Some(Key::Uuid(*v)),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        self.clone().into()
    }
}

impl TryFrom<Value> for Key {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Key::from_value(&value).ok_or(value)
    }
}

impl From<i64> for Key {
    fn from(src: i64) -> Self {
        Key::I64(src)
    }
}

impl From<&str> for Key {
    fn from(src: &str) -> Self {
        Key::String(src.to_string())
    }
}

impl From<String> for Key {
    fn from(src: String) -> Self {
        Key::String(src)
    }
}

impl From<Uuid> for Key {
    fn from(src: Uuid) -> Self {
        Key::Uuid(src)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(v) => write!(f, "{v}"),
            Key::I64(v) => write!(f, "{v}"),
            Key::String(v) => f.write_str(v),
            Key::Uuid(v) => write!(f, "{}", v.hyphenated()),
        }
    }
}
