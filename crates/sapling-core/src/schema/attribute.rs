use super::EntityId;
use crate::{KeyPath, Value};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Attribute {
    /// Uniquely identifies the attribute within its entity
    pub id: AttributeId,

    /// The attribute name
    pub name: String,

    /// Where the attribute's value lives in JSON. `None` keeps the attribute
    /// out of mapping and serialization.
    pub key_path: Option<KeyPath>,

    /// Declared value type
    pub ty: AttributeType,

    /// Name of the value transformer applied to incoming JSON values
    pub transformer: Option<String>,

    /// True if the attribute may hold null
    pub nullable: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttributeId {
    pub entity: EntityId,
    pub index: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttributeType {
    Bool,
    Integer,
    Float,
    String,
    Uuid,
    /// Any value, JSON objects included
    Any,
}

impl AttributeType {
    /// Returns true if values of this type can identify an object.
    pub fn is_key(self) -> bool {
        matches!(self, Self::Bool | Self::Integer | Self::String | Self::Uuid)
    }

    /// Coerces a non-null value into this type.
    ///
    /// On failure the original value is handed back so the caller can report
    /// it.
    pub fn coerce(self, value: Value) -> Result<Value, Value> {
        match (self, value) {
            (Self::Any, value) => Ok(value),
            (Self::Bool, Value::Bool(v)) => Ok(Value::Bool(v)),
            (Self::Bool, Value::I64(0)) => Ok(Value::Bool(false)),
            (Self::Bool, Value::I64(1)) => Ok(Value::Bool(true)),
            (Self::Integer, Value::I64(v)) => Ok(Value::I64(v)),
            (Self::Integer, Value::F64(v))
                if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 =>
            {
                Ok(Value::I64(v as i64))
            }
            (Self::Float, Value::F64(v)) => Ok(Value::F64(v)),
            (Self::Float, Value::I64(v)) => Ok(Value::F64(v as f64)),
            (Self::String, Value::String(v)) => Ok(Value::String(v)),
            (Self::Uuid, Value::Uuid(v)) => Ok(Value::Uuid(v)),
            (Self::Uuid, Value::String(v)) => match Uuid::parse_str(&v) {
                Ok(id) => Ok(Value::Uuid(id)),
                Err(_) => Err(Value::String(v)),
            },
            (_, value) => Err(value),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<AttributeId> for usize {
    fn from(val: AttributeId) -> Self {
        val.index
    }
}

impl From<&Attribute> for AttributeId {
    fn from(val: &Attribute) -> Self {
        val.id
    }
}

impl fmt::Debug for AttributeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "AttributeId({}/{})", self.entity.0, self.index)
    }
}
