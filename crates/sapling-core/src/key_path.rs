use serde_json::{Map, Value as Json};
use std::fmt;

/// A dot-separated path into nested JSON objects, e.g. `publisher.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    parts: Vec<String>,
}

impl KeyPath {
    pub fn new(src: &str) -> Self {
        Self {
            parts: src.split('.').map(String::from).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Reads the value at this path.
    ///
    /// Returns `None` when any segment is missing or an intermediate value is
    /// not an object. An explicit JSON `null` at the end of the path is
    /// returned as `Some(Json::Null)`, so callers can tell "absent" apart
    /// from "cleared".
    pub fn get<'a>(&self, object: &'a Map<String, Json>) -> Option<&'a Json> {
        let (last, init) = self.parts.split_last()?;
        let mut current = object;

        for part in init {
            current = current.get(part)?.as_object()?;
        }

        current.get(last)
    }

    /// Writes `value` at this path, creating intermediate objects as needed.
    ///
    /// An intermediate value that is not an object is replaced.
    pub fn set(&self, object: &mut Map<String, Json>, value: Json) {
        let Some((last, init)) = self.parts.split_last() else {
            return;
        };
        let mut current = object;

        for part in init {
            let entry = current
                .entry(part.clone())
                .or_insert_with(|| Json::Object(Map::new()));

            if !entry.is_object() {
                *entry = Json::Object(Map::new());
            }

            current = match entry {
                Json::Object(map) => map,
                _ => unreachable!(),
            };
        }

        current.insert(last.clone(), value);
    }

    /// Builds an object holding only `value` at this path.
    pub fn wrap(&self, value: Json) -> Map<String, Json> {
        let mut object = Map::new();
        self.set(&mut object, value);
        object
    }
}

impl From<&str> for KeyPath {
    fn from(src: &str) -> Self {
        KeyPath::new(src)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}
