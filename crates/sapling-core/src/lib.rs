mod error;
pub use error::{Error, IntoError};

mod key_path;
pub use key_path::KeyPath;

pub mod schema;
pub use schema::Schema;

pub mod store;
pub use store::Store;

pub mod transform;

mod value;
pub use value::{json_kind, Key, Value};

/// A Result type alias that uses Sapling's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
