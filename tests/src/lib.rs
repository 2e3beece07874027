#[macro_use]
mod macros;


mod setup;
pub use setup::Setup;

pub use pretty_assertions::assert_eq;
pub use sapling::{store::ObjectId, Key, Value};
pub use serde_json::json;

/// Routes engine logs to the test output. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
