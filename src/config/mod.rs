//! Configuration module
//!
//! Precedence, highest first:
//! 1. CLI flags
//! 2. Environment variables (SCRIPTPACK_*)
//! 3. Project config (`scriptpack.toml` at the project root)
//! 4. Built-in defaults

mod loader;
mod types;

pub use loader::ConfigWarning;
pub use types::{BuildConfig, Config, RuntimeConfig, CONFIG_FILE_NAME};
