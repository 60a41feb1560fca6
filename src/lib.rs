//! scriptpack - content-script packager for browser extensions
//!
//! Packages independently authored content scripts and stylesheets into
//! content-addressed, isolated bundles with explicit shared chunks, and
//! models the page-side module registry that activates them.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod runtime;

// Re-exports for convenience
pub use application::manifest::{collect_content_scripts, rewrite_content_scripts};
pub use application::pack::{PackOptions, PackOutcome, PackUseCase};
pub use config::Config;
pub use domain::entities::PathRemapping;
pub use domain::value_objects::OutputKey;
pub use error::{PackError, PackResult};
pub use infrastructure::{LocalFs, StaticImportBundler};
pub use runtime::{AmdLoader, ModuleRegistry, VirtualClock};
