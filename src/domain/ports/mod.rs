//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod bundler;
pub mod file_system;

pub use bundler::{BundleError, BundleRequest, Bundler, OutputFormat};
pub use file_system::{FileSystem, FsError, FsResult};
