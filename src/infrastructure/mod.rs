//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system with atomic writes
//! - `bundler/` - Built-in static-import bundler

pub mod bundler;
pub mod fs;

// Re-export for convenience
pub use bundler::StaticImportBundler;
pub use fs::LocalFs;
