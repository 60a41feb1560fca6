//! Error types for scriptpack
//!
//! Build-time errors are always fatal: the manifest rewriter downstream
//! needs a complete remapping table, so nothing here degrades gracefully.
//! Runtime loader problems are not errors at all (see `runtime`).

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{BundleError, FsError};

/// Result type alias for packaging operations
pub type PackResult<T> = Result<T, PackError>;

/// Which of the two bundler invocations failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPass {
    /// Module-wrapped content scripts and their shared chunks
    Scripts,
    /// Stylesheets and pre-built libraries, no module wrapping
    Assets,
}

impl std::fmt::Display for BuildPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildPass::Scripts => write!(f, "scripts"),
            BuildPass::Assets => write!(f, "assets"),
        }
    }
}

/// Main error type for packaging operations
#[derive(Error, Debug)]
pub enum PackError {
    /// An entry file could not be read
    #[error("cannot read entry {path}: {source}")]
    UnreadableEntry {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    /// An entry could not be classified as script or asset
    #[error("cannot classify entry {path}: {reason}")]
    AmbiguousEntry { path: PathBuf, reason: String },

    /// Two different outputs claim the same file name
    #[error("output file '{file}' is produced by more than one build pass")]
    DuplicateOutput { file: String },

    /// The underlying bundler failed
    #[error("{pass} bundler pass failed: {source}")]
    Bundler {
        pass: BuildPass,
        #[source]
        source: BundleError,
    },

    /// An artifact imports a file that is not part of its graph
    #[error("artifact '{from}' imports '{to}', which the bundler did not emit")]
    DanglingImport { from: String, to: String },

    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Manifest has an unexpected shape
    #[error("invalid manifest: {message}")]
    Manifest { message: String },

    /// File system port failure
    #[error("file system error: {0}")]
    Fs(#[from] FsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
