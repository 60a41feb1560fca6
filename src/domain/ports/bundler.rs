//! Bundler port - the underlying module bundler
//!
//! The packager never parses code itself beyond what the bundler reports. A
//! bundler receives named inputs plus output rules and returns the complete
//! artifact graph in memory; writing is left to the orchestrator so that a
//! failed pass publishes nothing.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::entities::ArtifactGraph;

/// Module format for emitted code chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Named `define(name, deps, factory)` modules
    Amd {
        /// Give entry chunks an explicit module name too
        auto_id: bool,
    },
    /// Self-contained files, no module wrapping
    Plain,
}

/// One bundler invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// Output name (the entry's output key) -> absolute source path
    pub inputs: BTreeMap<String, PathBuf>,
    pub format: OutputFormat,
    /// Pattern for entry chunks, e.g. `[name].js`
    pub entry_file_names: String,
    /// Pattern for shared chunks, e.g. `chunks/[name]-[hash].js`
    pub chunk_file_names: String,
    /// Pattern for non-code assets, e.g. `[name].[ext]`
    pub asset_file_names: String,
    /// When false, shared code must become explicit chunks and dynamic
    /// imports cannot be fetched on demand.
    pub inline_dynamic_imports: bool,
    /// Project root used for module ids and alias targets
    pub root_dir: PathBuf,
    /// Import specifier prefix -> directory
    pub aliases: BTreeMap<String, PathBuf>,
}

impl BundleRequest {
    /// Expand `[name]`, `[hash]` and `[ext]` placeholders in a pattern
    pub fn render(pattern: &str, name: &str, hash: &str, ext: &str) -> String {
        pattern
            .replace("[name]", name)
            .replace("[hash]", hash)
            .replace("[ext]", ext)
    }
}

/// Errors reported by a bundler implementation
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("cannot read module {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot resolve '{specifier}' imported from {importer}")]
    UnresolvedImport { importer: String, specifier: String },

    #[error("dynamic import of '{specifier}' in {module} cannot be loaded by a content script")]
    DynamicImport { module: String, specifier: String },

    #[error("unsupported input {path}: {reason}")]
    UnsupportedInput { path: PathBuf, reason: String },

    #[error("{0}")]
    Other(String),
}

/// The underlying module bundler
///
/// `Sync` so the orchestrator can run both passes at the same time.
pub trait Bundler: Send + Sync {
    fn bundle(&self, request: &BundleRequest) -> Result<ArtifactGraph, BundleError>;
}
