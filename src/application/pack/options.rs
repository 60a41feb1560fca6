//! Pack options

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::services::DEFAULT_DEPS_MARKER;

/// Options for one packaging run
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Project root; entry paths and aliases are relative to it
    pub root_dir: PathBuf,
    /// Destination directory shared by both passes
    pub out_dir: PathBuf,
    /// Subdirectory of `out_dir` for shared chunks
    pub chunk_dir: String,
    pub deps_marker: String,
    pub aliases: BTreeMap<String, PathBuf>,
}

impl PackOptions {
    pub fn new(root_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            out_dir: out_dir.into(),
            chunk_dir: "chunks".to_string(),
            deps_marker: DEFAULT_DEPS_MARKER.to_string(),
            aliases: BTreeMap::new(),
        }
    }

    /// Options for `root_dir` as configured
    pub fn from_config(config: &Config, root_dir: &Path) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
            out_dir: config.out_dir(root_dir),
            chunk_dir: config.build.chunk_dir.clone(),
            deps_marker: config.build.deps_marker.clone(),
            aliases: config.aliases.clone(),
        }
    }

    /// Set the destination directory
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn with_chunk_dir(mut self, chunk_dir: impl Into<String>) -> Self {
        self.chunk_dir = chunk_dir.into();
        self
    }

    pub fn with_deps_marker(mut self, marker: impl Into<String>) -> Self {
        self.deps_marker = marker.into();
        self
    }

    pub fn with_alias(mut self, prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.aliases.insert(prefix.into(), dir.into());
        self
    }

    /// File name pattern for shared chunks
    pub fn chunk_file_names(&self) -> String {
        let dir = self.chunk_dir.trim_matches('/');
        if dir.is_empty() {
            "[name]-[hash].js".to_string()
        } else {
            format!("{}/[name]-[hash].js", dir)
        }
    }
}
