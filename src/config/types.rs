//! Configuration types

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::services::DEFAULT_DEPS_MARKER;
use crate::error::PackResult;

use super::loader::{self, ConfigWarning};

/// File name looked up at the project root
pub const CONFIG_FILE_NAME: &str = "scriptpack.toml";

/// Build settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildConfig {
    /// Destination directory for both passes, relative to the project root
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Subdirectory of `out_dir` holding shared chunks
    #[serde(default = "default_chunk_dir")]
    pub chunk_dir: String,

    /// Path fragment marking pre-built third-party code
    #[serde(default = "default_deps_marker")]
    pub deps_marker: String,

    /// Deployment-relative directory prepended to manifest paths
    #[serde(default = "default_scripts_prefix")]
    pub scripts_prefix: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            chunk_dir: default_chunk_dir(),
            deps_marker: default_deps_marker(),
            scripts_prefix: default_scripts_prefix(),
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("build/scripts")
}

fn default_chunk_dir() -> String {
    "chunks".to_string()
}

fn default_deps_marker() -> String {
    DEFAULT_DEPS_MARKER.to_string()
}

fn default_scripts_prefix() -> String {
    "scripts".to_string()
}

/// Runtime loader settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Debounce delay before a resolution pass. 0 means the next loop turn.
    #[serde(default)]
    pub resolve_delay_ms: u64,
}

impl RuntimeConfig {
    pub fn resolve_delay(&self) -> Duration {
        Duration::from_millis(self.resolve_delay_ms)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,

    /// Import specifier prefix -> directory relative to the project root
    #[serde(default)]
    pub aliases: BTreeMap<String, PathBuf>,

    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Load `scriptpack.toml` from the project root, or defaults when absent
    pub fn load_or_default(project_root: &Path) -> PackResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (SCRIPTPACK_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Destination directory resolved against the project root
    pub fn out_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.build.out_dir)
    }
}
