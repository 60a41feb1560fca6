//! Entry entity - one source file requested for packaging

use std::path::{Path, PathBuf};

use crate::domain::value_objects::{EntryKind, OutputExtension, OutputKey};

/// A classified packaging entry
///
/// Created once per packaging run by the classifier and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path exactly as requested (usually relative to the project root)
    source: PathBuf,
    /// Resolved absolute path used for reading and bundling
    absolute: PathBuf,
    kind: EntryKind,
    key: OutputKey,
    extension: OutputExtension,
}

impl Entry {
    pub fn new(
        source: impl Into<PathBuf>,
        absolute: impl Into<PathBuf>,
        kind: EntryKind,
        key: OutputKey,
        extension: OutputExtension,
    ) -> Self {
        Self {
            source: source.into(),
            absolute: absolute.into(),
            kind,
            key,
            extension,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn key(&self) -> &OutputKey {
        &self.key
    }

    pub fn extension(&self) -> OutputExtension {
        self.extension
    }

    /// The entry's own emitted file, relative to the output directory
    pub fn output_file(&self) -> String {
        self.key.file_name(self.extension.as_str())
    }
}
