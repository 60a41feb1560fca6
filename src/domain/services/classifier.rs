//! Entry classifier
//!
//! Splits requested entries into the module-wrapped script group and the
//! plain asset group, computing each entry's output key and final extension
//! up front so the remapping table can be seeded before bundling.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::domain::entities::{Entry, RemappingBuilder};
use crate::domain::ports::FileSystem;
use crate::domain::value_objects::{AssetKind, EntryKind, OutputExtension};
use crate::error::{PackError, PackResult};

use super::namer::output_key_for;

/// Path fragment marking pre-built third-party code
pub const DEFAULT_DEPS_MARKER: &str = "/deps/";

/// Result of classifying one packaging run's entries
#[derive(Debug, Clone, Default)]
pub struct Classification {
    entries: Vec<Entry>,
    scripts: BTreeMap<String, PathBuf>,
    assets: BTreeMap<String, PathBuf>,
}

impl Classification {
    /// Every entry in request order, duplicates removed
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Output key -> absolute path for the module-wrapped pass
    pub fn scripts(&self) -> &BTreeMap<String, PathBuf> {
        &self.scripts
    }

    /// Output key -> absolute path for the plain pass
    pub fn assets(&self) -> &BTreeMap<String, PathBuf> {
        &self.assets
    }

    /// A remapping builder holding every entry's own output file
    pub fn seed_remapping(&self) -> RemappingBuilder {
        let mut builder = RemappingBuilder::new();
        for entry in &self.entries {
            builder.seed(entry);
        }
        builder
    }
}

/// Classifies entries relative to a project root
pub struct EntryClassifier<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    root: PathBuf,
    deps_marker: String,
}

impl<'a, F: FileSystem + ?Sized> EntryClassifier<'a, F> {
    pub fn new(fs: &'a F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
            deps_marker: DEFAULT_DEPS_MARKER.to_string(),
        }
    }

    pub fn with_deps_marker(mut self, marker: impl Into<String>) -> Self {
        self.deps_marker = marker.into();
        self
    }

    /// Classify one entry path
    pub fn classify_one(&self, source: &Path) -> PackResult<Entry> {
        let extension =
            OutputExtension::for_path(source).ok_or_else(|| PackError::AmbiguousEntry {
                path: source.to_path_buf(),
                reason: match source.extension() {
                    Some(ext) => format!("unsupported extension '.{}'", ext.to_string_lossy()),
                    None => "no file extension".to_string(),
                },
            })?;

        let kind = if extension.is_stylesheet() {
            EntryKind::Asset(AssetKind::Style)
        } else if self.is_dependency(source) {
            EntryKind::Asset(AssetKind::Library)
        } else {
            EntryKind::Script
        };

        let absolute = if source.is_absolute() {
            source.to_path_buf()
        } else {
            self.root.join(source)
        };
        let key = output_key_for(self.fs, &absolute)?;

        tracing::debug!(entry = %source.display(), %kind, key = %key, "classified entry");

        Ok(Entry::new(source, absolute, kind, key, extension))
    }

    /// Classify every requested entry
    pub fn classify(&self, requested: &[PathBuf]) -> PackResult<Classification> {
        let mut seen = HashSet::new();
        let mut classification = Classification::default();

        for source in requested {
            if !seen.insert(source.clone()) {
                continue;
            }

            let entry = self.classify_one(source)?;
            let group = if entry.kind().is_script() {
                &mut classification.scripts
            } else {
                &mut classification.assets
            };

            // Identical basename and content collapse onto one output key;
            // the first path wins as the bundler input.
            group
                .entry(entry.key().to_string())
                .or_insert_with(|| entry.absolute().to_path_buf());

            classification.entries.push(entry);
        }

        Ok(classification)
    }

    /// The relative form of `source`, with `/` separators and a leading `/`,
    /// contains the deps marker.
    fn is_dependency(&self, source: &Path) -> bool {
        let relative = source.strip_prefix(&self.root).unwrap_or(source);
        let normalized = relative.to_string_lossy().replace('\\', "/");
        let anchored = if normalized.starts_with('/') {
            normalized
        } else {
            format!("/{}", normalized)
        };
        anchored.contains(&self.deps_marker)
    }
}
