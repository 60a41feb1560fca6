//! Path Remapping Table
//!
//! Maps each requested entry path to the ordered list of files it needs at
//! load time: its own emitted file first, then every shared chunk it
//! transitively imports. The table is assembled through [`RemappingBuilder`]
//! and is read-only once built.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Entry;

/// Immutable entry-path to output-files table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathRemapping {
    entries: BTreeMap<PathBuf, Vec<String>>,
}

impl PathRemapping {
    /// Files for an entry path; empty when the path was not packaged
    pub fn resolve(&self, path: &Path) -> &[String] {
        self.entries.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, path: &Path) -> Option<&[String]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[String])> {
        self.entries
            .iter()
            .map(|(p, files)| (p.as_path(), files.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mutable staging area for a [`PathRemapping`]
///
/// Seeded with every entry's own output file before any bundling happens,
/// then extended with dependency lists keyed by emitted file name.
#[derive(Debug, Default)]
pub struct RemappingBuilder {
    entries: BTreeMap<PathBuf, Vec<String>>,
    /// Emitted file name -> entry paths whose own file it is
    by_output: HashMap<String, Vec<PathBuf>>,
}

impl RemappingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table with one entry's own output file
    pub fn seed(&mut self, entry: &Entry) {
        let own = entry.output_file();
        self.entries
            .insert(entry.source().to_path_buf(), vec![own.clone()]);
        let sources = self.by_output.entry(own).or_default();
        if !sources.iter().any(|p| p == entry.source()) {
            sources.push(entry.source().to_path_buf());
        }
    }

    /// Append dependencies after the entries owning `output_file`.
    ///
    /// Files already listed for an entry are skipped. Returns the number of
    /// entries that were extended; zero when no entry owns `output_file`.
    pub fn append_dependencies(&mut self, output_file: &str, dependencies: &[String]) -> usize {
        let Some(sources) = self.by_output.get(output_file) else {
            return 0;
        };

        for source in sources {
            if let Some(files) = self.entries.get_mut(source) {
                for dep in dependencies {
                    if !files.contains(dep) {
                        files.push(dep.clone());
                    }
                }
            }
        }

        sources.len()
    }

    pub fn build(self) -> PathRemapping {
        PathRemapping {
            entries: self.entries,
        }
    }
}
