//! Artifact entities - the output of one bundler invocation

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What kind of file an artifact is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Chunk that holds an entry's own code
    EntryChunk,
    /// Chunk holding code shared by several entries
    SharedChunk,
    /// Non-code output (stylesheets)
    Asset,
}

/// A bundler-produced output unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Output path relative to the destination directory; the artifact's identity
    file_name: String,
    kind: ArtifactKind,
    /// Import edges by file name. `None` for assets, which have no imports at all.
    imports: Option<Vec<String>>,
    /// Source entry this artifact is the direct output of
    facade: Option<PathBuf>,
    contents: Vec<u8>,
}

impl Artifact {
    /// Code chunk, initially without imports or facade
    pub fn chunk(file_name: impl Into<String>, kind: ArtifactKind, code: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            imports: Some(Vec::new()),
            facade: None,
            contents: code.into().into_bytes(),
        }
    }

    /// Non-code asset carrying raw bytes
    pub fn asset(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            kind: ArtifactKind::Asset,
            imports: None,
            facade: None,
            contents,
        }
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.imports = Some(imports);
        self
    }

    pub fn with_facade(mut self, facade: impl Into<PathBuf>) -> Self {
        self.facade = Some(facade.into());
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Import edges in declaration order, `None` when the artifact has no imports field
    pub fn imports(&self) -> Option<&[String]> {
        self.imports.as_deref()
    }

    pub fn facade(&self) -> Option<&Path> {
        self.facade.as_deref()
    }

    /// True for the direct build output of an entry
    pub fn is_facade(&self) -> bool {
        self.kind == ArtifactKind::EntryChunk && self.facade.is_some()
    }

    pub fn is_code(&self) -> bool {
        self.kind != ArtifactKind::Asset
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Code text of a chunk; `None` for assets or non-UTF-8 contents
    pub fn code(&self) -> Option<&str> {
        if self.is_code() {
            std::str::from_utf8(&self.contents).ok()
        } else {
            None
        }
    }

    pub fn set_code(&mut self, code: String) {
        self.contents = code.into_bytes();
    }
}

/// All artifacts from one bundler invocation, keyed by file name
///
/// Iteration is ordered by file name so every consumer sees the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactGraph {
    artifacts: BTreeMap<String, Artifact>,
}

impl ArtifactGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact, replacing any previous one with the same file name
    pub fn insert(&mut self, artifact: Artifact) {
        self.artifacts
            .insert(artifact.file_name().to_string(), artifact);
    }

    pub fn get(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts.get(file_name)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.artifacts.contains_key(file_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Artifact> {
        self.artifacts.values_mut()
    }

    pub fn facades(&self) -> impl Iterator<Item = &Artifact> {
        self.iter().filter(|a| a.is_facade())
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl FromIterator<Artifact> for ArtifactGraph {
    fn from_iter<I: IntoIterator<Item = Artifact>>(iter: I) -> Self {
        let mut graph = ArtifactGraph::new();
        for artifact in iter {
            graph.insert(artifact);
        }
        graph
    }
}
