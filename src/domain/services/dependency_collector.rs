//! Dependency graph collector
//!
//! For each facade artifact, walks import edges depth-first and produces the
//! flat, deduplicated list of files the entry needs at load time. Order
//! follows each artifact's declared import order: an artifact's direct
//! imports come first, then what each of them pulls in.

use std::collections::HashSet;

use crate::domain::entities::{Artifact, ArtifactGraph};
use crate::error::{PackError, PackResult};

/// Memoized traversal over one artifact graph
///
/// A visited artifact contributes nothing the second time it is reached, so
/// shared subgraphs are walked once and cycles terminate.
pub struct DependencyCollector<'g> {
    graph: &'g ArtifactGraph,
    visited: HashSet<&'g str>,
}

impl<'g> DependencyCollector<'g> {
    pub fn new(graph: &'g ArtifactGraph) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
        }
    }

    /// Raw traversal result for `artifact`, possibly with repeats
    pub fn walk(&mut self, artifact: &'g Artifact) -> PackResult<Vec<&'g str>> {
        if !self.visited.insert(artifact.file_name()) {
            return Ok(Vec::new());
        }

        let Some(imports) = artifact.imports() else {
            return Ok(Vec::new());
        };

        let mut collected: Vec<&'g str> = imports.iter().map(String::as_str).collect();

        for name in imports {
            let imported = self
                .graph
                .get(name)
                .ok_or_else(|| PackError::DanglingImport {
                    from: artifact.file_name().to_string(),
                    to: name.clone(),
                })?;

            if imported.is_code() {
                collected.extend(self.walk(imported)?);
            }
        }

        Ok(collected)
    }
}

/// Transitive, deduplicated dependencies of one artifact, excluding itself
pub fn collect_dependencies(graph: &ArtifactGraph, artifact: &Artifact) -> PackResult<Vec<String>> {
    let raw = DependencyCollector::new(graph).walk(artifact)?;

    let mut seen = HashSet::new();
    Ok(raw
        .into_iter()
        .filter(|name| *name != artifact.file_name())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect())
}

/// Dependencies of every facade artifact in the graph, keyed by its file name
pub fn collect_all(graph: &ArtifactGraph) -> PackResult<Vec<(String, Vec<String>)>> {
    graph
        .facades()
        .map(|facade| -> PackResult<(String, Vec<String>)> {
            let deps = collect_dependencies(graph, facade)?;
            tracing::debug!(
                artifact = facade.file_name(),
                dependencies = deps.len(),
                "collected chunk dependencies"
            );
            Ok((facade.file_name().to_string(), deps))
        })
        .collect()
}
