//! Built-in static-import bundler
//!
//! A small implementation of the `Bundler` port for plain JavaScript content
//! scripts. It follows static imports, splits modules shared by several
//! entries into shared chunks, and emits named AMD modules or self-contained
//! files.
//!
//! It performs no transpilation and no stylesheet preprocessing: sources are
//! emitted as written. Projects needing either plug a full bundler in behind
//! the same port.
//!
//! # Architecture
//!
//! - `scanner`: finds import edges and rewrites import/export statements
//! - `chunker`: loads the module graph and assigns modules to chunks
//! - `codegen`: renders chunks as code

mod chunker;
mod codegen;
mod scanner;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::entities::{Artifact, ArtifactGraph, ArtifactKind};
use crate::domain::ports::{BundleError, BundleRequest, Bundler, OutputFormat};
use crate::domain::value_objects::{hash8, OutputExtension};

use chunker::{plan_chunks, ModuleGraph, PlannedChunk};

pub use scanner::{scan_imports, ImportRef};

/// Static-import bundler
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticImportBundler;

impl StaticImportBundler {
    pub fn new() -> Self {
        Self
    }

    fn emit_styles(
        &self,
        request: &BundleRequest,
        styles: &BTreeMap<&String, &PathBuf>,
        graph: &mut ArtifactGraph,
    ) -> Result<(), BundleError> {
        for (name, path) in styles {
            if !matches!(request.format, OutputFormat::Plain) {
                return Err(BundleError::UnsupportedInput {
                    path: path.to_path_buf(),
                    reason: "stylesheets cannot be emitted as modules".to_string(),
                });
            }

            let contents = std::fs::read(path).map_err(|source| BundleError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            if path.extension().and_then(|e| e.to_str()) != Some("css") {
                tracing::warn!(
                    path = %path.display(),
                    "stylesheet copied without preprocessing"
                );
            }

            let file_name = BundleRequest::render(&request.asset_file_names, name, "", "css");
            graph.insert(Artifact::asset(file_name, contents));
        }
        Ok(())
    }

    fn file_names(
        &self,
        request: &BundleRequest,
        modules: &ModuleGraph,
        chunks: &[PlannedChunk],
    ) -> Vec<String> {
        chunks
            .iter()
            .map(|chunk| {
                let mut content = Vec::new();
                for &idx in &chunk.modules {
                    content.extend_from_slice(modules.modules[idx].id.as_bytes());
                    content.push(0);
                    content.extend_from_slice(modules.modules[idx].source.as_bytes());
                    content.push(0);
                }
                let hash = hash8(&content);
                let pattern = match chunk.kind {
                    ArtifactKind::SharedChunk => &request.chunk_file_names,
                    _ => &request.entry_file_names,
                };
                BundleRequest::render(pattern, &chunk.name, &hash, "js")
            })
            .collect()
    }
}

/// Module name a chunk registers under: its file name without `.js`
fn define_name(file_name: &str) -> &str {
    file_name.strip_suffix(".js").unwrap_or(file_name)
}

impl Bundler for StaticImportBundler {
    fn bundle(&self, request: &BundleRequest) -> Result<ArtifactGraph, BundleError> {
        let (styles, scripts): (BTreeMap<_, _>, BTreeMap<_, _>) =
            request.inputs.iter().partition(|(_, path)| {
                OutputExtension::for_path(path).is_some_and(OutputExtension::is_stylesheet)
            });

        let mut graph = ArtifactGraph::new();
        self.emit_styles(request, &styles, &mut graph)?;

        if scripts.is_empty() {
            return Ok(graph);
        }

        let modules = ModuleGraph::load(request, scripts)?;
        let split = matches!(request.format, OutputFormat::Amd { .. });
        let chunks = plan_chunks(&modules, split);
        let file_names = self.file_names(request, &modules, &chunks);

        for (idx, chunk) in chunks.iter().enumerate() {
            let members: Vec<_> = chunk.modules.iter().map(|&m| &modules.modules[m]).collect();
            let entry_id = chunk.entry.map(|m| modules.modules[m].id.as_str());
            let imports: Vec<String> = chunk.imports.iter().map(|&c| file_names[c].clone()).collect();

            let code = match request.format {
                OutputFormat::Amd { auto_id } => {
                    let deps: Vec<String> =
                        imports.iter().map(|f| define_name(f).to_string()).collect();
                    let name = if auto_id || chunk.kind == ArtifactKind::SharedChunk {
                        define_name(&file_names[idx]).to_string()
                    } else {
                        chunk.name.clone()
                    };
                    codegen::amd_chunk(&name, &deps, &members, entry_id)
                }
                OutputFormat::Plain => match entry_id {
                    Some(id) => codegen::plain_chunk(&members, id),
                    None => continue,
                },
            };

            let mut artifact =
                Artifact::chunk(file_names[idx].clone(), chunk.kind, code).with_imports(imports);
            if let Some(entry) = chunk.entry {
                artifact = artifact.with_facade(modules.modules[entry].path.clone());
            }

            tracing::debug!(
                file = file_names[idx].as_str(),
                modules = members.len(),
                "emitted chunk"
            );
            graph.insert(artifact);
        }

        Ok(graph)
    }
}
