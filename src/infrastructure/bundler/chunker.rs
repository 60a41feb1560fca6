//! Module graph loading and chunk planning

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Component, Path, PathBuf};

use crate::domain::entities::ArtifactKind;
use crate::domain::ports::{BundleError, BundleRequest};

use super::scanner::scan_imports;

/// Extensions tried, in order, when a specifier omits one
const PROBE_EXTENSIONS: &[&str] = &["ts", "js", "mjs", "tsx", "jsx"];
const PROBE_INDEX: &[&str] = &["index.ts", "index.js"];

/// One source module discovered from the inputs
#[derive(Debug, Clone)]
pub struct SourceModule {
    /// Root-relative path with `/` separators
    pub id: String,
    pub path: PathBuf,
    pub source: String,
    /// Specifier -> module id, for rewriting
    pub resolved: HashMap<String, String>,
    /// Imported module indices in specifier order, deduplicated
    pub deps: Vec<usize>,
}

/// All modules reachable from the script inputs
#[derive(Debug, Default)]
pub struct ModuleGraph {
    pub modules: Vec<SourceModule>,
    /// (output name, entry module index) in input order
    pub entries: Vec<(String, usize)>,
}

impl ModuleGraph {
    /// Read every input and everything it imports, breadth first.
    pub fn load<'a>(
        request: &BundleRequest,
        inputs: impl IntoIterator<Item = (&'a String, &'a PathBuf)>,
    ) -> Result<Self, BundleError> {
        let mut graph = ModuleGraph::default();
        let mut index: HashMap<PathBuf, usize> = HashMap::new();
        let mut queue = VecDeque::new();

        for (name, path) in inputs {
            let path = normalize(path);
            let idx = graph.discover(request, &mut index, &mut queue, path)?;
            graph.entries.push((name.clone(), idx));
        }

        while let Some(idx) = queue.pop_front() {
            let importer = graph.modules[idx].path.clone();
            let importer_id = graph.modules[idx].id.clone();
            let refs = scan_imports(&graph.modules[idx].source);

            let mut resolved = HashMap::new();
            let mut deps = Vec::new();

            for import in refs {
                if import.dynamic && !request.inline_dynamic_imports {
                    return Err(BundleError::DynamicImport {
                        module: importer_id,
                        specifier: import.specifier,
                    });
                }

                let target = resolve(request, &importer, &import.specifier).ok_or_else(|| {
                    BundleError::UnresolvedImport {
                        importer: importer_id.clone(),
                        specifier: import.specifier.clone(),
                    }
                })?;

                let dep = graph.discover(request, &mut index, &mut queue, target)?;
                resolved.insert(import.specifier, graph.modules[dep].id.clone());
                if !deps.contains(&dep) {
                    deps.push(dep);
                }
            }

            graph.modules[idx].resolved = resolved;
            graph.modules[idx].deps = deps;
        }

        Ok(graph)
    }

    fn discover(
        &mut self,
        request: &BundleRequest,
        index: &mut HashMap<PathBuf, usize>,
        queue: &mut VecDeque<usize>,
        path: PathBuf,
    ) -> Result<usize, BundleError> {
        if let Some(&idx) = index.get(&path) {
            return Ok(idx);
        }

        let source = std::fs::read_to_string(&path).map_err(|source| BundleError::Read {
            path: path.clone(),
            source,
        })?;

        let idx = self.modules.len();
        self.modules.push(SourceModule {
            id: module_id(&request.root_dir, &path),
            path: path.clone(),
            source,
            resolved: HashMap::new(),
            deps: Vec::new(),
        });
        index.insert(path, idx);
        queue.push_back(idx);
        Ok(idx)
    }

    /// Module indices reachable from `start`, including itself, depth first
    fn reachable(&self, start: usize) -> Vec<usize> {
        let mut seen = vec![false; self.modules.len()];
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if std::mem::replace(&mut seen[idx], true) {
                continue;
            }
            order.push(idx);
            stack.extend(self.modules[idx].deps.iter().rev());
        }
        order
    }
}

/// A chunk before naming and code generation
#[derive(Debug, Clone)]
pub struct PlannedChunk {
    pub kind: ArtifactKind,
    /// Output name for entry chunks, module stem for shared chunks
    pub name: String,
    /// Entry module for entry chunks
    pub entry: Option<usize>,
    pub modules: Vec<usize>,
    /// Indices of other planned chunks this one imports
    pub imports: Vec<usize>,
}

/// Assign modules to chunks.
///
/// With `split` set, a module reachable from exactly one entry joins that
/// entry's chunk and a module reachable from several entries joins the one
/// shared chunk for that set of entries. Without it every entry chunk holds
/// everything it reaches and nothing is shared.
pub fn plan_chunks(graph: &ModuleGraph, split: bool) -> Vec<PlannedChunk> {
    let mut chunks: Vec<PlannedChunk> = graph
        .entries
        .iter()
        .map(|(name, module)| PlannedChunk {
            kind: ArtifactKind::EntryChunk,
            name: name.clone(),
            entry: Some(*module),
            modules: Vec::new(),
            imports: Vec::new(),
        })
        .collect();

    if !split {
        for chunk in &mut chunks {
            if let Some(entry) = chunk.entry {
                chunk.modules = graph.reachable(entry);
            }
        }
        return chunks;
    }

    let mut reached_by: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); graph.modules.len()];
    for (entry_idx, (_, module)) in graph.entries.iter().enumerate() {
        for idx in graph.reachable(*module) {
            reached_by[idx].insert(entry_idx);
        }
    }

    let entry_chunk_of: HashMap<usize, usize> = graph
        .entries
        .iter()
        .enumerate()
        .map(|(chunk, (_, module))| (*module, chunk))
        .collect();

    let mut shared_by_set: HashMap<Vec<usize>, usize> = HashMap::new();
    let mut chunk_of = vec![0usize; graph.modules.len()];

    for (idx, module) in graph.modules.iter().enumerate() {
        let owners: Vec<usize> = reached_by[idx].iter().copied().collect();
        let chunk = match entry_chunk_of.get(&idx) {
            Some(&chunk) => chunk,
            None if owners.len() == 1 => owners[0],
            None => *shared_by_set.entry(owners).or_insert_with(|| {
                chunks.push(PlannedChunk {
                    kind: ArtifactKind::SharedChunk,
                    name: module_stem(&module.path),
                    entry: None,
                    modules: Vec::new(),
                    imports: Vec::new(),
                });
                chunks.len() - 1
            }),
        };
        chunks[chunk].modules.push(idx);
        chunk_of[idx] = chunk;
    }

    for chunk_idx in 0..chunks.len() {
        let mut imports = Vec::new();
        for &module in &chunks[chunk_idx].modules {
            for &dep in &graph.modules[module].deps {
                let target = chunk_of[dep];
                if target != chunk_idx && !imports.contains(&target) {
                    imports.push(target);
                }
            }
        }
        chunks[chunk_idx].imports = imports;
    }

    chunks
}

fn resolve(request: &BundleRequest, importer: &Path, specifier: &str) -> Option<PathBuf> {
    let base = if specifier.starts_with("./") || specifier.starts_with("../") {
        importer.parent()?.join(specifier)
    } else if let Some(rooted) = specifier.strip_prefix('/') {
        request.root_dir.join(rooted)
    } else {
        resolve_alias(request, specifier)?
    };

    find_candidate(&normalize(&base))
}

/// Longest matching alias prefix wins
fn resolve_alias(request: &BundleRequest, specifier: &str) -> Option<PathBuf> {
    request
        .aliases
        .iter()
        .filter_map(|(prefix, dir)| {
            let rest = if specifier == prefix {
                ""
            } else {
                specifier.strip_prefix(prefix.as_str())?.strip_prefix('/')?
            };
            Some((prefix.len(), request.root_dir.join(dir).join(rest)))
        })
        .max_by_key(|(len, _)| *len)
        .map(|(_, path)| path)
}

fn find_candidate(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }

    let file_name = base.file_name()?.to_string_lossy().into_owned();
    PROBE_EXTENSIONS
        .iter()
        .map(|ext| base.with_file_name(format!("{}.{}", file_name, ext)))
        .chain(PROBE_INDEX.iter().map(|index| base.join(index)))
        .find(|candidate| candidate.is_file())
}

/// Lexically fold `.` and `..` components
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn module_id(root: &Path, path: &Path) -> String {
    let root = normalize(root);
    let relative = path.strip_prefix(&root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

fn module_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chunk".to_string())
}
