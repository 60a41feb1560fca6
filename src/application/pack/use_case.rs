//! Pack Use Case
//!
//! Orchestrates the packaging flow:
//! 1. Classify entries (output keys, groups, final extensions)
//! 2. Seed the remapping table with every entry's own file
//! 3. Run the script pass and the asset pass concurrently
//! 4. Isolate every code artifact
//! 5. Reject graphs that claim the same output file
//! 6. Append each facade's shared-chunk dependencies
//! 7. Stage everything under the destination, then move it into place
//!
//! Nothing is published before both passes succeed and every artifact is
//! staged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::entities::{ArtifactGraph, ArtifactKind};
use crate::domain::ports::{BundleRequest, Bundler, FileSystem, OutputFormat};
use crate::domain::services::{collect_all, isolate_graph, EntryClassifier};
use crate::error::{BuildPass, PackError, PackResult};

use super::options::PackOptions;
use super::result::PackOutcome;

/// Staging directory name under `out_dir`, suffixed with the process id
const STAGING_PREFIX: &str = ".scriptpack-staging-";

/// Pack use case - turns entry files into an isolated, remapped bundle set
pub struct PackUseCase<B, FS>
where
    B: Bundler,
    FS: FileSystem,
{
    bundler: B,
    fs: FS,
}

impl<B, FS> PackUseCase<B, FS>
where
    B: Bundler,
    FS: FileSystem,
{
    pub fn new(bundler: B, fs: FS) -> Self {
        Self { bundler, fs }
    }

    /// Package `entries`, given relative to the project root
    pub fn execute(&self, entries: &[PathBuf], options: &PackOptions) -> PackResult<PackOutcome> {
        let classification = EntryClassifier::new(&self.fs, &options.root_dir)
            .with_deps_marker(options.deps_marker.as_str())
            .classify(entries)?;
        let mut remapping = classification.seed_remapping();

        let script_request = self.request(
            options,
            classification.scripts(),
            OutputFormat::Amd { auto_id: true },
        );
        let asset_request = self.request(options, classification.assets(), OutputFormat::Plain);

        tracing::info!(
            scripts = script_request.inputs.len(),
            assets = asset_request.inputs.len(),
            "running bundler passes"
        );

        let bundler = &self.bundler;
        let (scripts, assets) = std::thread::scope(|s| {
            let scripts = s.spawn(|| run_pass(bundler, BuildPass::Scripts, &script_request));
            let assets = run_pass(bundler, BuildPass::Assets, &asset_request);
            let scripts = scripts
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (scripts, assets)
        });
        let (mut scripts, mut assets) = (scripts?, assets?);

        isolate_graph(&mut scripts);
        isolate_graph(&mut assets);

        if let Some(file) = scripts.file_names().find(|f| assets.contains(f)) {
            return Err(PackError::DuplicateOutput {
                file: file.to_string(),
            });
        }

        for (facade, dependencies) in collect_all(&scripts)? {
            if remapping.append_dependencies(&facade, &dependencies) == 0 {
                tracing::debug!(file = facade.as_str(), "facade without a requested entry");
            }
        }

        let written = self.publish(&[&scripts, &assets], &options.out_dir)?;

        let shared_chunks = scripts
            .iter()
            .filter(|a| a.kind() == ArtifactKind::SharedChunk)
            .count();
        tracing::info!(
            files = written.len(),
            shared_chunks,
            out_dir = %options.out_dir.display(),
            "packaging finished"
        );

        Ok(PackOutcome {
            remapping: remapping.build(),
            written,
            scripts: classification.scripts().len(),
            assets: classification.assets().len(),
            shared_chunks,
        })
    }

    fn request(
        &self,
        options: &PackOptions,
        inputs: &BTreeMap<String, PathBuf>,
        format: OutputFormat,
    ) -> BundleRequest {
        BundleRequest {
            inputs: inputs.clone(),
            format,
            entry_file_names: "[name].js".to_string(),
            chunk_file_names: options.chunk_file_names(),
            asset_file_names: "[name].[ext]".to_string(),
            inline_dynamic_imports: false,
            root_dir: options.root_dir.clone(),
            aliases: options.aliases.clone(),
        }
    }

    /// Stage every artifact under `out_dir`, then move them into place.
    ///
    /// A failed staging write removes the staging directory, so `out_dir`
    /// gains no artifact from a run that could not write all of them.
    fn publish(&self, graphs: &[&ArtifactGraph], out_dir: &Path) -> PackResult<Vec<PathBuf>> {
        let staging = out_dir.join(format!("{}{}", STAGING_PREFIX, std::process::id()));

        let staged = graphs
            .iter()
            .flat_map(|graph| graph.iter())
            .try_for_each(|artifact| {
                let path = staging.join(artifact.file_name());
                self.fs.write(&path, artifact.contents())
            });
        if let Err(err) = staged {
            if let Err(cleanup) = self.fs.remove_dir_all(&staging) {
                tracing::warn!(
                    path = %staging.display(),
                    error = %cleanup,
                    "cannot remove staging directory"
                );
            }
            return Err(err.into());
        }

        let mut written = Vec::new();
        for artifact in graphs.iter().flat_map(|graph| graph.iter()) {
            let path = out_dir.join(artifact.file_name());
            self.fs.rename(&staging.join(artifact.file_name()), &path)?;
            tracing::debug!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        self.fs.remove_dir_all(&staging)?;

        Ok(written)
    }
}

/// One bundler invocation; an empty group never reaches the bundler
fn run_pass<B: Bundler + ?Sized>(
    bundler: &B,
    pass: BuildPass,
    request: &BundleRequest,
) -> PackResult<ArtifactGraph> {
    if request.inputs.is_empty() {
        return Ok(ArtifactGraph::new());
    }

    let graph = bundler
        .bundle(request)
        .map_err(|source| PackError::Bundler { pass, source })?;
    tracing::info!(%pass, artifacts = graph.len(), "bundler pass finished");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Artifact;
    use crate::domain::ports::file_system::MockFileSystem;
    use crate::domain::ports::BundleError;
    use std::path::Path;
    use std::sync::Mutex;

    /// Emits one facade per input, all importing one shared chunk
    #[derive(Default)]
    struct FakeBundler {
        requests: Mutex<Vec<BundleRequest>>,
        fail_assets: bool,
    }

    impl Bundler for FakeBundler {
        fn bundle(&self, request: &BundleRequest) -> Result<ArtifactGraph, BundleError> {
            self.requests.lock().unwrap().push(request.clone());

            let mut graph = ArtifactGraph::new();
            match request.format {
                OutputFormat::Amd { .. } => {
                    graph.insert(Artifact::chunk(
                        "chunks/shared-AAAAAAAA.js",
                        ArtifactKind::SharedChunk,
                        "define('chunks/shared-AAAAAAAA', [], function () {});",
                    ));
                    for (name, path) in &request.inputs {
                        graph.insert(
                            Artifact::chunk(
                                format!("{}.js", name),
                                ArtifactKind::EntryChunk,
                                format!("define('{}', [], function () {{}});", name),
                            )
                            .with_imports(vec!["chunks/shared-AAAAAAAA.js".to_string()])
                            .with_facade(path.clone()),
                        );
                    }
                }
                OutputFormat::Plain => {
                    if self.fail_assets {
                        return Err(BundleError::Other("broken stylesheet".to_string()));
                    }
                    for name in request.inputs.keys() {
                        graph.insert(Artifact::asset(format!("{}.css", name), b"a{}".to_vec()));
                    }
                }
            }
            Ok(graph)
        }
    }

    fn fixture() -> MockFileSystem {
        MockFileSystem::new()
            .with_file("/repo/src/content/a.ts", "console.log('a');")
            .with_file("/repo/src/content/b.ts", "console.log('b');")
            .with_file("/repo/src/styles/tags.scss", ".tag {}")
    }

    fn entries() -> Vec<PathBuf> {
        ["src/content/a.ts", "src/content/b.ts", "src/styles/tags.scss"]
            .iter()
            .map(PathBuf::from)
            .collect()
    }

    #[test]
    fn remapping_lists_own_file_then_shared_chunk() {
        let fs = fixture();
        let use_case = PackUseCase::new(FakeBundler::default(), fs.clone());
        let outcome = use_case
            .execute(&entries(), &PackOptions::new("/repo", "/out"))
            .unwrap();

        let a = outcome.remapping.resolve(Path::new("src/content/a.ts"));
        assert_eq!(a.len(), 2);
        assert!(a[0].starts_with("a-") && a[0].ends_with(".js"));
        assert_eq!(a[1], "chunks/shared-AAAAAAAA.js");

        let tags = outcome.remapping.resolve(Path::new("src/styles/tags.scss"));
        assert_eq!(tags.len(), 1);
        assert!(tags[0].ends_with(".css"));

        assert_eq!(outcome.scripts, 2);
        assert_eq!(outcome.assets, 1);
        assert_eq!(outcome.shared_chunks, 1);
        assert_eq!(outcome.written_count(), 4);
    }

    #[test]
    fn written_code_is_isolated() {
        let fs = fixture();
        let use_case = PackUseCase::new(FakeBundler::default(), fs.clone());
        use_case
            .execute(&entries(), &PackOptions::new("/repo", "/out"))
            .unwrap();

        let shared = fs.contents("/out/chunks/shared-AAAAAAAA.js").unwrap();
        assert!(shared.starts_with("(() => {\n"));
        assert!(shared.ends_with("})();"));
    }

    #[test]
    fn passes_get_their_own_format_and_patterns() {
        let use_case = PackUseCase::new(FakeBundler::default(), fixture());
        use_case
            .execute(
                &entries(),
                &PackOptions::new("/repo", "/out").with_chunk_dir("shared"),
            )
            .unwrap();

        let requests = use_case.bundler.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let script = requests
            .iter()
            .find(|r| r.format == OutputFormat::Amd { auto_id: true })
            .unwrap();
        assert_eq!(script.inputs.len(), 2);
        assert_eq!(script.chunk_file_names, "shared/[name]-[hash].js");
        assert!(!script.inline_dynamic_imports);

        let asset = requests
            .iter()
            .find(|r| r.format == OutputFormat::Plain)
            .unwrap();
        assert_eq!(asset.inputs.len(), 1);
    }

    #[test]
    fn failed_pass_publishes_nothing() {
        let fs = fixture();
        let bundler = FakeBundler {
            fail_assets: true,
            ..FakeBundler::default()
        };
        let use_case = PackUseCase::new(bundler, fs.clone());

        let err = use_case
            .execute(&entries(), &PackOptions::new("/repo", "/out"))
            .unwrap_err();

        assert!(matches!(
            err,
            PackError::Bundler {
                pass: BuildPass::Assets,
                ..
            }
        ));
        assert!(fs.contents("/out/chunks/shared-AAAAAAAA.js").is_none());
    }

    #[test]
    fn failed_write_leaves_destination_untouched() {
        let fs = fixture().failing_write("chunks/shared-AAAAAAAA.js");
        let use_case = PackUseCase::new(FakeBundler::default(), fs.clone());

        let err = use_case
            .execute(&entries(), &PackOptions::new("/repo", "/out"))
            .unwrap_err();

        assert!(matches!(err, PackError::Fs(_)));
        assert!(fs.paths_under("/out").is_empty());
    }

    #[test]
    fn staging_directory_is_gone_after_success() {
        let fs = fixture();
        let use_case = PackUseCase::new(FakeBundler::default(), fs.clone());
        let outcome = use_case
            .execute(&entries(), &PackOptions::new("/repo", "/out"))
            .unwrap();

        let mut published = fs.paths_under("/out");
        published.sort();
        let mut written = outcome.written.clone();
        written.sort();
        assert_eq!(published, written);
    }

    #[test]
    fn unreadable_entry_aborts_before_bundling() {
        let use_case = PackUseCase::new(FakeBundler::default(), fixture());
        let err = use_case
            .execute(
                &[PathBuf::from("src/content/missing.ts")],
                &PackOptions::new("/repo", "/out"),
            )
            .unwrap_err();

        assert!(matches!(err, PackError::UnreadableEntry { .. }));
        assert!(use_case.bundler.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_group_skips_its_pass() {
        let use_case = PackUseCase::new(FakeBundler::default(), fixture());
        use_case
            .execute(
                &[PathBuf::from("src/content/a.ts")],
                &PackOptions::new("/repo", "/out"),
            )
            .unwrap();

        assert_eq!(use_case.bundler.requests.lock().unwrap().len(), 1);
    }
}
