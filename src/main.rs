//! scriptpack CLI - content-script packager for browser extensions
//!
//! Usage: scriptpack <COMMAND>
//!
//! Commands:
//!   pack  Package content scripts and stylesheets
//!   key   Print the output key of entry files

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use scriptpack::domain::ports::FileSystem;
use scriptpack::domain::services::output_key_for;
use scriptpack::{
    collect_content_scripts, rewrite_content_scripts, Config, LocalFs, PackOptions, PackUseCase,
    StaticImportBundler,
};

/// scriptpack - content-script packager for browser extensions
#[derive(Parser, Debug)]
#[command(name = "scriptpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Package content scripts and stylesheets
    Pack {
        /// Entry files, relative to the project root
        entries: Vec<PathBuf>,

        /// Project root
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Destination directory (overrides build.out_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Manifest whose content scripts are packaged
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Write the rewritten manifest here
        #[arg(long, requires = "manifest")]
        manifest_out: Option<PathBuf>,

        /// Write the path remapping table here as JSON
        #[arg(long)]
        remap_out: Option<PathBuf>,
    },

    /// Print the output key of entry files
    Key {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    scriptpack::logging::init(cli.verbose);

    match cli.command {
        Commands::Pack {
            entries,
            root,
            out_dir,
            manifest,
            manifest_out,
            remap_out,
        } => cmd_pack(
            entries,
            &root,
            out_dir,
            manifest.as_deref(),
            manifest_out.as_deref(),
            remap_out.as_deref(),
            cli.json,
        ),
        Commands::Key { files } => cmd_key(&files, cli.json),
    }
}

fn cmd_pack(
    mut entries: Vec<PathBuf>,
    root: &Path,
    out_dir: Option<PathBuf>,
    manifest_path: Option<&Path>,
    manifest_out: Option<&Path>,
    remap_out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let root = root
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("project root {}: {}", root.display(), e))?;

    let (config, warnings) = Config::load_or_default(&root)?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let mut options = PackOptions::from_config(&config, &root);
    if let Some(dir) = out_dir {
        options = options.with_out_dir(dir);
    }

    let fs = LocalFs::new();
    let mut manifest = match manifest_path {
        Some(path) => {
            let content = fs.read(path)?;
            Some(serde_json::from_slice::<serde_json::Value>(&content)?)
        }
        None => None,
    };

    if entries.is_empty() {
        if let Some(manifest) = &manifest {
            entries = collect_content_scripts(manifest)?;
        }
    }
    if entries.is_empty() {
        anyhow::bail!("Nothing to pack: pass entry files or --manifest");
    }

    let use_case = PackUseCase::new(StaticImportBundler::new(), fs);
    let outcome = use_case.execute(&entries, &options)?;

    if let Some(path) = remap_out {
        let table = serde_json::to_string_pretty(&outcome.remapping)?;
        fs.write(path, table.as_bytes())?;
    }

    if let (Some(manifest), Some(path)) = (manifest.as_mut(), manifest_out) {
        rewrite_content_scripts(manifest, &outcome.remapping, &config.build.scripts_prefix)?;
        let content = serde_json::to_string_pretty(manifest)?;
        fs.write(path, content.as_bytes())?;
    }

    if json {
        let output = serde_json::json!({
            "event": "pack",
            "status": "success",
            "scripts": outcome.scripts,
            "assets": outcome.assets,
            "shared_chunks": outcome.shared_chunks,
            "written": outcome.written,
            "remapping": outcome.remapping,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "Packed {} scripts and {} assets into {}",
            outcome.scripts,
            outcome.assets,
            options.out_dir.display()
        );
        for (entry, files) in outcome.remapping.iter() {
            println!("  {} -> {}", entry.display(), files.join(", "));
        }
        println!(
            "  {} files written, {} shared chunks",
            outcome.written_count(),
            outcome.shared_chunks
        );
    }

    Ok(())
}

fn cmd_key(files: &[PathBuf], json: bool) -> Result<()> {
    let fs = LocalFs::new();
    let mut keys = Vec::with_capacity(files.len());
    for file in files {
        keys.push((file, output_key_for(&fs, file)?));
    }

    if json {
        let output: Vec<_> = keys
            .iter()
            .map(|(file, key)| serde_json::json!({ "path": file, "key": key.as_str() }))
            .collect();
        println!("{}", serde_json::to_string(&output)?);
    } else {
        for (file, key) in &keys {
            println!("{}\t{}", key, file.display());
        }
    }

    Ok(())
}
