//! Command-line front end
//!
//! `packsync resolve` resolves a mod and its dependency closure into a
//! manifest file; `packsync sync` reconciles a local instance directory
//! against such a manifest.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use packsync::reconcile::{ConsoleSyncReporter, IntoSyncCallback};
use packsync::{
    persist_resolution, CompatibilityContext, DependencyResolver, Manifest, ManifestBuilder,
    MemoryStore, ModRequest, ModStore, ModpackVersionRecord, ModrinthRegistry, Reconciler,
    SyncConfig,
};

#[derive(Parser)]
#[command(name = "packsync", about = "Resolve mod sets and sync local instances")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a mod and its required dependencies into a manifest
    Resolve {
        /// Project id or slug to resolve
        project: String,

        /// Game version constraint, e.g. 1.20.1
        #[arg(long)]
        game_version: Option<String>,

        /// Mod loader constraint, e.g. fabric
        #[arg(long)]
        loader: Option<String>,

        /// Pin the requested project to a specific file version
        #[arg(long)]
        file: Option<String>,

        /// Write the manifest here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reconcile a local instance directory against a manifest
    Sync {
        /// Path to a manifest produced by `resolve`
        manifest: PathBuf,

        /// Instance root to reconcile (defaults to the current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Hash-verify files that already exist locally
        #[arg(long)]
        verify: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("packsync=info")),
        )
        .init();

    match Cli::parse().command {
        Command::Resolve {
            project,
            game_version,
            loader,
            file,
            output,
        } => resolve(project, game_version, loader, file, output).await,
        Command::Sync {
            manifest,
            dir,
            verify,
        } => sync(manifest, dir, verify).await,
    }
}

async fn resolve(
    project: String,
    game_version: Option<String>,
    loader: Option<String>,
    file: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = SyncConfig::default();
    let registry = ModrinthRegistry::new(&config)?;

    let context = CompatibilityContext::new(game_version, loader);
    let store = MemoryStore::new();
    store.upsert_version(
        ModpackVersionRecord::new("local", "local", "0.0.0").with_context(context.clone()),
    );

    let mut request = ModRequest::new(&project);
    if let Some(file) = file {
        request = request.with_file_ref(file);
    }

    let installed = store.installed_project_ids("local").await?;
    let resolution = DependencyResolver::new(&registry)
        .resolve(&request, &context, &installed)
        .await?;

    for unresolved in &resolution.unresolved {
        eprintln!(
            "warning: '{}' could not be resolved: {}",
            unresolved.project_ref, unresolved.reason
        );
    }

    let created = persist_resolution(&store, "local", &resolution.mods).await?;
    eprintln!("resolved {} mods for '{project}'", created.len());

    let manifest = ManifestBuilder::new(&store).build("local").await?;
    let json = serde_json::to_string_pretty(&manifest)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write manifest to {}", path.display()))?;
            eprintln!("manifest written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn sync(manifest_path: PathBuf, dir: PathBuf, verify: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read manifest {}", manifest_path.display()))?;
    let manifest: Manifest =
        serde_json::from_str(&raw).context("manifest is not valid manifest JSON")?;

    let config = SyncConfig {
        verify_existing_hashes: verify,
        ..SyncConfig::default()
    };

    let report = Reconciler::new(config)?
        .reconcile(&manifest, &dir, Some(ConsoleSyncReporter.into_callback()))
        .await?;

    println!(
        "sync complete: {} downloaded, {} skipped, {} override files",
        report.downloaded, report.skipped, report.overrides_applied
    );
    Ok(())
}
