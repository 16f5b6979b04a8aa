//! Packsync Library
//!
//! This library implements the modpack resolution and sync core: it
//! resolves a requested mod and its transitive required dependencies
//! against a version-constrained mod registry, persists the resulting
//! mod set idempotently, builds an authoritative sync manifest, and
//! reconciles a local mod directory against that manifest.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use packsync::{
//!     config::SyncConfig,
//!     manifest::ManifestBuilder,
//!     registry::{CompatibilityContext, ModrinthRegistry},
//!     resolver::{DependencyResolver, ModRequest},
//!     store::{persist_resolution, MemoryStore, ModStore, ModpackVersionRecord},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::default();
//! let registry = ModrinthRegistry::new(&config)?;
//!
//! let context = CompatibilityContext::new(Some("1.20.1"), Some("fabric"));
//! let store = MemoryStore::new();
//! store.upsert_version(
//!     ModpackVersionRecord::new("version-1", "my-pack", "1.0.0")
//!         .with_context(context.clone()),
//! );
//!
//! // Resolve the requested mod plus its required dependency closure.
//! let resolver = DependencyResolver::new(&registry);
//! let installed = store.installed_project_ids("version-1").await?;
//! let resolution = resolver
//!     .resolve(&ModRequest::new("fabric-api"), &context, &installed)
//!     .await?;
//!
//! // Persist the new mods; already-installed projects are skipped.
//! let created = persist_resolution(&store, "version-1", &resolution.mods).await?;
//! println!("installed {} new mods", created.len());
//!
//! // Build the manifest the desktop client reconciles against.
//! let manifest = ManifestBuilder::new(&store).build("version-1").await?;
//! println!("manifest carries {} files", manifest.files.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Typed registry boundary**: registry JSON is validated and converted
//!   into explicit records before any other component sees it
//! - **Best-effort resolution**: one unresolvable dependency never aborts
//!   the rest of the graph; only a missing root request is a hard failure
//! - **Idempotent persistence**: uniqueness of (version, project) is the
//!   single source of truth for "already installed"
//! - **Frozen manifests**: a stored manifest snapshot wins over live
//!   computation, letting editors pin a version for reproducibility
//! - **Atomic reconciliation**: downloads stream to a temp file and are
//!   renamed into place, so no partial file is ever visible

pub mod config;
pub mod manifest;
pub mod reconcile;
pub mod registry;
pub mod resolver;
pub mod store;

// Re-export commonly used types for convenience
pub use config::SyncConfig;
pub use manifest::{Manifest, ManifestBuilder, ManifestError, ManifestFile, UNKNOWN_SHA1};
pub use reconcile::{ReconcileError, Reconciler, SyncCallback, SyncEvent, SyncPhase, SyncReport};
pub use registry::{
    CompatibilityContext, DependencyEdge, DependencyKind, FileCandidate, ModRegistry,
    ModrinthRegistry, ProjectKind, ProjectMetadata, RegistryError,
};
pub use resolver::{DependencyResolver, ModRequest, ResolveError, Resolution};
pub use store::{
    persist_resolution, MemoryStore, ModStore, ModpackVersionRecord, ResolvedMod, StoreError,
};
