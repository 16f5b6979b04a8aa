//! Persistence port for modpack versions and their mod sets
//!
//! The resolution core does not own storage; it consumes this
//! capability. The uniqueness of (version, project) enforced by
//! [`ModStore::insert_mod`] is the single source of truth for
//! "already installed" - not application-level locking.

pub mod memory;
pub mod persister;

#[cfg(test)]
mod tests;

pub use memory::MemoryStore;
pub use persister::persist_resolution;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manifest::Manifest;
use crate::registry::{CompatibilityContext, ProjectKind};

/// A version-pinned mod persisted into a modpack version's mod set
///
/// Uniquely identified by (modpack version, `project_id`). Rows are
/// never updated in place for version changes; a version bump creates
/// new rows under a new modpack version. The only mutations are
/// enable/disable toggling and deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMod {
    /// Canonical project id in the registry
    pub project_id: String,
    pub name: String,
    pub icon_url: Option<String>,
    /// The selected file version of the project
    pub file_id: String,
    pub kind: ProjectKind,
    pub file_url: String,
    pub file_name: String,
    /// Hex SHA-1 of the file, when the registry reported one
    pub file_sha1: Option<String>,
    pub file_size: u64,
    pub enabled: bool,
}

/// An immutable, versioned snapshot of a modpack's configuration
#[derive(Debug, Clone)]
pub struct ModpackVersionRecord {
    pub id: String,
    pub modpack_id: String,
    pub version_string: String,
    pub context: CompatibilityContext,
    pub loader_version: Option<String>,
    pub overrides_url: Option<String>,
    /// When present, a frozen manifest that takes precedence over live
    /// computation
    pub manifest_snapshot: Option<Manifest>,
}

impl ModpackVersionRecord {
    pub fn new(
        id: impl Into<String>,
        modpack_id: impl Into<String>,
        version_string: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            modpack_id: modpack_id.into(),
            version_string: version_string.into(),
            context: CompatibilityContext::default(),
            loader_version: None,
            overrides_url: None,
            manifest_snapshot: None,
        }
    }

    pub fn with_context(mut self, context: CompatibilityContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_loader_version(mut self, loader_version: impl Into<String>) -> Self {
        self.loader_version = Some(loader_version.into());
        self
    }

    pub fn with_overrides_url(mut self, overrides_url: impl Into<String>) -> Self {
        self.overrides_url = Some(overrides_url.into());
        self
    }
}

/// Errors produced by [`ModStore`] implementations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("modpack version '{version_id}' does not exist")]
    VersionNotFound { version_id: String },

    /// The (version, project) uniqueness constraint was violated.
    /// Treated as a benign no-op by the persister.
    #[error("project '{project_id}' is already installed in version '{version_id}'")]
    Duplicate {
        version_id: String,
        project_id: String,
    },

    #[error("project '{project_id}' is not installed in version '{version_id}'")]
    ModNotFound {
        version_id: String,
        project_id: String,
    },
}

/// Storage capability consumed by the persister and the manifest builder
#[async_trait]
pub trait ModStore: Send + Sync {
    async fn get_version(&self, version_id: &str) -> Result<ModpackVersionRecord, StoreError>;

    /// Canonical project ids already installed in the version
    async fn installed_project_ids(&self, version_id: &str) -> Result<HashSet<String>, StoreError>;

    /// Insert a mod row; atomic check-then-act on the (version, project)
    /// uniqueness constraint, returning [`StoreError::Duplicate`] when the
    /// project is already present
    async fn insert_mod(&self, version_id: &str, entry: &ResolvedMod) -> Result<(), StoreError>;

    async fn list_mods(&self, version_id: &str) -> Result<Vec<ResolvedMod>, StoreError>;

    async fn set_enabled(
        &self,
        version_id: &str,
        project_id: &str,
        enabled: bool,
    ) -> Result<(), StoreError>;

    async fn remove_mod(&self, version_id: &str, project_id: &str) -> Result<(), StoreError>;

    /// Freeze (or clear) the manifest snapshot on a version record
    async fn set_manifest_snapshot(
        &self,
        version_id: &str,
        snapshot: Option<Manifest>,
    ) -> Result<(), StoreError>;

    /// Point a modpack at one of its versions, or clear the target.
    /// An empty-string version id is normalized to "clear", never
    /// treated as a lookup key.
    async fn set_version_target(
        &self,
        modpack_id: &str,
        version_id: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn version_target(&self, modpack_id: &str) -> Result<Option<String>, StoreError>;
}
