//! Sync manifest
//!
//! The authoritative, serializable description of a modpack version's
//! file set, consumed by the desktop client to reconcile its local mod
//! directory. Field names are the wire contract: `files[].sha1`,
//! `.sizeBytes`, `.url` and `.path` are always present, possibly as
//! sentinel values, never omitted.


use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::registry::ProjectKind;
use crate::store::{ModStore, StoreError};

/// Well-known sentinel for "hash unknown"
///
/// Consumers must treat this value as "do not hash-verify", not as a
/// real digest.
pub const UNKNOWN_SHA1: &str = "0000000000000000000000000000000000000000";

/// A single file entry in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFile {
    /// Path relative to the instance root, e.g. `mods/fabric-api.jar`
    pub path: String,
    /// Hex SHA-1, or [`UNKNOWN_SHA1`] when the source hash is missing
    pub sha1: String,
    pub size_bytes: u64,
    pub kind: ProjectKind,
    pub project_ref: String,
    pub file_ref: String,
    pub url: String,
}

impl ManifestFile {
    /// Whether the entry carries a real hash that can be verified
    pub fn has_known_hash(&self) -> bool {
        self.sha1 != UNKNOWN_SHA1
    }
}

/// Read-only snapshot of a modpack version's file set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version_id: String,
    pub modpack_id: String,
    pub version_string: String,
    pub game_version: Option<String>,
    pub loader: Option<String>,
    pub loader_version: Option<String>,
    pub overrides_url: Option<String>,
    pub files: Vec<ManifestFile>,
}

/// Errors produced by [`ManifestBuilder::build`]
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("modpack version '{version_id}' does not exist")]
    VersionNotFound { version_id: String },

    #[error(transparent)]
    Store(StoreError),
}

/// Assembles manifests from the persisted mod set
pub struct ManifestBuilder<'a> {
    store: &'a dyn ModStore,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(store: &'a dyn ModStore) -> Self {
        Self { store }
    }

    /// Build the manifest for a modpack version
    ///
    /// Only enabled mods are included. If the version record carries a
    /// frozen manifest snapshot, the snapshot wins over live
    /// computation - editors may pin a manifest for reproducibility even
    /// after the live mod set changes.
    pub async fn build(&self, version_id: &str) -> Result<Manifest, ManifestError> {
        let record = self
            .store
            .get_version(version_id)
            .await
            .map_err(map_store_error)?;

        if let Some(snapshot) = record.manifest_snapshot {
            debug!("serving frozen manifest snapshot for '{version_id}'");
            return Ok(snapshot);
        }

        let files = self
            .store
            .list_mods(version_id)
            .await
            .map_err(map_store_error)?
            .into_iter()
            .filter(|entry| entry.enabled)
            .map(|entry| ManifestFile {
                path: format!("mods/{}", entry.file_name),
                sha1: entry
                    .file_sha1
                    .unwrap_or_else(|| UNKNOWN_SHA1.to_string()),
                size_bytes: entry.file_size,
                kind: entry.kind,
                project_ref: entry.project_id,
                file_ref: entry.file_id,
                url: entry.file_url,
            })
            .collect();

        Ok(Manifest {
            version_id: record.id,
            modpack_id: record.modpack_id,
            version_string: record.version_string,
            game_version: record.context.game_version,
            loader: record.context.loader,
            loader_version: record.loader_version,
            overrides_url: record.overrides_url,
            files,
        })
    }
}

fn map_store_error(err: StoreError) -> ManifestError {
    match err {
        StoreError::VersionNotFound { version_id } => ManifestError::VersionNotFound { version_id },
        other => ManifestError::Store(other),
    }
}
