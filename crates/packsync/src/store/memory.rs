//! In-memory store implementation
//!
//! Backs tests and the CLI. The uniqueness constraint is enforced as an
//! atomic check-then-act under a single lock, matching the semantics a
//! database unique index provides.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::manifest::Manifest;
use crate::store::{ModStore, ModpackVersionRecord, ResolvedMod, StoreError};

#[derive(Default)]
struct Inner {
    versions: HashMap<String, ModpackVersionRecord>,
    /// Mod rows per version id, insertion-ordered
    mods: HashMap<String, Vec<ResolvedMod>>,
    /// Active version target per modpack id
    targets: HashMap<String, String>,
}

/// Mutex-guarded in-memory [`ModStore`]
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a modpack version record
    pub fn upsert_version(&self, record: ModpackVersionRecord) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.mods.entry(record.id.clone()).or_default();
        inner.versions.insert(record.id.clone(), record);
    }
}

impl Inner {
    fn require_version(&self, version_id: &str) -> Result<(), StoreError> {
        if self.versions.contains_key(version_id) {
            Ok(())
        } else {
            Err(StoreError::VersionNotFound {
                version_id: version_id.to_string(),
            })
        }
    }
}

#[async_trait]
impl ModStore for MemoryStore {
    async fn get_version(&self, version_id: &str) -> Result<ModpackVersionRecord, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .versions
            .get(version_id)
            .cloned()
            .ok_or_else(|| StoreError::VersionNotFound {
                version_id: version_id.to_string(),
            })
    }

    async fn installed_project_ids(&self, version_id: &str) -> Result<HashSet<String>, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.require_version(version_id)?;
        Ok(inner
            .mods
            .get(version_id)
            .map(|rows| rows.iter().map(|m| m.project_id.clone()).collect())
            .unwrap_or_default())
    }

    async fn insert_mod(&self, version_id: &str, entry: &ResolvedMod) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.require_version(version_id)?;

        let rows = inner.mods.entry(version_id.to_string()).or_default();
        if rows.iter().any(|m| m.project_id == entry.project_id) {
            return Err(StoreError::Duplicate {
                version_id: version_id.to_string(),
                project_id: entry.project_id.clone(),
            });
        }
        rows.push(entry.clone());
        Ok(())
    }

    async fn list_mods(&self, version_id: &str) -> Result<Vec<ResolvedMod>, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.require_version(version_id)?;
        Ok(inner.mods.get(version_id).cloned().unwrap_or_default())
    }

    async fn set_enabled(
        &self,
        version_id: &str,
        project_id: &str,
        enabled: bool,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.require_version(version_id)?;

        let rows = inner.mods.entry(version_id.to_string()).or_default();
        match rows.iter_mut().find(|m| m.project_id == project_id) {
            Some(row) => {
                row.enabled = enabled;
                Ok(())
            }
            None => Err(StoreError::ModNotFound {
                version_id: version_id.to_string(),
                project_id: project_id.to_string(),
            }),
        }
    }

    async fn remove_mod(&self, version_id: &str, project_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.require_version(version_id)?;

        let rows = inner.mods.entry(version_id.to_string()).or_default();
        let before = rows.len();
        rows.retain(|m| m.project_id != project_id);
        if rows.len() == before {
            return Err(StoreError::ModNotFound {
                version_id: version_id.to_string(),
                project_id: project_id.to_string(),
            });
        }
        Ok(())
    }

    async fn set_manifest_snapshot(
        &self,
        version_id: &str,
        snapshot: Option<Manifest>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        match inner.versions.get_mut(version_id) {
            Some(record) => {
                record.manifest_snapshot = snapshot;
                Ok(())
            }
            None => Err(StoreError::VersionNotFound {
                version_id: version_id.to_string(),
            }),
        }
    }

    async fn set_version_target(
        &self,
        modpack_id: &str,
        version_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        // Empty string is an explicit clear, not a lookup key.
        match version_id.filter(|id| !id.is_empty()) {
            Some(id) => {
                inner.require_version(id)?;
                inner.targets.insert(modpack_id.to_string(), id.to_string());
            }
            None => {
                inner.targets.remove(modpack_id);
            }
        }
        Ok(())
    }

    async fn version_target(&self, modpack_id: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner.targets.get(modpack_id).cloned())
    }
}
