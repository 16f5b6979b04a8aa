//! Local reconciler
//!
//! Brings a local instance directory into agreement with a sync
//! manifest: downloads missing files, skips files already present, and
//! applies the overrides archive when the manifest references one.
//!
//! One reconcile session runs on a single execution context; concurrent
//! syncs of the same local root are the caller's responsibility to
//! serialize. A session runs to completion or failure - any single
//! download failure aborts the whole session.

mod download;
pub mod error;
mod overrides;
pub mod progress;


pub use error::{FileOperation, ReconcileError};
pub use progress::{
    ConsoleSyncReporter, IntoSyncCallback, NullSyncReporter, SyncCallback, SyncEvent, SyncPhase,
    SyncReporter,
};

use std::path::{Path, PathBuf};

use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::fs;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::manifest::{Manifest, ManifestFile};
use error::Result;

/// Summary of a completed reconcile session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub overrides_applied: usize,
}

/// Reconciles a local directory against a manifest
pub struct Reconciler {
    client: Client,
    config: SyncConfig,
}

impl Reconciler {
    pub fn new(config: SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|source| ReconcileError::Client { source })?;

        Ok(Self { client, config })
    }

    /// Reconcile `local_root` against `manifest`
    ///
    /// Emits a [`SyncEvent`] per file (skip or download) plus phase
    /// transitions. Completes only after both mod files and overrides
    /// (when present) are processed; any failure transitions the
    /// session to [`SyncPhase::Error`] and returns the error.
    pub async fn reconcile(
        &self,
        manifest: &Manifest,
        local_root: &Path,
        on_progress: Option<SyncCallback>,
    ) -> Result<SyncReport> {
        let mut session = SyncSession::new(on_progress);

        match self.run(manifest, local_root, &mut session).await {
            Ok(report) => {
                session.enter(SyncPhase::Completed);
                Ok(report)
            }
            Err(err) => {
                session.enter(SyncPhase::Error);
                session.emit(SyncEvent::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        manifest: &Manifest,
        local_root: &Path,
        session: &mut SyncSession,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        session.enter(SyncPhase::Scanning);
        let mods_dir = local_root.join("mods");
        fs::create_dir_all(&mods_dir)
            .await
            .map_err(|e| ReconcileError::io(&mods_dir, FileOperation::CreateDir, e))?;

        let mut pending: Vec<(&ManifestFile, PathBuf)> = Vec::new();
        for file in &manifest.files {
            let dest = local_root.join(&file.path);
            if self.is_up_to_date(file, &dest).await? {
                // Present locally: treated as up to date, zero network
                // requests for this entry.
                session.emit(SyncEvent::FileSkipped {
                    path: file.path.clone(),
                    status: "already present, skipping".to_string(),
                });
                report.skipped += 1;
            } else {
                pending.push((file, dest));
            }
        }

        session.enter(SyncPhase::Downloading);
        for (file, dest) in pending {
            let size = self.download_with_retry(&file.url, &dest).await?;
            session.emit(SyncEvent::FileDownloaded {
                path: file.path.clone(),
                size,
                status: "downloaded".to_string(),
            });
            report.downloaded += 1;
        }

        if let Some(overrides_url) = &manifest.overrides_url {
            session.enter(SyncPhase::ApplyingOverrides);
            let files = overrides::apply_overrides(&self.client, overrides_url, local_root).await?;
            session.emit(SyncEvent::OverridesApplied { files });
            report.overrides_applied = files;
        }

        Ok(report)
    }

    /// Decide whether a manifest entry can be skipped
    ///
    /// The default rule is skip-on-exists. With
    /// [`SyncConfig::verify_existing_hashes`] set, an existing file is
    /// additionally checked against the manifest SHA-1 and re-downloaded
    /// on mismatch; the unknown-hash sentinel is never verified.
    async fn is_up_to_date(&self, file: &ManifestFile, dest: &Path) -> Result<bool> {
        if !dest.exists() {
            return Ok(false);
        }
        if !self.config.verify_existing_hashes || !file.has_known_hash() {
            return Ok(true);
        }

        let contents = fs::read(dest)
            .await
            .map_err(|e| ReconcileError::io(dest, FileOperation::Read, e))?;
        let actual = hex::encode(Sha1::digest(&contents));
        if actual.eq_ignore_ascii_case(&file.sha1) {
            Ok(true)
        } else {
            warn!(
                "local file '{}' does not match manifest hash, re-downloading",
                dest.display()
            );
            Ok(false)
        }
    }

    async fn download_with_retry(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.retry_delay_for(attempt - 1);
                debug!("retry attempt {attempt} for {url} after {delay:?}");
                tokio::time::sleep(delay).await;
            }

            match download::download_to_path(&self.client, url, dest).await {
                Ok(size) => return Ok(size),
                Err(err) => {
                    if !err.is_recoverable() {
                        return Err(err);
                    }
                    warn!("download of {url} failed (attempt {attempt}): {err}");
                    last_error = Some(err);
                }
            }
        }

        // All retries exhausted
        Err(last_error.expect("at least one download attempt ran"))
    }
}

/// Tracks the phase of one reconcile run and forwards events
struct SyncSession {
    phase: SyncPhase,
    callback: Option<SyncCallback>,
}

impl SyncSession {
    fn new(callback: Option<SyncCallback>) -> Self {
        Self {
            phase: SyncPhase::Idle,
            callback,
        }
    }

    fn enter(&mut self, phase: SyncPhase) {
        debug!("sync phase: {} -> {}", self.phase, phase);
        self.phase = phase;
        self.emit(SyncEvent::PhaseChanged { phase });
    }

    fn emit(&self, event: SyncEvent) {
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }
}
