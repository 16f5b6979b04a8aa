//! Overrides application
//!
//! A modpack version may reference an overrides archive (configs,
//! resource packs, anything outside the mod list). It is fetched after
//! all mod files are handled and extracted over the instance root.

use std::io::Read;
use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::{debug, warn};

use crate::reconcile::download::download_to_path;
use crate::reconcile::error::{FileOperation, ReconcileError, Result};

/// Fetch the overrides archive and extract it over `root`, returning
/// the number of files written
pub(crate) async fn apply_overrides(client: &Client, url: &str, root: &Path) -> Result<usize> {
    let staging = tempfile::tempdir().map_err(|e| {
        ReconcileError::io(std::env::temp_dir(), FileOperation::CreateDir, e)
    })?;
    let archive_path = staging.path().join("overrides.zip");

    download_to_path(client, url, &archive_path).await?;

    let root = root.to_path_buf();
    let count = tokio::task::spawn_blocking(move || extract_archive(&archive_path, &root))
        .await
        .map_err(|e| ReconcileError::Overrides {
            source: Box::new(e),
        })??;

    debug!("applied {count} override files from {url}");
    Ok(count)
}

fn extract_archive(archive_path: &Path, root: &Path) -> Result<usize> {
    let file = std::fs::File::open(archive_path)
        .map_err(|e| ReconcileError::io(archive_path, FileOperation::Read, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ReconcileError::Overrides {
        source: Box::new(e),
    })?;

    let mut written = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| ReconcileError::Overrides {
            source: Box::new(e),
        })?;

        // enclosed_name rejects entries that would escape the root
        let Some(relative) = entry.enclosed_name() else {
            warn!("skipping override entry with unsafe path: {}", entry.name());
            continue;
        };
        let dest: PathBuf = root.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&dest)
                .map_err(|e| ReconcileError::io(&dest, FileOperation::CreateDir, e))?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ReconcileError::io(parent, FileOperation::CreateDir, e))?;
        }

        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut contents)
            .map_err(|e| ReconcileError::io(&dest, FileOperation::Read, e))?;
        std::fs::write(&dest, contents)
            .map_err(|e| ReconcileError::io(&dest, FileOperation::Write, e))?;
        written += 1;
    }

    Ok(written)
}
