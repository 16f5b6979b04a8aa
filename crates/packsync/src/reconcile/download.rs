//! Streaming download with atomic placement
//!
//! Files stream to a `.part` temp path and are renamed into place once
//! fully written, so a partially-downloaded file is never visible at
//! the final destination.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::reconcile::error::{FileOperation, ReconcileError, Result};

/// Create a temporary file path for partial downloads
pub(crate) fn temp_path(dest_path: &Path) -> PathBuf {
    dest_path.with_extension("part")
}

/// Download `url` to `dest_path`, returning the number of bytes written
pub(crate) async fn download_to_path(client: &Client, url: &str, dest_path: &Path) -> Result<u64> {
    debug!("stream downloading {url} to {}", dest_path.display());

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ReconcileError::io(parent, FileOperation::CreateDir, e))?;
    }

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ReconcileError::Network {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(ReconcileError::HttpStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let temp = temp_path(dest_path);
    let mut file = fs::File::create(&temp)
        .await
        .map_err(|e| ReconcileError::io(&temp, FileOperation::Create, e))?;

    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| ReconcileError::Network {
            url: url.to_string(),
            source,
        })?;
        file.write_all(&chunk)
            .await
            .map_err(|e| ReconcileError::io(&temp, FileOperation::Write, e))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| ReconcileError::io(&temp, FileOperation::Write, e))?;
    file.sync_all()
        .await
        .map_err(|e| ReconcileError::io(&temp, FileOperation::Write, e))?;
    drop(file);

    fs::rename(&temp, dest_path)
        .await
        .map_err(|e| ReconcileError::io(&temp, FileOperation::Rename, e))?;

    debug!("stream download completed: {written} bytes");
    Ok(written)
}
