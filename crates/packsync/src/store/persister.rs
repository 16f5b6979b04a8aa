//! Mod set persister
//!
//! Writes a resolved mod set into a modpack version, idempotently with
//! respect to already-installed mods.

use tracing::debug;

use crate::store::{ModStore, ResolvedMod, StoreError};

/// Persist resolved mods into a modpack version, returning the rows
/// actually created.
///
/// Entries whose project is already installed at persist time are
/// skipped without error, and a [`StoreError::Duplicate`] raised by a
/// concurrent resolution run for the same version is absorbed the same
/// way - the store's uniqueness constraint decides, not us. The
/// installed snapshot is extended as rows are written, so a later entry
/// in the same batch that duplicates an earlier one is also skipped.
pub async fn persist_resolution(
    store: &dyn ModStore,
    version_id: &str,
    mods: &[ResolvedMod],
) -> Result<Vec<ResolvedMod>, StoreError> {
    let mut installed = store.installed_project_ids(version_id).await?;
    let mut created = Vec::new();

    for entry in mods {
        if installed.contains(&entry.project_id) {
            debug!(
                "project '{}' already installed in '{version_id}', skipping",
                entry.project_id
            );
            continue;
        }

        match store.insert_mod(version_id, entry).await {
            Ok(()) => {
                installed.insert(entry.project_id.clone());
                created.push(entry.clone());
            }
            Err(StoreError::Duplicate { project_id, .. }) => {
                // Lost a race against another resolution run; the row is
                // there either way.
                debug!("project '{project_id}' inserted concurrently, skipping");
                installed.insert(project_id);
            }
            Err(other) => return Err(other),
        }
    }

    Ok(created)
}
