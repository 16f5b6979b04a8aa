//! Registry client
//!
//! Queries an external mod registry for project metadata and version
//! lists filtered by game version and loader. Registry JSON is
//! deserialized into private wire structs and converted into the typed
//! records in [`types`] at this boundary, so no other component ever
//! sees untyped payloads.

pub mod error;
pub mod modrinth;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{RegistryError, Result};
pub use modrinth::ModrinthRegistry;
pub use types::{
    CompatibilityContext, DependencyEdge, DependencyKind, FileCandidate, ProjectKind,
    ProjectMetadata,
};

use async_trait::async_trait;

/// Query capability over an external mod registry
///
/// Implementations are pure queries with no side effects. The ordering
/// of [`get_versions`](ModRegistry::get_versions) results is trusted as
/// the selection priority: index 0 is the best match for the given
/// constraints. No candidate matching the constraints yields an empty
/// list, not an error.
#[async_trait]
pub trait ModRegistry: Send + Sync {
    /// Look up a project by any reference the registry accepts (canonical
    /// id, slug, or mirror alias). The returned metadata carries the
    /// canonical project id.
    async fn get_project(&self, project_ref: &str) -> Result<ProjectMetadata>;

    /// List file candidates for a project, filtered by the compatibility
    /// context, most-compatible-first.
    async fn get_versions(
        &self,
        project_ref: &str,
        context: &CompatibilityContext,
    ) -> Result<Vec<FileCandidate>>;
}
