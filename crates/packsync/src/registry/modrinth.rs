//! Modrinth-backed registry client
//!
//! HTTP implementation of [`ModRegistry`] against a Modrinth-v2-shaped
//! API. The base URL is injectable so tests can point the client at a
//! mock server.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::SyncConfig;
use crate::registry::{
    error::{RegistryError, Result},
    CompatibilityContext, DependencyEdge, FileCandidate, ModRegistry, ProjectMetadata,
};

/// Registry client speaking the Modrinth v2 API
pub struct ModrinthRegistry {
    client: Client,
    base_url: String,
}

impl ModrinthRegistry {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.modrinth.com/v2";

    /// Create a client against the public Modrinth API
    pub fn new(config: &SyncConfig) -> Result<Self> {
        Self::with_base_url(config, Self::DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (used by tests)
    pub fn with_base_url(config: &SyncConfig, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|source| RegistryError::Client { source })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build the version-listing URL with the context encoded as
    /// Modrinth facet-style query parameters
    fn versions_url(&self, project_ref: &str, context: &CompatibilityContext) -> String {
        let mut url = format!("{}/project/{}/version", self.base_url, project_ref);

        let mut params = Vec::new();
        if let Some(ref game_version) = context.game_version {
            params.push(format!("game_versions=[\"{game_version}\"]"));
        }
        if let Some(ref loader) = context.loader {
            params.push(format!("loaders=[\"{loader}\"]"));
        }
        if !params.is_empty() {
            url = format!("{}?{}", url, params.join("&"));
        }
        url
    }
}

#[async_trait]
impl ModRegistry for ModrinthRegistry {
    async fn get_project(&self, project_ref: &str) -> Result<ProjectMetadata> {
        let url = format!("{}/project/{}", self.base_url, project_ref);
        debug!("fetching project metadata: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistryError::upstream(&url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound {
                project_ref: project_ref.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(RegistryError::upstream_status(&url, response.status()));
        }

        let payload: ProjectPayload = response
            .json()
            .await
            .map_err(|e| RegistryError::upstream(&url, e))?;

        Ok(payload.into_metadata())
    }

    async fn get_versions(
        &self,
        project_ref: &str,
        context: &CompatibilityContext,
    ) -> Result<Vec<FileCandidate>> {
        let url = self.versions_url(project_ref, context);
        debug!("fetching version candidates: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistryError::upstream(&url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound {
                project_ref: project_ref.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(RegistryError::upstream_status(&url, response.status()));
        }

        let payload: Vec<VersionPayload> = response
            .json()
            .await
            .map_err(|e| RegistryError::upstream(&url, e))?;

        // The registry returns versions most-compatible-first; that order
        // is preserved as the selection priority.
        Ok(payload
            .into_iter()
            .filter_map(VersionPayload::into_candidate)
            .collect())
    }
}

// Wire structs for the Modrinth v2 API. Converted into typed records
// before leaving this module.

#[derive(Debug, Deserialize)]
struct ProjectPayload {
    id: String,
    slug: String,
    title: String,
    icon_url: Option<String>,
    project_type: String,
}

impl ProjectPayload {
    fn into_metadata(self) -> ProjectMetadata {
        ProjectMetadata {
            kind: self.project_type.as_str().into(),
            id: self.id,
            slug: self.slug,
            title: self.title,
            icon_url: self.icon_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VersionPayload {
    id: String,
    #[serde(default)]
    dependencies: Vec<DependencyPayload>,
    files: Vec<FilePayload>,
}

impl VersionPayload {
    /// Pick the primary file of the version; a version with no files at
    /// all is dropped from the candidate list
    fn into_candidate(self) -> Option<FileCandidate> {
        let dependencies = self
            .dependencies
            .into_iter()
            .map(|dep| DependencyEdge {
                project_id: dep.project_id,
                kind: dep.dependency_type.as_str().into(),
            })
            .collect();

        let file = {
            let primary_index = self.files.iter().position(|f| f.primary).unwrap_or(0);
            self.files.into_iter().nth(primary_index)?
        };

        Some(FileCandidate {
            file_id: self.id,
            url: file.url,
            file_name: file.filename,
            sha1: file.hashes.sha1,
            size: file.size,
            dependencies,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FilePayload {
    url: String,
    filename: String,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    hashes: HashesPayload,
}

#[derive(Debug, Default, Deserialize)]
struct HashesPayload {
    sha1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DependencyPayload {
    project_id: Option<String>,
    dependency_type: String,
}
