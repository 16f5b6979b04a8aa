//! Typed records produced at the registry boundary

use serde::{Deserialize, Serialize};

/// The game version / loader constraints of a modpack version
///
/// Immutable per modpack version; applied to every candidate lookup
/// during resolution. `None` means "unconstrained" for that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityContext {
    pub game_version: Option<String>,
    pub loader: Option<String>,
}

impl CompatibilityContext {
    pub fn new<S: Into<String>>(game_version: Option<S>, loader: Option<S>) -> Self {
        Self {
            game_version: game_version.map(Into::into),
            loader: loader.map(Into::into),
        }
    }
}

/// What kind of content a project is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Mod,
    Resourcepack,
    Shader,
    Datapack,
    #[serde(other)]
    Unknown,
}

impl From<&str> for ProjectKind {
    fn from(value: &str) -> Self {
        match value {
            "mod" => ProjectKind::Mod,
            "resourcepack" => ProjectKind::Resourcepack,
            "shader" => ProjectKind::Shader,
            "datapack" => ProjectKind::Datapack,
            _ => ProjectKind::Unknown,
        }
    }
}

/// Project metadata as returned by the registry
///
/// `id` is the canonical project id; looking a project up via an alias
/// or mirror reference still yields the canonical id here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub icon_url: Option<String>,
    pub kind: ProjectKind,
}

/// How a dependency edge binds the depending file to another project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyKind {
    /// Must be installed for the depending mod to function; the only
    /// kind that drives further resolution
    Required,
    Optional,
    Incompatible,
    /// Shipped inside the depending file itself
    Embedded,
    Unknown,
}

impl From<&str> for DependencyKind {
    fn from(value: &str) -> Self {
        match value {
            "required" => DependencyKind::Required,
            "optional" => DependencyKind::Optional,
            "incompatible" => DependencyKind::Incompatible,
            "embedded" => DependencyKind::Embedded,
            _ => DependencyKind::Unknown,
        }
    }
}

/// A dependency edge on a file candidate (transient, never persisted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Canonical id of the target project; registries may omit it for
    /// version-pinned edges, which resolution then skips
    pub project_id: Option<String>,
    pub kind: DependencyKind,
}

/// A downloadable file version of a project, compatible with some context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Registry identifier for this file version
    pub file_id: String,
    pub url: String,
    pub file_name: String,
    /// Hex SHA-1 of the file contents, when the registry reports one
    pub sha1: Option<String>,
    pub size: u64,
    pub dependencies: Vec<DependencyEdge>,
}

impl FileCandidate {
    /// Dependency edges that must be followed during resolution
    pub fn required_dependencies(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.dependencies
            .iter()
            .filter(|edge| edge.kind == DependencyKind::Required)
    }
}
