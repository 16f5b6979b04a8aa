//! Dependency resolver
//!
//! Transitively resolves a mod request into a complete, deduplicated,
//! version-pinned mod set. Resolution is breadth-first over an explicit
//! worklist: a queue of project references plus a memoization set of
//! ids already evaluated this run, seeded with the canonicalized root
//! request.
//!
//! Resolution is best-effort below the root: a dependency that cannot
//! be looked up, or that has zero compatible file candidates for the
//! modpack's context, is recorded as unresolved and logged, and every
//! sibling branch still resolves. Only a root request that cannot be
//! canonicalized at all is a hard failure - there is nothing to
//! resolve.


use std::collections::{HashSet, VecDeque};

use thiserror::Error;
use tracing::{debug, warn};

use crate::registry::{
    CompatibilityContext, FileCandidate, ModRegistry, ProjectMetadata, RegistryError,
};
use crate::store::ResolvedMod;

/// Input to resolution
///
/// `file_ref` is honored only for the directly-requested mod, never for
/// transitive dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModRequest {
    pub project_ref: String,
    pub file_ref: Option<String>,
}

impl ModRequest {
    pub fn new(project_ref: impl Into<String>) -> Self {
        Self {
            project_ref: project_ref.into(),
            file_ref: None,
        }
    }

    /// Pin the root request to a specific file version
    pub fn with_file_ref(mut self, file_ref: impl Into<String>) -> Self {
        self.file_ref = Some(file_ref.into());
        self
    }
}

/// A node that could not be resolved; surfaced for observability, never
/// fatal
#[derive(Debug, Clone)]
pub struct UnresolvedDependency {
    pub project_ref: String,
    pub reason: String,
}

/// Outcome of a resolution run
#[derive(Debug, Default)]
pub struct Resolution {
    /// New mods keyed by canonical project id, excluding anything the
    /// caller reported as already installed
    pub mods: Vec<ResolvedMod>,
    pub unresolved: Vec<UnresolvedDependency>,
}

/// Errors that abort resolution entirely
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The root request could not be canonicalized; all downstream
    /// failures are absorbed per the best-effort policy instead
    #[error("root project '{project_ref}' could not be resolved")]
    RootProject {
        project_ref: String,
        #[source]
        source: RegistryError,
    },
}

/// Breadth-first resolver over a [`ModRegistry`]
pub struct DependencyResolver<'a> {
    registry: &'a dyn ModRegistry,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(registry: &'a dyn ModRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `request` and its transitive required dependencies under
    /// `context`, skipping everything in `installed`.
    ///
    /// `installed` holds the canonical project ids already present in
    /// the target modpack version, fetched once up front by the caller.
    pub async fn resolve(
        &self,
        request: &ModRequest,
        context: &CompatibilityContext,
        installed: &HashSet<String>,
    ) -> Result<Resolution, ResolveError> {
        // Step 1: canonicalize the root. A request may use a mirror or
        // alias reference; keying everything by the canonical id
        // prevents duplicate installs of the same logical project.
        let root_meta = self
            .registry
            .get_project(&request.project_ref)
            .await
            .map_err(|source| ResolveError::RootProject {
                project_ref: request.project_ref.clone(),
                source,
            })?;
        let root_id = root_meta.id.clone();
        debug!(
            "resolving '{}' (canonical '{root_id}') against {context:?}",
            request.project_ref
        );

        let mut queue: VecDeque<String> = VecDeque::new();
        let mut processed: HashSet<String> = HashSet::new();
        let mut resolution = Resolution::default();
        let mut root_meta = Some(root_meta);

        queue.push_back(root_id.clone());

        while let Some(project_ref) = queue.pop_front() {
            // Idempotence: a mod already installed is never re-resolved,
            // and no id is evaluated twice even when reached via multiple
            // dependency paths.
            if installed.contains(&project_ref) || processed.contains(&project_ref) {
                continue;
            }
            processed.insert(project_ref.clone());

            // Canonicalize this node. The root's metadata was already
            // fetched; dependency ids usually are canonical already, but
            // an alias still collapses onto its canonical id here.
            let meta = if project_ref == root_id {
                root_meta.take().expect("root metadata consumed once")
            } else {
                match self.registry.get_project(&project_ref).await {
                    Ok(meta) => meta,
                    Err(err) => {
                        warn!("skipping dependency '{project_ref}': {err}");
                        resolution.unresolved.push(UnresolvedDependency {
                            project_ref,
                            reason: err.to_string(),
                        });
                        continue;
                    }
                }
            };

            if meta.id != project_ref {
                if installed.contains(&meta.id) || processed.contains(&meta.id) {
                    continue;
                }
                processed.insert(meta.id.clone());
            }

            // One registry query per canonical id, even under diamond
            // dependencies - `processed` is the memoization set.
            let candidates = match self.registry.get_versions(&meta.id, context).await {
                Ok(candidates) => candidates,
                Err(err) => {
                    warn!("no candidates for '{}': {err}", meta.id);
                    resolution.unresolved.push(UnresolvedDependency {
                        project_ref: meta.id,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let Some(file) = select_candidate(&candidates, &meta.id, &root_id, request) else {
                warn!(
                    "project '{}' has no compatible files for {context:?}, dropping",
                    meta.id
                );
                resolution.unresolved.push(UnresolvedDependency {
                    project_ref: meta.id,
                    reason: "no compatible file candidates".to_string(),
                });
                continue;
            };

            // Required edges drive further resolution; optional and
            // incompatible edges are never enqueued.
            for edge in file.required_dependencies() {
                let Some(dep_id) = &edge.project_id else {
                    debug!("ignoring version-pinned edge without a project id");
                    continue;
                };
                if !installed.contains(dep_id) && !processed.contains(dep_id) {
                    queue.push_back(dep_id.clone());
                }
            }

            resolution.mods.push(to_resolved_mod(&meta, file));
        }

        debug!(
            "resolved {} mods ({} unresolved) for '{root_id}'",
            resolution.mods.len(),
            resolution.unresolved.len()
        );
        Ok(resolution)
    }
}

/// Pick the file to install for a node
///
/// For the root request with an explicit file reference, that exact
/// file is preferred when present among the candidates; everything else
/// takes the first (best-match) candidate.
fn select_candidate<'c>(
    candidates: &'c [FileCandidate],
    project_id: &str,
    root_id: &str,
    request: &ModRequest,
) -> Option<&'c FileCandidate> {
    if project_id == root_id {
        if let Some(file_ref) = &request.file_ref {
            if let Some(exact) = candidates.iter().find(|c| &c.file_id == file_ref) {
                return Some(exact);
            }
        }
    }
    candidates.first()
}

fn to_resolved_mod(meta: &ProjectMetadata, file: &FileCandidate) -> ResolvedMod {
    ResolvedMod {
        project_id: meta.id.clone(),
        name: meta.title.clone(),
        icon_url: meta.icon_url.clone(),
        file_id: file.file_id.clone(),
        kind: meta.kind.clone(),
        file_url: file.url.clone(),
        file_name: file.file_name.clone(),
        file_sha1: file.sha1.clone(),
        file_size: file.size,
        enabled: true,
    }
}
