//! Progress reporting for reconcile sessions

use std::sync::Arc;

/// Phases of a reconcile session
///
/// `Idle -> Scanning -> Downloading -> ApplyingOverrides -> Completed`,
/// with `Error` reachable from any non-terminal phase. The overrides
/// phase is skipped when the manifest carries no overrides reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Scanning,
    Downloading,
    ApplyingOverrides,
    Completed,
    Error,
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncPhase::Idle => write!(f, "idle"),
            SyncPhase::Scanning => write!(f, "scanning"),
            SyncPhase::Downloading => write!(f, "downloading"),
            SyncPhase::ApplyingOverrides => write!(f, "applying overrides"),
            SyncPhase::Completed => write!(f, "completed"),
            SyncPhase::Error => write!(f, "error"),
        }
    }
}

/// Events emitted during a reconcile session
#[derive(Debug, Clone)]
pub enum SyncEvent {
    PhaseChanged {
        phase: SyncPhase,
    },
    /// A manifest entry already present locally; no network request is
    /// made for it
    FileSkipped {
        path: String,
        status: String,
    },
    FileDownloaded {
        path: String,
        size: u64,
        status: String,
    },
    OverridesApplied {
        files: usize,
    },
    Failed {
        message: String,
    },
}

/// Progress callback for reconcile sessions
pub type SyncCallback = Arc<dyn Fn(SyncEvent) + Send + Sync>;

/// Trait for progress reporting with more granular control
pub trait SyncReporter: Send + Sync {
    fn on_phase_changed(&self, _phase: SyncPhase) {}
    fn on_file_skipped(&self, _path: &str, _status: &str) {}
    fn on_file_downloaded(&self, _path: &str, _size: u64, _status: &str) {}
    fn on_overrides_applied(&self, _files: usize) {}
    fn on_failed(&self, _message: &str) {}
}

/// Extension trait to convert a [`SyncReporter`] into a [`SyncCallback`]
pub trait IntoSyncCallback {
    fn into_callback(self) -> SyncCallback;
}

impl<T: SyncReporter + 'static> IntoSyncCallback for T {
    fn into_callback(self) -> SyncCallback {
        Arc::new(move |event| match event {
            SyncEvent::PhaseChanged { phase } => self.on_phase_changed(phase),
            SyncEvent::FileSkipped { path, status } => self.on_file_skipped(&path, &status),
            SyncEvent::FileDownloaded { path, size, status } => {
                self.on_file_downloaded(&path, size, &status)
            }
            SyncEvent::OverridesApplied { files } => self.on_overrides_applied(files),
            SyncEvent::Failed { message } => self.on_failed(&message),
        })
    }
}

/// Console reporter used by the CLI
#[derive(Debug, Default)]
pub struct ConsoleSyncReporter;

impl SyncReporter for ConsoleSyncReporter {
    fn on_phase_changed(&self, phase: SyncPhase) {
        println!("==> {phase}");
    }

    fn on_file_skipped(&self, path: &str, status: &str) {
        println!("    {path}: {status}");
    }

    fn on_file_downloaded(&self, path: &str, size: u64, status: &str) {
        println!("    {path}: {status} ({size} bytes)");
    }

    fn on_overrides_applied(&self, files: usize) {
        println!("    applied {files} override files");
    }

    fn on_failed(&self, message: &str) {
        eprintln!("    sync failed: {message}");
    }
}

/// Null reporter that does nothing
#[derive(Debug, Default)]
pub struct NullSyncReporter;

impl SyncReporter for NullSyncReporter {}
