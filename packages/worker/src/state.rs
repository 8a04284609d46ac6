//! Worker identity and lifecycle state.

use uuid::Uuid;

/// Unique identifier for a worker, used to tell workers apart in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(Uuid);

impl WorkerId {
    /// Create a new random WorkerId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of the worker's runtime.
///
/// ```text
/// Uninitialized ─▶ LoadingRuntime ─▶ InstallingDependencies ─▶ Ready ⇄ Formatting
///                        │                     │
///                        └─────────────────────┴──▶ Failed
/// ```
///
/// `Failed` is terminal: bootstrap is attempted exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Nothing has been loaded yet.
    Uninitialized,
    /// The interpreter and its package manager are loading.
    LoadingRuntime,
    /// The formatter and its dependencies are being installed.
    InstallingDependencies,
    /// Idle and accepting requests.
    Ready,
    /// Handling exactly one request.
    Formatting,
    /// Bootstrap failed; no request will ever be serviced.
    Failed,
}

impl WorkerState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::LoadingRuntime => "loading_runtime",
            Self::InstallingDependencies => "installing_dependencies",
            Self::Ready => "ready",
            Self::Formatting => "formatting",
            Self::Failed => "failed",
        }
    }

    /// True once bootstrap has finished successfully.
    pub const fn is_serving(self) -> bool {
        matches!(self, Self::Ready | Self::Formatting)
    }

    /// Whether moving from `self` to `next` is a legal step.
    pub const fn can_transition_to(self, next: WorkerState) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (Uninitialized, LoadingRuntime)
                | (LoadingRuntime, InstallingDependencies)
                | (InstallingDependencies, Ready)
                | (Ready, Formatting)
                | (Formatting, Ready)
                | (Uninitialized | LoadingRuntime | InstallingDependencies, Failed)
        )
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
