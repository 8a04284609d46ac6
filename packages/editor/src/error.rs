//! Error types for the editor controller.

use thiserror::Error;

/// Errors raised on the editor side of the bridge.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The worker no longer accepts requests.
    #[error("worker is gone")]
    WorkerGone,
}

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
