//! Error types for the formatting worker.

use playground_protocol::ProtocolError;
use thiserror::Error;

use crate::state::WorkerState;

/// Errors that can occur while bootstrapping or driving the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The interpreter process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The interpreter raised while running a call. The message is the
    /// exception description.
    #[error("{0}")]
    Execution(String),

    /// Package installation failed.
    #[error("package installation failed: {0}")]
    Install(String),

    /// A package locator could not be parsed.
    #[error("invalid package locator: {0}")]
    InvalidLocator(String),

    /// The worker never became ready.
    #[error("worker did not become ready (state: {0})")]
    NotReady(WorkerState),

    /// The channel was closed unexpectedly.
    #[error("channel closed")]
    ChannelClosed,

    /// A message could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An I/O error occurred.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for worker operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
