//! Error types for the playground protocol.

use thiserror::Error;

/// Errors raised while decoding or interpreting protocol messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A message was not valid JSON or did not match the expected shape.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// An option name is not part of the recognized set.
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
