//! Request and response messages.

use serde::{Deserialize, Serialize};

use crate::options::Configuration;
use crate::session::{SessionId, SessionToken};

/// A formatting request, sent editor → worker.
///
/// Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Session this request was dispatched under.
    pub id: SessionId,
    /// The document to format.
    pub html: String,
    #[serde(default)]
    pub config: Configuration,
}

impl Request {
    /// Create a request for the session `token` was issued for.
    pub fn new(token: SessionToken, html: impl Into<String>, config: Configuration) -> Self {
        Self {
            id: token.id(),
            html: html.into(),
            config,
        }
    }
}

/// A message from the worker, sent worker → editor.
///
/// `Status` and `Version` report on the worker's bootstrap and carry no
/// session. `Html` and `Error` are results and carry the id of the request
/// that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Response {
    /// A bootstrap progress line. The final one reads `ready`.
    Status { message: String },
    /// Human readable runtime and formatter versions.
    Version { message: String },
    /// Formatted output for request `id`.
    Html { id: SessionId, message: String },
    /// Request `id` failed; `message` describes why.
    Error { id: SessionId, message: String },
}

impl Response {
    /// The status message announcing that the worker accepts requests.
    pub const READY: &'static str = "ready";

    /// Prefix of the status message announcing that bootstrap failed.
    pub const FAILED_PREFIX: &'static str = "failed: ";

    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }

    pub fn version(message: impl Into<String>) -> Self {
        Self::Version {
            message: message.into(),
        }
    }

    pub fn html(id: SessionId, message: impl Into<String>) -> Self {
        Self::Html {
            id,
            message: message.into(),
        }
    }

    pub fn error(id: SessionId, message: impl Into<String>) -> Self {
        Self::Error {
            id,
            message: message.into(),
        }
    }

    /// True for `Status` and `Version`.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Version { .. })
    }

    /// True for the `ready` status.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Status { message } if message == Self::READY)
    }

    /// The reason carried by a `failed: …` status, if this is one.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Status { message } => message.strip_prefix(Self::FAILED_PREFIX),
            _ => None,
        }
    }

    /// The session a result belongs to; `None` for lifecycle messages.
    pub fn session(&self) -> Option<SessionId> {
        match self {
            Self::Html { id, .. } | Self::Error { id, .. } => Some(*id),
            Self::Status { .. } | Self::Version { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Status { message }
            | Self::Version { message }
            | Self::Html { message, .. }
            | Self::Error { message, .. } => message,
        }
    }
}

/// Envelope for everything the editor can send the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Format a document.
    Request(Request),
    /// Stop after the current request.
    Shutdown,
}

impl From<Request> for WorkerMessage {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}
