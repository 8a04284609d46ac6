//! Where dispatched requests go.

use playground_protocol::{Request, WorkerMessage};
use tokio::sync::mpsc;

use crate::error::{EditorError, Result};

/// Anything that can carry a request to a worker without waiting.
pub trait RequestSink {
    fn send(&self, request: Request) -> Result<()>;
}

impl RequestSink for mpsc::UnboundedSender<WorkerMessage> {
    fn send(&self, request: Request) -> Result<()> {
        mpsc::UnboundedSender::send(self, WorkerMessage::Request(request))
            .map_err(|_| EditorError::WorkerGone)
    }
}

impl RequestSink for mpsc::UnboundedSender<Request> {
    fn send(&self, request: Request) -> Result<()> {
        mpsc::UnboundedSender::send(self, request).map_err(|_| EditorError::WorkerGone)
    }
}
