//! Spawning a worker and talking to it.

use playground_protocol::{Request, Response, WorkerMessage};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::{Result, RuntimeError};
use crate::host::WorkerHost;
use crate::runtime::{EmbeddedRuntime, PackageLocator};
use crate::state::{WorkerId, WorkerState};

/// Configuration for a worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Packages installed during bootstrap, in order.
    pub packages: Vec<PackageLocator>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            packages: PackageLocator::defaults(),
        }
    }
}

/// Entry point for starting workers.
pub struct Worker;

impl Worker {
    /// Start a worker hosting `runtime` on a new task.
    ///
    /// Bootstrap begins immediately. Requests posted before it finishes are
    /// queued and served once the worker is ready. Responses, lifecycle
    /// messages included, arrive on the returned receiver.
    pub fn spawn<R: EmbeddedRuntime>(
        runtime: R,
        config: WorkerConfig,
    ) -> (WorkerHandle, mpsc::UnboundedReceiver<Response>) {
        let id = WorkerId::new();
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(WorkerState::Uninitialized);

        let host = WorkerHost::new(id, runtime, config.packages, state_tx, responses_tx);
        tracing::debug!(worker = %id, "spawning worker");
        let task = tokio::spawn(host.run(inbox_rx));

        let handle = WorkerHandle {
            id,
            inbox: inbox_tx,
            state: state_rx,
            task,
        };
        (handle, responses_rx)
    }
}

/// Handle to a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    /// The worker's unique identifier.
    pub id: WorkerId,
    inbox: mpsc::UnboundedSender<WorkerMessage>,
    state: watch::Receiver<WorkerState>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Queue a request. Never waits for the worker.
    pub fn post(&self, request: Request) -> Result<()> {
        self.inbox
            .send(WorkerMessage::Request(request))
            .map_err(|_| RuntimeError::ChannelClosed)
    }

    /// A cloneable sender into the worker's inbox.
    pub fn sender(&self) -> mpsc::UnboundedSender<WorkerMessage> {
        self.inbox.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Wait until bootstrap finishes. Fails if it failed.
    pub async fn ready(&self) -> Result<()> {
        let mut state = self.state.clone();
        let reached = state
            .wait_for(|s| s.is_serving() || *s == WorkerState::Failed)
            .await
            .map(|s| *s)
            .map_err(|_| RuntimeError::ChannelClosed)?;
        if reached == WorkerState::Failed {
            return Err(RuntimeError::NotReady(reached));
        }
        Ok(())
    }

    /// Ask the worker to stop after its current request and wait for it.
    pub async fn shutdown(self) {
        let _ = self.inbox.send(WorkerMessage::Shutdown);
        if let Err(err) = self.task.await {
            tracing::warn!(worker = %self.id, error = %err, "worker task ended abnormally");
        }
    }
}
