//! The worker runtime host: bootstrap and per-request execution.

use std::io::Write;

use playground_invocation::{Call, Invocation};
use playground_protocol::{Request, Response, WorkerMessage};
use tempfile::TempPath;
use tokio::sync::{mpsc, watch};

use crate::error::Result;
use crate::runtime::{EmbeddedRuntime, OutputBuffer, PackageLocator};
use crate::state::{WorkerId, WorkerState};

/// Bootstrap progress lines, in the order they are posted.
pub const STATUS_LOADING_RUNTIME: &str = "Loading runtime";
pub const STATUS_LOADING_PACKAGE_MANAGER: &str = "Loading package manager";
pub const STATUS_IMPORTING_PACKAGE_MANAGER: &str = "Importing package manager";
pub const STATUS_INSTALLING: &str = "Installing djLint";

/// Owns the single interpreter instance of one worker.
///
/// The host is driven by one task: it bootstraps the runtime, then handles
/// requests one at a time in arrival order. Nothing else touches the
/// runtime or its captured output, so there is no locking around either.
pub struct WorkerHost<R> {
    id: WorkerId,
    runtime: R,
    packages: Vec<PackageLocator>,
    state: watch::Sender<WorkerState>,
    responses: mpsc::UnboundedSender<Response>,
}

impl<R: EmbeddedRuntime> WorkerHost<R> {
    pub fn new(
        id: WorkerId,
        runtime: R,
        packages: Vec<PackageLocator>,
        state: watch::Sender<WorkerState>,
        responses: mpsc::UnboundedSender<Response>,
    ) -> Self {
        Self {
            id,
            runtime,
            packages,
            state,
            responses,
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Run the worker to completion: bootstrap, then serve `inbox` until it
    /// closes or a shutdown arrives.
    pub async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<WorkerMessage>) {
        if let Err(err) = self.bootstrap().await {
            tracing::error!(worker = %self.id, error = %err, "bootstrap failed");
            self.transition(WorkerState::Failed);
            self.post(Response::status(format!("{}{err}", Response::FAILED_PREFIX)));
            while let Some(message) = inbox.recv().await {
                match message {
                    WorkerMessage::Request(request) => {
                        tracing::warn!(
                            worker = %self.id,
                            session = %request.id,
                            "dropping request, runtime failed to load"
                        );
                    }
                    WorkerMessage::Shutdown => break,
                }
            }
            return;
        }

        while let Some(message) = inbox.recv().await {
            match message {
                WorkerMessage::Request(request) => {
                    let response = self.handle(request).await;
                    self.post(response);
                }
                WorkerMessage::Shutdown => {
                    tracing::debug!(worker = %self.id, "shutdown requested");
                    break;
                }
            }
        }
    }

    /// Load the runtime and install the formatter.
    ///
    /// Posts one status line before each step, then the version, then
    /// `ready`. Nothing is retried.
    pub async fn bootstrap(&mut self) -> Result<()> {
        self.transition(WorkerState::LoadingRuntime);
        self.post(Response::status(STATUS_LOADING_RUNTIME));
        self.runtime.instantiate().await?;

        self.post(Response::status(STATUS_LOADING_PACKAGE_MANAGER));
        self.runtime.load_package_manager().await?;

        self.post(Response::status(STATUS_IMPORTING_PACKAGE_MANAGER));
        self.runtime.import_package_manager().await?;

        self.transition(WorkerState::InstallingDependencies);
        self.post(Response::status(STATUS_INSTALLING));
        self.runtime.install(&self.packages).await?;

        let version = self.run_captured(&Call::ReportVersion).await?;
        tracing::info!(worker = %self.id, %version, "runtime ready");
        self.post(Response::version(version));

        self.transition(WorkerState::Ready);
        self.post(Response::status(Response::READY));
        Ok(())
    }

    /// Format one request. Failures become an `error` response; the host
    /// is back in `Ready` either way.
    pub async fn handle(&mut self, request: Request) -> Response {
        let id = request.id;
        self.transition(WorkerState::Formatting);
        let outcome = self.format(&request).await;
        self.transition(WorkerState::Ready);

        match outcome {
            Ok(html) => {
                tracing::debug!(worker = %self.id, session = %id, bytes = html.len(), "formatted");
                Response::html(id, html)
            }
            Err(err) => {
                tracing::debug!(worker = %self.id, session = %id, error = %err, "format failed");
                Response::error(id, err.to_string())
            }
        }
    }

    /// Write the input file, then capture stdout around the call, then
    /// restore stdout, then remove the file. Capture starts after the write
    /// so that the restore always pairs with a redirect that happened.
    async fn format(&mut self, request: &Request) -> Result<String> {
        // Removed from disk when dropped, whichever way this returns.
        let artifact = materialize(&request.html)?;
        let call = Call::Reformat(Invocation::build(artifact.to_path_buf(), &request.config));
        self.run_captured(&call).await
    }

    async fn run_captured(&mut self, call: &Call) -> Result<String> {
        let buffer = OutputBuffer::new();
        self.runtime.redirect_stdout(Some(buffer.clone()));
        let result = self.runtime.run(call).await;
        self.runtime.redirect_stdout(None);
        let stdout = buffer.take();
        result?;
        Ok(stdout.trim_end().to_string())
    }

    fn transition(&self, next: WorkerState) {
        let current = self.state();
        if !current.can_transition_to(next) {
            tracing::warn!(worker = %self.id, from = %current, to = %next, "unexpected state transition");
        }
        tracing::trace!(worker = %self.id, state = %next, "worker.state");
        self.state.send_replace(next);
    }

    fn post(&self, response: Response) {
        if self.responses.send(response).is_err() {
            tracing::trace!(worker = %self.id, "response receiver dropped");
        }
    }
}

/// Write `text` to a fresh temporary `.html` file and close it, keeping
/// only the path. The file is deleted when the returned path is dropped.
fn materialize(text: &str) -> Result<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("playground-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(file.into_temp_path())
}
