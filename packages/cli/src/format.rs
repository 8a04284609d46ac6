//! `playground format`: one document through a worker and back.

use std::path::Path;

use playground_editor::{EditorController, EditorView, Outcome, SessionConfig, SessionManager};
use playground_protocol::{Configuration, Response};
use playground_worker::{EmbeddedRuntime, ProcessRuntime, Worker, WorkerConfig};
use tokio::io::AsyncReadExt;

use crate::args::FormatArgs;
use crate::error::{CliError, Result};
use crate::settings;
use crate::terminal::TerminalView;

pub async fn run(args: FormatArgs) -> Result<String> {
    let document = read_document(args.file.as_deref()).await?;
    let mut configuration = settings::load(args.settings.as_deref())?;
    configuration.merge(&args.options.configuration());

    let runtime = ProcessRuntime::new(args.runtime.process_config());
    let worker = args.runtime.worker_config()?;
    format_document(runtime, worker, document, configuration, TerminalView::stderr()).await
}

/// Start a worker, wait for it to become ready and format `document` once.
///
/// Progress goes to `view`. The formatted text is returned; a formatter
/// error or a failed bootstrap is an error.
pub async fn format_document<R, V>(
    runtime: R,
    worker: WorkerConfig,
    document: String,
    configuration: Configuration,
    view: V,
) -> Result<String>
where
    R: EmbeddedRuntime,
    V: EditorView,
{
    let (handle, mut responses) = Worker::spawn(runtime, worker);
    let sessions = SessionManager::new(handle.sender(), SessionConfig::default(), document);
    let mut controller = EditorController::new(sessions, view, configuration);

    let result = loop {
        let Some(response) = responses.recv().await else {
            break Err(CliError::WorkerGone);
        };
        match controller.on_response(response) {
            Ok(Outcome::Rendered(Response::Html { message, .. })) => break Ok(message),
            Ok(Outcome::Rendered(response)) => {
                break Err(CliError::Formatter(response.message().to_owned()))
            }
            Ok(Outcome::Failed(reason)) => break Err(CliError::WorkerFailed(reason)),
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }
    };

    handle.shutdown().await;
    result
}

async fn read_document(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            }),
        None => {
            let mut document = String::new();
            tokio::io::stdin().read_to_string(&mut document).await?;
            Ok(document)
        }
    }
}
