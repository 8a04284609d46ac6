//! `playground worker`

use playground_worker::{serve_stdio, ProcessRuntime};

use crate::args::WorkerArgs;
use crate::error::Result;

pub async fn run(args: WorkerArgs) -> Result<()> {
    let process = args.runtime.process_config();
    let config = args.runtime.worker_config()?;
    tracing::info!(python = %process.python.display(), "serving worker on stdio");
    let runtime = ProcessRuntime::new(process);
    serve_stdio(runtime, config, tokio::io::stdin(), tokio::io::stdout()).await?;
    Ok(())
}
