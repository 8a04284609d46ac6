//! An [`EmbeddedRuntime`] backed by an external Python interpreter.
//!
//! Every step runs the interpreter once. Programs are passed with `-c`,
//! so the interpreter sees exactly the source [`Program::render`] produced
//! and nothing read from the document being formatted.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use playground_invocation::{Call, Program};
use tokio::process::Command;

use crate::error::{Result, RuntimeError};
use crate::runtime::{EmbeddedRuntime, OutputBuffer, PackageLocator};

/// Environment variable naming the interpreter to run.
pub const PYTHON_ENV: &str = "PLAYGROUND_PYTHON";

const DEFAULT_PYTHON: &str = "python3";

/// Configuration for [`ProcessRuntime`].
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Interpreter executable.
    pub python: PathBuf,
    /// Extra arguments for `pip install`, e.g. `--user`.
    pub install_args: Vec<String>,
    /// Working directory for the interpreter; inherited when `None`.
    pub working_dir: Option<PathBuf>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from(DEFAULT_PYTHON),
            install_args: Vec::new(),
            working_dir: None,
        }
    }
}

impl ProcessConfig {
    /// Defaults, with the interpreter taken from `PLAYGROUND_PYTHON` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(python) = std::env::var_os(PYTHON_ENV).filter(|v| !v.is_empty()) {
            config.python = PathBuf::from(python);
        }
        config
    }
}

/// Runs each call in a fresh interpreter process.
pub struct ProcessRuntime {
    config: ProcessConfig,
    stdout: Option<OutputBuffer>,
}

impl ProcessRuntime {
    pub fn new(config: ProcessConfig) -> Self {
        Self {
            config,
            stdout: None,
        }
    }

    async fn exec<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.config.python);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }
        command.output().await.map_err(|source| RuntimeError::Spawn {
            program: self.config.python.display().to_string(),
            source,
        })
    }

    /// Send captured stdout to the redirect sink, or to the log when none
    /// is installed.
    fn forward_stdout(&self, output: &Output) {
        let text = String::from_utf8_lossy(&output.stdout);
        match &self.stdout {
            Some(sink) => sink.write(&text),
            None => {
                for line in text.lines() {
                    tracing::debug!(target: "playground_worker::python", "{line}");
                }
            }
        }
    }
}

#[async_trait]
impl EmbeddedRuntime for ProcessRuntime {
    async fn instantiate(&mut self) -> Result<()> {
        let output = self.exec(["--version"]).await?;
        if !output.status.success() {
            return Err(RuntimeError::Execution(failure_description(&output)));
        }
        // Old interpreters print the banner on stderr.
        let banner = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr)
        } else {
            String::from_utf8_lossy(&output.stdout)
        };
        tracing::debug!(
            python = %self.config.python.display(),
            banner = %banner.trim(),
            "interpreter found"
        );
        Ok(())
    }

    async fn load_package_manager(&mut self) -> Result<()> {
        let probe = self.exec(["-m", "pip", "--version"]).await?;
        if probe.status.success() {
            return Ok(());
        }
        tracing::info!("pip missing, bootstrapping it with ensurepip");
        let output = self.exec(["-m", "ensurepip", "--upgrade"]).await?;
        if !output.status.success() {
            return Err(RuntimeError::Execution(failure_description(&output)));
        }
        Ok(())
    }

    async fn import_package_manager(&mut self) -> Result<()> {
        let output = self.exec(["-c", "import pip"]).await?;
        if !output.status.success() {
            return Err(RuntimeError::Execution(failure_description(&output)));
        }
        Ok(())
    }

    async fn install(&mut self, packages: &[PackageLocator]) -> Result<()> {
        let mut args: Vec<String> = vec![
            "-m".into(),
            "pip".into(),
            "install".into(),
            "--disable-pip-version-check".into(),
            "--quiet".into(),
        ];
        args.extend(self.config.install_args.iter().cloned());
        args.extend(packages.iter().map(ToString::to_string));
        tracing::info!(count = packages.len(), "installing packages");

        let output = self.exec(&args).await?;
        self.forward_stdout(&output);
        if !output.status.success() {
            return Err(RuntimeError::Install(failure_description(&output)));
        }
        Ok(())
    }

    fn redirect_stdout(&mut self, sink: Option<OutputBuffer>) {
        self.stdout = sink;
    }

    async fn run(&mut self, call: &Call) -> Result<()> {
        let program = Program::render(call);
        let output = self.exec([OsStr::new("-c"), OsStr::new(program.source())]).await?;
        self.forward_stdout(&output);
        if !output.status.success() {
            return Err(RuntimeError::Execution(failure_description(&output)));
        }
        Ok(())
    }
}

/// The last non-empty stderr line (for a traceback, the exception itself),
/// falling back to the exit status.
fn failure_description(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("interpreter exited with {}", output.status))
}
