//! A scripted [`EmbeddedRuntime`] for tests.
//!
//! [`ScriptedRuntime`] boots instantly (or fails at a chosen step) and
//! formats with a tiny tag indenter that understands just enough markup to
//! exercise the worker. Everything it does is recorded in a shared
//! [`Probe`] that tests keep after moving the runtime into a worker.
//!
//! Documents can steer it:
//!
//! * `<!-- delay:N -->` anywhere makes the call take `N` milliseconds.
//! * `{% raise %}` anywhere makes the call fail after printing a partial line.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use playground_invocation::{Call, Invocation, Literal};

use crate::error::{Result, RuntimeError};
use crate::runtime::{EmbeddedRuntime, OutputBuffer, PackageLocator};

/// Bootstrap steps, for failure injection and the probe log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Instantiate,
    LoadPackageManager,
    ImportPackageManager,
    Install,
}

/// What the runtime observed.
#[derive(Debug, Default)]
pub struct ProbeLog {
    pub steps: Vec<Step>,
    pub installed: Vec<PackageLocator>,
    pub invocations: Vec<Invocation>,
    /// Output printed while no redirect was installed.
    pub leaked: String,
    pub redirected: bool,
}

/// Shared view of a [`ScriptedRuntime`]'s log.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    inner: Arc<Mutex<ProbeLog>>,
}

impl Probe {
    pub fn with<T>(&self, f: impl FnOnce(&ProbeLog) -> T) -> T {
        f(&self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn update(&self, f: impl FnOnce(&mut ProbeLog)) {
        f(&mut self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Input paths of every reformat call so far.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.with(|log| {
            log.invocations
                .iter()
                .map(|inv| inv.path().to_path_buf())
                .collect()
        })
    }
}

/// Test runtime with scripted behavior.
#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    probe: Probe,
    fail_at: Option<Step>,
    bootstrap_delay: Duration,
    stdout: Option<OutputBuffer>,
}

/// The version line the scripted runtime reports.
pub const SCRIPTED_VERSION: &str = "Running with Python 3.12.1; djLint 1.36.4";

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail bootstrap at `step`.
    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Make the install step take `delay`.
    pub fn with_bootstrap_delay(mut self, delay: Duration) -> Self {
        self.bootstrap_delay = delay;
        self
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }

    fn step(&self, step: Step) -> Result<()> {
        self.probe.update(|log| log.steps.push(step));
        if self.fail_at == Some(step) {
            return Err(RuntimeError::Execution(format!(
                "{step:?} failed: no route to package index"
            )));
        }
        Ok(())
    }

    fn print(&self, text: &str) {
        match &self.stdout {
            Some(sink) => {
                sink.write(text);
                sink.write("\n");
            }
            None => self.probe.update(|log| {
                log.leaked.push_str(text);
                log.leaked.push('\n');
            }),
        }
    }

    async fn reformat(&self, invocation: &Invocation) -> Result<()> {
        let source = std::fs::read_to_string(invocation.path())
            .map_err(|e| RuntimeError::Execution(format!("FileNotFoundError: {e}")))?;

        if let Some(ms) = delay_marker(&source) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if source.contains("{% raise %}") {
            self.print("partial output");
            return Err(RuntimeError::Execution(
                "TemplateSyntaxError: unexpected 'raise'".to_string(),
            ));
        }

        let width = match invocation.argument("indent") {
            Some(Literal::Int(n)) if *n > 0 => *n as usize,
            Some(Literal::Int(_)) | None => 4,
            Some(other) => {
                return Err(RuntimeError::Execution(format!(
                    "ValueError: invalid literal for int() with base 10: {other}"
                )))
            }
        };
        let formatted = indent_markup(&source, width);
        std::fs::write(invocation.path(), &formatted)
            .map_err(|e| RuntimeError::Execution(format!("OSError: {e}")))?;
        self.print(formatted.trim_end());
        Ok(())
    }
}

#[async_trait]
impl EmbeddedRuntime for ScriptedRuntime {
    async fn instantiate(&mut self) -> Result<()> {
        self.step(Step::Instantiate)
    }

    async fn load_package_manager(&mut self) -> Result<()> {
        self.step(Step::LoadPackageManager)
    }

    async fn import_package_manager(&mut self) -> Result<()> {
        self.step(Step::ImportPackageManager)
    }

    async fn install(&mut self, packages: &[PackageLocator]) -> Result<()> {
        if !self.bootstrap_delay.is_zero() {
            tokio::time::sleep(self.bootstrap_delay).await;
        }
        self.step(Step::Install)?;
        self.probe
            .update(|log| log.installed.extend(packages.iter().cloned()));
        Ok(())
    }

    fn redirect_stdout(&mut self, sink: Option<OutputBuffer>) {
        let redirected = sink.is_some();
        self.stdout = sink;
        self.probe.update(|log| log.redirected = redirected);
    }

    async fn run(&mut self, call: &Call) -> Result<()> {
        match call {
            Call::ReportVersion => {
                self.print(SCRIPTED_VERSION);
                Ok(())
            }
            Call::Reformat(invocation) => {
                self.probe
                    .update(|log| log.invocations.push(invocation.clone()));
                self.reformat(invocation).await
            }
        }
    }
}

fn delay_marker(source: &str) -> Option<u64> {
    let start = source.find("<!-- delay:")? + "<!-- delay:".len();
    let rest = &source[start..];
    let end = rest.find(" -->")?;
    rest[..end].trim().parse().ok()
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Open(&'a str, &'a str),
    Close(&'a str, &'a str),
    Standalone(&'a str),
    Text(&'a str),
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = source;
    while !rest.is_empty() {
        if rest.starts_with('<') {
            let end = rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
            let tag = &rest[..end];
            let name = tag
                .trim_start_matches(['<', '/'])
                .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .next()
                .unwrap_or("");
            let token = if tag.starts_with("</") {
                Token::Close(name, tag)
            } else if tag.starts_with("<!") || tag.ends_with("/>") || is_void(name) {
                Token::Standalone(tag)
            } else {
                Token::Open(name, tag)
            };
            tokens.push(token);
            rest = &rest[end..];
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            let text = rest[..end].trim();
            if !text.is_empty() {
                tokens.push(Token::Text(text));
            }
            rest = &rest[end..];
        }
    }
    tokens
}

fn is_void(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "br" | "hr" | "img" | "input" | "meta" | "link"
    )
}

/// Put every block on its own line, indented `width` spaces per level.
/// An element holding only text stays on one line.
fn indent_markup(source: &str, width: usize) -> String {
    let tokens = tokenize(source);
    let mut out = String::new();
    let mut depth = 0usize;
    let mut i = 0;
    let line = |depth: usize, text: &str, out: &mut String| {
        out.push_str(&" ".repeat(depth * width));
        out.push_str(text);
        out.push('\n');
    };
    while i < tokens.len() {
        match (&tokens[i], tokens.get(i + 1), tokens.get(i + 2)) {
            (Token::Open(name, open), Some(Token::Text(text)), Some(Token::Close(close_name, close)))
                if name == close_name =>
            {
                line(depth, &format!("{open}{text}{close}"), &mut out);
                i += 3;
            }
            (Token::Open(name, open), Some(Token::Close(close_name, close)), _)
                if name == close_name =>
            {
                line(depth, &format!("{open}{close}"), &mut out);
                i += 2;
            }
            (Token::Open(_, open), _, _) => {
                line(depth, *open, &mut out);
                depth += 1;
                i += 1;
            }
            (Token::Close(_, close), _, _) => {
                depth = depth.saturating_sub(1);
                line(depth, *close, &mut out);
                i += 1;
            }
            (Token::Standalone(tag), _, _) => {
                line(depth, *tag, &mut out);
                i += 1;
            }
            (Token::Text(text), _, _) => {
                line(depth, *text, &mut out);
                i += 1;
            }
        }
    }
    out
}
