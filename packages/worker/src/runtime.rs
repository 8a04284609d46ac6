//! The seam between the worker and the interpreter it hosts.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use playground_invocation::Call;
use url::Url;

use crate::error::{Result, RuntimeError};

/// An interpreter the worker can bootstrap and call into.
///
/// The worker drives an implementation through a fixed sequence:
/// [`instantiate`](Self::instantiate), [`load_package_manager`](Self::load_package_manager),
/// [`import_package_manager`](Self::import_package_manager), [`install`](Self::install),
/// and then any number of [`run`](Self::run) calls, one at a time.
///
/// A call prints its result on the interpreter's standard output. While a
/// sink is installed with [`redirect_stdout`](Self::redirect_stdout),
/// everything the interpreter prints must go to that sink and nowhere else.
#[async_trait]
pub trait EmbeddedRuntime: Send + 'static {
    /// Create the interpreter instance.
    async fn instantiate(&mut self) -> Result<()>;

    /// Make the interpreter's package manager available.
    async fn load_package_manager(&mut self) -> Result<()>;

    /// Import the package manager into the interpreter.
    async fn import_package_manager(&mut self) -> Result<()>;

    /// Install the given packages. May take a long time.
    async fn install(&mut self, packages: &[PackageLocator]) -> Result<()>;

    /// Route standard output into `sink`, or back to the default when `None`.
    fn redirect_stdout(&mut self, sink: Option<OutputBuffer>);

    /// Execute one call. Errors carry the interpreter's exception description.
    async fn run(&mut self, call: &Call) -> Result<()>;
}

/// In-memory standard output.
///
/// Cloning shares the same buffer: the worker keeps one clone and hands the
/// other to the runtime.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    inner: Arc<Mutex<String>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text.
    pub fn write(&self, text: &str) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> String {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take everything written so far, leaving the buffer empty.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Where a package comes from: a registry name or a direct URL to a wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageLocator {
    Named(String),
    Url(Url),
}

/// Formatter dependencies with no prebuilt package for every platform;
/// they are served as wheels next to the playground.
const BUNDLED_WHEELS: [&str; 3] = [
    "cssbeautifier-99-py3-none-any.whl",
    "EditorConfig-99-py3-none-any.whl",
    "jsbeautifier-99-py3-none-any.whl",
];

/// The formatter package itself.
pub const FORMATTER_PACKAGE: &str = "djlint";

impl PackageLocator {
    /// The default install set: just the formatter from the package index.
    pub fn defaults() -> Vec<PackageLocator> {
        vec![Self::Named(FORMATTER_PACKAGE.to_string())]
    }

    /// The install set used when wheels are served from `origin`: the
    /// bundled wheels under `<origin>/static/py/`, then the formatter.
    pub fn with_bundled_wheels(origin: &Url) -> Result<Vec<PackageLocator>> {
        let base = origin
            .join("static/py/")
            .map_err(|e| RuntimeError::InvalidLocator(e.to_string()))?;
        let mut packages = BUNDLED_WHEELS
            .iter()
            .map(|wheel| {
                base.join(wheel)
                    .map(Self::Url)
                    .map_err(|e| RuntimeError::InvalidLocator(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        packages.push(Self::Named(FORMATTER_PACKAGE.to_string()));
        Ok(packages)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Url(url) => url.as_str(),
        }
    }
}

impl FromStr for PackageLocator {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.contains(char::is_whitespace) {
            return Err(RuntimeError::InvalidLocator(s.to_string()));
        }
        if s.contains("://") {
            return Url::parse(s)
                .map(Self::Url)
                .map_err(|e| RuntimeError::InvalidLocator(format!("{s}: {e}")));
        }
        Ok(Self::Named(s.to_string()))
    }
}

impl std::fmt::Display for PackageLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
