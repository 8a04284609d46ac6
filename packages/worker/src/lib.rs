//! # playground-worker
//!
//! The background half of the formatting playground.
//!
//! A worker owns one embedded interpreter. It boots that interpreter once,
//! announcing each step, and then formats documents one request at a time:
//!
//! ```text
//!             ┌──────────────────────── Worker task ───────────────────────┐
//! Request ──▶ │ inbox ─▶ WorkerHost ─▶ temp .html ─▶ EmbeddedRuntime::run  │
//!             │             │                          │ (stdout redirected)│
//! Response ◀─ │ ◀───────────┴──── html / error ◀───────┘                    │
//!             └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! Bootstrap runs before the inbox is read, so requests sent early simply
//! wait in the queue. Each step posts a `status` line; then a `version`
//! line; then `ready`. A bootstrap failure is final: the worker posts
//! `failed: <reason>` and drops every later request.
//!
//! ## Requests
//!
//! Only one request is ever in flight. A request that makes the formatter
//! fail produces an `error` response and the worker carries on; its
//! temporary file is removed and its output capture released either way.
//! Nothing is cancelled mid-flight: the editor decides which results are
//! stale.
//!
//! ## Runtimes
//!
//! [`EmbeddedRuntime`] is the seam. [`ProcessRuntime`] drives an external
//! Python interpreter; tests use the scripted runtime in `testing`.

pub mod error;
pub mod host;
pub mod process;
pub mod runtime;
pub mod state;
pub mod stdio;
pub mod worker;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{Result, RuntimeError};
pub use host::WorkerHost;
pub use process::{ProcessConfig, ProcessRuntime, PYTHON_ENV};
pub use runtime::{EmbeddedRuntime, OutputBuffer, PackageLocator};
pub use state::{WorkerId, WorkerState};
pub use stdio::serve_stdio;
pub use worker::{Worker, WorkerConfig, WorkerHandle};
