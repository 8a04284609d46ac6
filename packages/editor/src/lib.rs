//! # playground-editor
//!
//! The foreground half of the formatting playground.
//!
//! The editor turns a stream of keystrokes and settings changes into a much
//! smaller stream of formatting requests, and turns the worker's answers
//! back into what the user sees:
//!
//! ```text
//! EditorEvent ──▶ EditorController ──▶ SessionManager ──▶ RequestSink ──▶ worker
//!                      ▲    │                ▲
//!                      │    ▼                │ accept(response)?
//!                      │  EditorView         │
//!                      └──────────── Response ◀──────────────────────── worker
//! ```
//!
//! ## Sessions
//!
//! Every dispatched request gets a fresh session id. Only a result whose id
//! equals the latest one is rendered; anything older is dropped on arrival.
//! The worker is never interrupted, so a superseded request still runs to
//! completion; its result is simply ignored.
//!
//! ## Debounce
//!
//! Edits restart a short timer and only the content present when it expires
//! is sent. Settings changes skip the timer and dispatch at once.

pub mod controller;
pub mod element;
pub mod error;
pub mod memory;
pub mod session;
pub mod sink;
pub mod view;

pub use controller::{EditorController, EditorEvent, Outcome};
pub use error::{EditorError, Result};
pub use memory::{MemoryPanel, MemoryView, ViewLog};
pub use session::{SessionConfig, SessionManager};
pub use sink::RequestSink;
pub use view::{read_configuration, EditorView, SettingsPanel};
