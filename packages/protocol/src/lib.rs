//! # playground-protocol
//!
//! Messages exchanged between the playground editor (the foreground) and the
//! formatting worker (the background).
//!
//! The two sides share no memory. Everything they know about each other
//! travels in one of two directions:
//!
//! ```text
//!  editor ── Request { id, html, config } ──────────────▶ worker
//!  editor ◀──────── Response::{Status, Version} ───────── worker  (lifecycle)
//!  editor ◀──────── Response::{Html, Error} { id } ────── worker  (results)
//! ```
//!
//! Lifecycle responses describe the worker's bootstrap and are never compared
//! against a session. Result responses carry the [`SessionId`] of the request
//! that produced them, and the editor renders one only if that id is still the
//! latest it dispatched.
//!
//! On a byte stream every message is one line of JSON (see [`codec`]).

pub mod codec;
pub mod error;
pub mod message;
pub mod options;
pub mod session;

pub use codec::{decode_request, decode_response, encode_request, encode_response};
pub use error::{ProtocolError, Result};
pub use message::{Request, Response, WorkerMessage};
pub use options::{Configuration, OptionKind, OptionName, OptionValue};
pub use session::{SessionClock, SessionId, SessionToken};
