//! # playground-cli
//!
//! Command line front end for the formatting playground.
//!
//! ## Usage
//!
//! ```bash
//! # Format a template with the options set in the settings file
//! playground format page.html
//!
//! # Override options for one run
//! cat page.html | playground format --indent 2 --format-css
//!
//! # Serve the worker protocol as JSON lines on stdin/stdout
//! playground worker
//! ```
//!
//! The interpreter defaults to `python3`; set `PLAYGROUND_PYTHON` or pass
//! `--python` to use another one.

pub mod args;
pub mod error;
pub mod format;
pub mod settings;
pub mod terminal;
pub mod worker;

pub use args::{Args, Command, FormatArgs, OptionArgs, RuntimeArgs, WorkerArgs};
pub use error::{CliError, Result};
pub use terminal::TerminalView;
