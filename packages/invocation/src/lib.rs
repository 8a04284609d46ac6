//! # playground-invocation
//!
//! Builds the call the worker makes into the embedded interpreter.
//!
//! A [`Configuration`](playground_protocol::Configuration) never becomes
//! source text directly. It is first mapped onto a typed [`Invocation`]:
//! the positional input path, then keyword arguments for the formatter's
//! constructor, then attribute assignments for everything the constructor
//! does not take. Text is produced only at the very end, by
//! [`Invocation::render`] and [`Program::render`], where every value goes
//! through [`Literal`] and is quoted with the interpreter's own syntax.
//!
//! The document being formatted is never part of the rendered text. The
//! worker writes it to a temporary file and only that file's path, quoted,
//! reaches the interpreter.
//!
//! ```text
//! Configuration ──build──▶ Invocation ──render──▶ config = Config("/tmp/…", indent=4)
//!                                                  config.max_line_length = 120
//! ```

pub mod invocation;
pub mod literal;
pub mod program;

pub use invocation::{Argument, Invocation, Slot};
pub use literal::Literal;
pub use program::{Call, Program};
