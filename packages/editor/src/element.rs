//! Fixed identifiers of the page elements the controller reads and writes.
//!
//! Settings controls are named after their option, see
//! [`OptionName::control_id`](playground_protocol::OptionName::control_id).

/// The editable document.
pub const INPUT: &str = "djlint-input";
/// The read-only formatted output.
pub const OUTPUT: &str = "djlint-output";
/// Bootstrap progress lines.
pub const STATUS: &str = "djlint-status";
/// Runtime and formatter versions.
pub const VERSION: &str = "djlint-version";
/// The settings panel, hidden until the worker is ready.
pub const SETTINGS: &str = "djlint-settings";

/// The document shown before the user types anything.
pub const WELCOME_DOCUMENT: &str = "<div>\n    <p>Welcome to djLint online!</p>\n</div>";
