//! The settings file: a JSON object of option names to values, e.g.
//! `{"indent": "2", "formatCss": true}`.

use std::path::{Path, PathBuf};

use playground_protocol::Configuration;

use crate::error::{CliError, Result};

const APP_DIR: &str = "playground";
const SETTINGS_FILE: &str = "settings.json";

/// `<config dir>/playground/settings.json`, where the platform has one.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// Load settings from `path`, or from the default location when `None`.
///
/// A missing default file is an empty configuration. A missing file that
/// was asked for by name is an error.
pub fn load(path: Option<&Path>) -> Result<Configuration> {
    match path {
        Some(path) => read(path),
        None => match default_path() {
            Some(path) if path.is_file() => read(&path),
            _ => Ok(Configuration::new()),
        },
    }
}

fn read(path: &Path) -> Result<Configuration> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| CliError::Settings {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(config)
}
