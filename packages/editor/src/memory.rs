//! In-memory page surface, for headless use and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use playground_protocol::{OptionName, OptionValue};

use crate::view::{EditorView, SettingsPanel};

/// Everything rendered into a [`MemoryView`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewLog {
    pub status: Vec<String>,
    pub status_visible: bool,
    pub settings_visible: bool,
    pub version: Option<String>,
    /// Current content of the output editor.
    pub output: String,
    /// Every value the output editor was set to, oldest first.
    pub renders: Vec<String>,
    pub failure: Option<String>,
}

/// A view that records what it is told to show.
///
/// Clones share the same log, so a test can keep one while the controller
/// owns another.
#[derive(Debug, Clone)]
pub struct MemoryView {
    log: Arc<Mutex<ViewLog>>,
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryView {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(ViewLog {
                status_visible: true,
                ..ViewLog::default()
            })),
        }
    }

    /// Snapshot of everything rendered so far.
    pub fn snapshot(&self) -> ViewLog {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EditorView for MemoryView {
    fn push_status(&mut self, line: &str) {
        self.lock().status.push(line.to_owned());
    }

    fn set_version(&mut self, version: &str) {
        self.lock().version = Some(version.to_owned());
    }

    fn set_output(&mut self, text: &str) {
        let mut log = self.lock();
        log.output = text.to_owned();
        log.renders.push(text.to_owned());
    }

    fn show_settings(&mut self) {
        let mut log = self.lock();
        log.status_visible = false;
        log.settings_visible = true;
    }

    fn worker_failed(&mut self, reason: &str) {
        self.lock().failure = Some(reason.to_owned());
    }
}

/// A settings panel backed by a shared map of control values.
#[derive(Debug, Clone, Default)]
pub struct MemoryPanel {
    controls: Arc<Mutex<HashMap<String, OptionValue>>>,
}

impl MemoryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the control belonging to `name`.
    pub fn set(&self, name: OptionName, value: impl Into<OptionValue>) {
        self.lock().insert(name.control_id(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(self, name: OptionName, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn clear(&self, name: OptionName) {
        self.lock().remove(&name.control_id());
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, OptionValue>> {
        self.controls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsPanel for MemoryPanel {
    fn value(&self, control_id: &str) -> Option<OptionValue> {
        self.lock().get(control_id).cloned()
    }
}
