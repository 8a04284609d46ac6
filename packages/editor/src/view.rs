//! The page surface the controller drives.

use playground_protocol::{Configuration, OptionName, OptionValue};

/// Output side of the page: the status region, the version display, the
/// output editor and the settings panel's visibility.
pub trait EditorView {
    /// Append one bootstrap progress line to the status region.
    fn push_status(&mut self, line: &str);

    /// Replace the version display.
    fn set_version(&mut self, version: &str);

    /// Replace the whole content of the output editor.
    fn set_output(&mut self, text: &str);

    /// Hide the status region and reveal the settings panel.
    fn show_settings(&mut self);

    /// Called once when the worker reports that it will never become ready.
    fn worker_failed(&mut self, _reason: &str) {}
}

/// Input side of the settings panel.
pub trait SettingsPanel {
    /// Current value of the control with the given element id: text for
    /// inputs and selects, a boolean for checkboxes.
    fn value(&self, control_id: &str) -> Option<OptionValue>;
}

/// A fixed configuration reads like a panel whose controls never change.
impl SettingsPanel for Configuration {
    fn value(&self, control_id: &str) -> Option<OptionValue> {
        OptionName::ALL
            .into_iter()
            .find(|name| name.control_id() == control_id)
            .and_then(|name| self.get(name).cloned())
    }
}

/// Read every recognized option from its control.
pub fn read_configuration<P: SettingsPanel + ?Sized>(panel: &P) -> Configuration {
    OptionName::ALL
        .into_iter()
        .filter_map(|name| panel.value(&name.control_id()).map(|value| (name, value)))
        .collect()
}
