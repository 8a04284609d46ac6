//! The recognized formatter options and the Configuration built from them.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// How an option's value is interpreted by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Free text, such as a profile name or a comma separated tag list.
    Text,
    /// A width or length.
    Integer,
    /// An on/off switch.
    Flag,
}

/// One of the fixed set of options the settings panel exposes.
///
/// Declaration order is the catalogue order: iteration over a
/// [`Configuration`] and serialization of its options both follow it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum OptionName {
    /// Template language dialect defaults.
    Profile,
    /// Indentation width.
    Indent,
    PreserveLeadingSpace,
    PreserveBlankSpace,
    FormatJs,
    FormatCss,
    /// Extra block tags to recognize.
    CustomBlocks,
    /// Extra html tags to recognize.
    CustomHtml,
    MaxLineLength,
    MaxAttributeLength,
    FormatAttributeTemplateTags,
    BlankLineAfterTag,
    BlankLineBeforeTag,
    CloseVoidTags,
    IgnoreCase,
    LineBreakAfterMultilineTag,
    NoLineAfterYaml,
    NoSetFormatting,
    NoFunctionFormatting,
}

impl OptionName {
    /// Every option, in catalogue order.
    pub const ALL: [OptionName; 19] = [
        OptionName::Profile,
        OptionName::Indent,
        OptionName::PreserveLeadingSpace,
        OptionName::PreserveBlankSpace,
        OptionName::FormatJs,
        OptionName::FormatCss,
        OptionName::CustomBlocks,
        OptionName::CustomHtml,
        OptionName::MaxLineLength,
        OptionName::MaxAttributeLength,
        OptionName::FormatAttributeTemplateTags,
        OptionName::BlankLineAfterTag,
        OptionName::BlankLineBeforeTag,
        OptionName::CloseVoidTags,
        OptionName::IgnoreCase,
        OptionName::LineBreakAfterMultilineTag,
        OptionName::NoLineAfterYaml,
        OptionName::NoSetFormatting,
        OptionName::NoFunctionFormatting,
    ];

    /// The camelCase name used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Indent => "indent",
            Self::PreserveLeadingSpace => "preserveLeadingSpace",
            Self::PreserveBlankSpace => "preserveBlankSpace",
            Self::FormatJs => "formatJs",
            Self::FormatCss => "formatCss",
            Self::CustomBlocks => "customBlocks",
            Self::CustomHtml => "customHtml",
            Self::MaxLineLength => "maxLineLength",
            Self::MaxAttributeLength => "maxAttributeLength",
            Self::FormatAttributeTemplateTags => "formatAttributeTemplateTags",
            Self::BlankLineAfterTag => "blankLineAfterTag",
            Self::BlankLineBeforeTag => "blankLineBeforeTag",
            Self::CloseVoidTags => "closeVoidTags",
            Self::IgnoreCase => "ignoreCase",
            Self::LineBreakAfterMultilineTag => "lineBreakAfterMultilineTag",
            Self::NoLineAfterYaml => "noLineAfterYaml",
            Self::NoSetFormatting => "noSetFormatting",
            Self::NoFunctionFormatting => "noFunctionFormatting",
        }
    }

    pub const fn kind(self) -> OptionKind {
        match self {
            Self::Profile
            | Self::CustomBlocks
            | Self::CustomHtml
            | Self::BlankLineAfterTag
            | Self::BlankLineBeforeTag => OptionKind::Text,
            Self::Indent | Self::MaxLineLength | Self::MaxAttributeLength => OptionKind::Integer,
            Self::PreserveLeadingSpace
            | Self::PreserveBlankSpace
            | Self::FormatJs
            | Self::FormatCss
            | Self::FormatAttributeTemplateTags
            | Self::CloseVoidTags
            | Self::IgnoreCase
            | Self::LineBreakAfterMultilineTag
            | Self::NoLineAfterYaml
            | Self::NoSetFormatting
            | Self::NoFunctionFormatting => OptionKind::Flag,
        }
    }

    /// Element id of the settings control bound to this option,
    /// e.g. `settings-max-line-length`.
    pub fn control_id(self) -> String {
        let name = self.as_str();
        let mut id = String::with_capacity(name.len() + 12);
        id.push_str("settings-");
        for c in name.chars() {
            if c.is_ascii_uppercase() {
                id.push('-');
                id.push(c.to_ascii_lowercase());
            } else {
                id.push(c);
            }
        }
        id
    }
}

impl std::fmt::Display for OptionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionName {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownOption(s.to_string()))
    }
}

/// The value of one option as read from its control.
///
/// Text inputs produce strings, checkboxes produce booleans, and JSON
/// settings files may also carry plain integers. Any other JSON number is
/// kept as written and left for the formatter to accept or reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Number(serde_json::Number),
    String(String),
}

impl OptionValue {
    /// Whether the value counts as "set". Empty strings, zero and `false`
    /// mean "use the formatter's default".
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
            Self::String(s) => !s.is_empty(),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// The formatter settings attached to a request.
///
/// Only truthy values are ever held: setting a falsy value removes the
/// option, so absence always means "runtime default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<OptionName, OptionValue>",
    into = "BTreeMap<OptionName, OptionValue>"
)]
pub struct Configuration {
    options: BTreeMap<OptionName, OptionValue>,
}

impl Configuration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option. Falsy values clear it instead.
    pub fn set(&mut self, name: OptionName, value: impl Into<OptionValue>) {
        let value = value.into();
        if value.is_truthy() {
            self.options.insert(name, value);
        } else {
            self.options.remove(&name);
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: OptionName, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: OptionName) -> Option<&OptionValue> {
        self.options.get(&name)
    }

    /// Options in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionName, &OptionValue)> {
        self.options.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Overlay `other` on top of this configuration.
    pub fn merge(&mut self, other: &Configuration) {
        for (name, value) in other.iter() {
            self.options.insert(name, value.clone());
        }
    }
}

impl From<BTreeMap<OptionName, OptionValue>> for Configuration {
    fn from(options: BTreeMap<OptionName, OptionValue>) -> Self {
        let mut config = Self::new();
        for (name, value) in options {
            config.set(name, value);
        }
        config
    }
}

impl From<Configuration> for BTreeMap<OptionName, OptionValue> {
    fn from(config: Configuration) -> Self {
        config.options
    }
}

impl FromIterator<(OptionName, OptionValue)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (OptionName, OptionValue)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (name, value) in iter {
            config.set(name, value);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::btree;

    #[test]
    fn control_ids_are_kebab_case() {
        assert_eq!(OptionName::Indent.control_id(), "settings-indent");
        assert_eq!(
            OptionName::MaxLineLength.control_id(),
            "settings-max-line-length"
        );
        assert_eq!(
            OptionName::FormatAttributeTemplateTags.control_id(),
            "settings-format-attribute-template-tags"
        );
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for name in OptionName::ALL {
            assert_eq!(name.as_str().parse::<OptionName>().unwrap(), name);
        }
        assert!(matches!(
            "tabWidth".parse::<OptionName>(),
            Err(ProtocolError::UnknownOption(_))
        ));
    }

    #[test]
    fn catalogue_matches_declaration_order() {
        let mut sorted = OptionName::ALL;
        sorted.sort();
        assert_eq!(sorted, OptionName::ALL);
    }

    #[test]
    fn serde_names_match_as_str() {
        for name in OptionName::ALL {
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, format!("\"{}\"", name.as_str()));
        }
    }

    #[test]
    fn truthiness() {
        assert!(!OptionValue::Bool(false).is_truthy());
        assert!(!OptionValue::Integer(0).is_truthy());
        assert!(!OptionValue::String(String::new()).is_truthy());
        assert!(OptionValue::String("false".into()).is_truthy());
        assert!(OptionValue::Integer(4).is_truthy());
    }

    #[test]
    fn falsy_values_clear_options() {
        let mut config = Configuration::new().with(OptionName::FormatJs, true);
        assert_eq!(config.len(), 1);
        config.set(OptionName::FormatJs, false);
        assert!(config.is_empty());
        config.set(OptionName::Indent, "");
        assert!(config.get(OptionName::Indent).is_none());
    }

    #[test]
    fn iteration_follows_catalogue_order() {
        let config = Configuration::new()
            .with(OptionName::NoSetFormatting, true)
            .with(OptionName::Indent, 2_i64)
            .with(OptionName::Profile, "jinja");
        let names: Vec<_> = config.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                OptionName::Profile,
                OptionName::Indent,
                OptionName::NoSetFormatting
            ]
        );
    }

    #[test]
    fn deserializes_mixed_values_and_drops_falsy() {
        let config: Configuration = serde_json::from_str(
            r#"{"indent":"4","formatCss":true,"formatJs":false,"maxLineLength":120,"profile":""}"#,
        )
        .unwrap();
        let expected: Configuration = btree! {
            OptionName::Indent => OptionValue::from("4"),
            OptionName::FormatCss => OptionValue::Bool(true),
            OptionName::MaxLineLength => OptionValue::Integer(120),
        }
        .into();
        assert_eq!(config, expected);
    }

    #[test]
    fn keeps_non_integer_numbers_as_written() {
        let config: Configuration =
            serde_json::from_str(r#"{"indent":4.5,"maxLineLength":0.0}"#).unwrap();
        let indent = config.get(OptionName::Indent).unwrap();
        assert!(matches!(indent, OptionValue::Number(_)));
        assert_eq!(indent.to_string(), "4.5");
        assert!(config.get(OptionName::MaxLineLength).is_none());
    }

    #[test]
    fn rejects_unknown_options() {
        let result: Result<Configuration, _> = serde_json::from_str(r#"{"tabWidth":2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn merge_overlays_values() {
        let mut base = Configuration::new()
            .with(OptionName::Indent, 2_i64)
            .with(OptionName::Profile, "django");
        base.merge(&Configuration::new().with(OptionName::Indent, 4_i64));
        assert_eq!(base.get(OptionName::Indent), Some(&OptionValue::Integer(4)));
        assert_eq!(
            base.get(OptionName::Profile),
            Some(&OptionValue::from("django"))
        );
    }
}
