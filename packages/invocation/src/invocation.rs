//! Typed formatter invocation.

use std::path::{Path, PathBuf};

use playground_protocol::{Configuration, OptionName};

use crate::literal::Literal;

/// Where an option lands in the formatter's call convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A keyword argument of the `Config(...)` constructor.
    Keyword(&'static str),
    /// An attribute assigned on the constructed config object.
    Attribute(&'static str),
}

impl Slot {
    pub const fn of(name: OptionName) -> Self {
        match name {
            OptionName::Profile => Self::Keyword("profile"),
            OptionName::Indent => Self::Keyword("indent"),
            OptionName::PreserveLeadingSpace => Self::Keyword("preserve_leading_space"),
            OptionName::PreserveBlankSpace => Self::Keyword("preserve_blank_lines"),
            OptionName::FormatJs => Self::Keyword("format_js"),
            OptionName::FormatCss => Self::Keyword("format_css"),
            OptionName::CustomBlocks => Self::Attribute("custom_blocks"),
            OptionName::CustomHtml => Self::Attribute("custom_html"),
            OptionName::MaxLineLength => Self::Attribute("max_line_length"),
            OptionName::MaxAttributeLength => Self::Attribute("max_attribute_length"),
            OptionName::FormatAttributeTemplateTags => {
                Self::Attribute("format_attribute_template_tags")
            }
            OptionName::BlankLineAfterTag => Self::Attribute("blank_line_after_tag"),
            OptionName::BlankLineBeforeTag => Self::Attribute("blank_line_before_tag"),
            OptionName::CloseVoidTags => Self::Attribute("close_void_tags"),
            OptionName::IgnoreCase => Self::Attribute("ignore_case"),
            OptionName::LineBreakAfterMultilineTag => {
                Self::Attribute("line_break_after_multiline_tag")
            }
            OptionName::NoLineAfterYaml => Self::Attribute("no_line_after_yaml"),
            OptionName::NoSetFormatting => Self::Attribute("no_set_formatting"),
            OptionName::NoFunctionFormatting => Self::Attribute("no_function_formatting"),
        }
    }
}

/// One named argument or assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: &'static str,
    pub value: Literal,
}

/// A fully typed call of the formatter against one input file.
///
/// Built by [`Invocation::build`]; nothing here is source text until
/// [`render`](Self::render) is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    path: PathBuf,
    keywords: Vec<Argument>,
    assignments: Vec<Argument>,
}

impl Invocation {
    /// Name of the config object in rendered source.
    pub const CONFIG_VAR: &'static str = "config";

    /// Map `config` onto the call convention for the file at `path`.
    ///
    /// Each option present in `config` produces exactly one argument, in
    /// catalogue order. Absent options produce nothing.
    pub fn build(path: impl Into<PathBuf>, config: &Configuration) -> Self {
        let mut keywords = Vec::new();
        let mut assignments = Vec::new();
        for (name, value) in config.iter() {
            if !value.is_truthy() {
                continue;
            }
            let value = Literal::for_option(name.kind(), value);
            match Slot::of(name) {
                Slot::Keyword(name) => keywords.push(Argument { name, value }),
                Slot::Attribute(name) => assignments.push(Argument { name, value }),
            }
        }
        Self {
            path: path.into(),
            keywords,
            assignments,
        }
    }

    /// The input file, always the first positional argument.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keywords(&self) -> &[Argument] {
        &self.keywords
    }

    pub fn assignments(&self) -> &[Argument] {
        &self.assignments
    }

    /// Look up an argument by its runtime-side name, in either slot.
    pub fn argument(&self, name: &str) -> Option<&Literal> {
        self.keywords
            .iter()
            .chain(&self.assignments)
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }

    /// The input path as a literal.
    pub fn path_literal(&self) -> Literal {
        Literal::Str(self.path.to_string_lossy().into_owned())
    }

    /// Render the construction statement and the attribute assignments.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(Self::CONFIG_VAR);
        out.push_str(" = Config(");
        self.path_literal().render_into(&mut out);
        for arg in &self.keywords {
            out.push_str(", ");
            out.push_str(arg.name);
            out.push('=');
            arg.value.render_into(&mut out);
        }
        out.push_str(")\n");
        for arg in &self.assignments {
            out.push_str(Self::CONFIG_VAR);
            out.push('.');
            out.push_str(arg.name);
            out.push_str(" = ");
            arg.value.render_into(&mut out);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_protocol::OptionValue;

    fn full_config() -> Configuration {
        OptionName::ALL
            .into_iter()
            .map(|name| {
                let value = match name.kind() {
                    playground_protocol::OptionKind::Text => OptionValue::from("x"),
                    playground_protocol::OptionKind::Integer => OptionValue::from("80"),
                    playground_protocol::OptionKind::Flag => OptionValue::Bool(true),
                };
                (name, value)
            })
            .collect()
    }

    #[test]
    fn empty_configuration_renders_bare_constructor() {
        let invocation = Invocation::build("/tmp/in.html", &Configuration::new());
        assert_eq!(invocation.render(), "config = Config(\"/tmp/in.html\")\n");
    }

    #[test]
    fn indent_becomes_a_keyword() {
        let config = Configuration::new().with(OptionName::Indent, "4");
        let invocation = Invocation::build("/tmp/in.html", &config);
        assert_eq!(
            invocation.render(),
            "config = Config(\"/tmp/in.html\", indent=4)\n"
        );
    }

    #[test]
    fn every_option_is_emitted_exactly_once() {
        let invocation = Invocation::build("/tmp/in.html", &full_config());
        assert_eq!(
            invocation.keywords().len() + invocation.assignments().len(),
            OptionName::ALL.len()
        );
        let rendered = invocation.render();
        for name in OptionName::ALL {
            let needle = match Slot::of(name) {
                Slot::Keyword(kw) => format!("{kw}="),
                Slot::Attribute(attr) => format!("config.{attr} ="),
            };
            assert_eq!(rendered.matches(&needle).count(), 1, "{needle}");
        }
    }

    #[test]
    fn path_precedes_keywords() {
        let config = Configuration::new()
            .with(OptionName::FormatCss, true)
            .with(OptionName::Profile, "nunjucks");
        let rendered = Invocation::build("/tmp/in.html", &config).render();
        assert_eq!(
            rendered,
            "config = Config(\"/tmp/in.html\", profile=\"nunjucks\", format_css=True)\n"
        );
    }

    #[test]
    fn assignments_follow_construction() {
        let config = Configuration::new()
            .with(OptionName::MaxLineLength, 120_i64)
            .with(OptionName::CloseVoidTags, true)
            .with(OptionName::CustomBlocks, "toc,example");
        let rendered = Invocation::build("/tmp/in.html", &config).render();
        assert_eq!(
            rendered,
            "config = Config(\"/tmp/in.html\")\n\
             config.custom_blocks = \"toc,example\"\n\
             config.max_line_length = 120\n\
             config.close_void_tags = True\n"
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = full_config();
        let a = Invocation::build("/tmp/in.html", &config).render();
        let b = Invocation::build("/tmp/in.html", &config).render();
        assert_eq!(a, b);
    }

    #[test]
    fn hostile_values_stay_inside_string_literals() {
        let config = Configuration::new().with(OptionName::Profile, "\")\nimport os\n#");
        let invocation = Invocation::build("/tmp/in.html", &config);
        let rendered = invocation.render();
        assert_eq!(rendered.lines().count(), 1);
        assert_eq!(
            invocation.argument("profile"),
            Some(&Literal::Str("\")\nimport os\n#".into()))
        );
    }

    #[test]
    fn misused_integer_options_pass_through_quoted() {
        let config = Configuration::new().with(OptionName::Indent, "four");
        let invocation = Invocation::build("/tmp/in.html", &config);
        assert_eq!(
            invocation.argument("indent"),
            Some(&Literal::Str("four".into()))
        );
    }
}
