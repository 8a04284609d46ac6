//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use playground_protocol::{Configuration, OptionName, OptionValue};
use playground_worker::{PackageLocator, ProcessConfig, WorkerConfig};
use url::Url;

use crate::error::Result;

/// Format Django and Jinja templates with djLint through a background worker
#[derive(Parser, Debug)]
#[command(name = "playground")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Format a template and print the result
    Format(FormatArgs),
    /// Serve the worker protocol as JSON lines on stdin/stdout
    Worker(WorkerArgs),
}

/// How to start the interpreter and what to install into it.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct RuntimeArgs {
    /// Python interpreter to run (defaults to $PLAYGROUND_PYTHON, then python3)
    #[arg(long, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Install the bundled wheels served under this site before djLint
    #[arg(long, value_name = "URL")]
    pub wheels: Option<Url>,

    /// Extra package name or wheel URL installed after djLint (repeatable)
    #[arg(long = "package", value_name = "PACKAGE")]
    pub packages: Vec<PackageLocator>,

    /// Extra argument passed to `pip install` (repeatable)
    #[arg(long = "pip-arg", value_name = "ARG")]
    pub pip_args: Vec<String>,

    /// Directory the interpreter runs in
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,
}

impl RuntimeArgs {
    pub fn process_config(&self) -> ProcessConfig {
        let mut config = ProcessConfig::from_env();
        if let Some(python) = &self.python {
            config.python = python.clone();
        }
        config.install_args.extend(self.pip_args.iter().cloned());
        if let Some(dir) = &self.workdir {
            config.working_dir = Some(dir.clone());
        }
        config
    }

    pub fn worker_config(&self) -> Result<WorkerConfig> {
        let mut packages = match &self.wheels {
            Some(origin) => PackageLocator::with_bundled_wheels(origin)?,
            None => PackageLocator::defaults(),
        };
        packages.extend(self.packages.iter().cloned());
        Ok(WorkerConfig { packages })
    }
}

#[derive(clap::Args, Debug)]
pub struct FormatArgs {
    /// Template to format; read from stdin when omitted
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Settings file (JSON object of option names to values)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptionArgs,

    #[command(flatten)]
    pub runtime: RuntimeArgs,
}

#[derive(clap::Args, Debug)]
pub struct WorkerArgs {
    #[command(flatten)]
    pub runtime: RuntimeArgs,
}

/// One flag per formatter option. Unset flags leave the settings file alone.
#[derive(clap::Args, Debug, Default, Clone)]
#[command(next_help_heading = "Formatter options")]
pub struct OptionArgs {
    /// Template language profile (html, django, jinja, nunjucks, handlebars, ...)
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,
    /// Indentation width
    #[arg(long, value_name = "N")]
    pub indent: Option<String>,
    #[arg(long)]
    pub preserve_leading_space: bool,
    #[arg(long)]
    pub preserve_blank_space: bool,
    #[arg(long)]
    pub format_js: bool,
    #[arg(long)]
    pub format_css: bool,
    /// Comma separated list of custom template blocks
    #[arg(long, value_name = "LIST")]
    pub custom_blocks: Option<String>,
    /// Comma separated list of custom HTML tags
    #[arg(long, value_name = "LIST")]
    pub custom_html: Option<String>,
    #[arg(long, value_name = "N")]
    pub max_line_length: Option<String>,
    #[arg(long, value_name = "N")]
    pub max_attribute_length: Option<String>,
    #[arg(long)]
    pub format_attribute_template_tags: bool,
    /// Comma separated list of tags followed by a blank line
    #[arg(long, value_name = "LIST")]
    pub blank_line_after_tag: Option<String>,
    /// Comma separated list of tags preceded by a blank line
    #[arg(long, value_name = "LIST")]
    pub blank_line_before_tag: Option<String>,
    #[arg(long)]
    pub close_void_tags: bool,
    #[arg(long)]
    pub ignore_case: bool,
    #[arg(long)]
    pub line_break_after_multiline_tag: bool,
    #[arg(long)]
    pub no_line_after_yaml: bool,
    #[arg(long)]
    pub no_set_formatting: bool,
    #[arg(long)]
    pub no_function_formatting: bool,
}

impl OptionArgs {
    /// The flag belonging to `name`, if it was given.
    pub fn value(&self, name: OptionName) -> Option<OptionValue> {
        let text = |value: &Option<String>| value.clone().map(OptionValue::from);
        let flag = |set: bool| set.then_some(OptionValue::Bool(true));
        match name {
            OptionName::Profile => text(&self.profile),
            OptionName::Indent => text(&self.indent),
            OptionName::PreserveLeadingSpace => flag(self.preserve_leading_space),
            OptionName::PreserveBlankSpace => flag(self.preserve_blank_space),
            OptionName::FormatJs => flag(self.format_js),
            OptionName::FormatCss => flag(self.format_css),
            OptionName::CustomBlocks => text(&self.custom_blocks),
            OptionName::CustomHtml => text(&self.custom_html),
            OptionName::MaxLineLength => text(&self.max_line_length),
            OptionName::MaxAttributeLength => text(&self.max_attribute_length),
            OptionName::FormatAttributeTemplateTags => flag(self.format_attribute_template_tags),
            OptionName::BlankLineAfterTag => text(&self.blank_line_after_tag),
            OptionName::BlankLineBeforeTag => text(&self.blank_line_before_tag),
            OptionName::CloseVoidTags => flag(self.close_void_tags),
            OptionName::IgnoreCase => flag(self.ignore_case),
            OptionName::LineBreakAfterMultilineTag => flag(self.line_break_after_multiline_tag),
            OptionName::NoLineAfterYaml => flag(self.no_line_after_yaml),
            OptionName::NoSetFormatting => flag(self.no_set_formatting),
            OptionName::NoFunctionFormatting => flag(self.no_function_formatting),
        }
    }

    pub fn configuration(&self) -> Configuration {
        OptionName::ALL
            .into_iter()
            .filter_map(|name| self.value(name).map(|value| (name, value)))
            .collect()
    }
}
