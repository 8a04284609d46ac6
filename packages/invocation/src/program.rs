//! Whole programs handed to the interpreter.

use crate::invocation::Invocation;

/// What the worker asks the interpreter to do.
///
/// Every call prints its result on the interpreter's standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Print the interpreter and formatter versions.
    ReportVersion,
    /// Reformat the invocation's input file and print the result.
    Reformat(Invocation),
}

/// Source text for one [`Call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    source: String,
}

const VERSION_SOURCE: &str = r#"import platform
from importlib import metadata

print(f"Running with Python {platform.python_version()}; djLint {metadata.version('djlint')}")
"#;

const REFORMAT_PRELUDE: &str = r#"from pathlib import Path

from djlint.reformat import reformat_file
from djlint.settings import Config

"#;

impl Program {
    pub fn render(call: &Call) -> Self {
        let source = match call {
            Call::ReportVersion => VERSION_SOURCE.to_string(),
            Call::Reformat(invocation) => {
                let mut source = String::from(REFORMAT_PRELUDE);
                source.push_str(&invocation.render());
                let path = invocation.path_literal().render();
                source.push_str(&format!(
                    "output = next(iter(reformat_file({var}, Path({path}))))\n\
                     result = Path(output).read_text(encoding=\"utf-8\")\n\
                     print(result.rstrip())\n",
                    var = Invocation::CONFIG_VAR,
                ));
                source
            }
        };
        Self { source }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn into_source(self) -> String {
        self.source
    }
}
