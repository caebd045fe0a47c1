//! Translate expressions from the command line

use super::CliError;
use crate::{Translator, output};

/// How a translated document is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compact Extended JSON
    #[default]
    Json,
    /// Extended JSON with indentation
    PrettyJson,
    /// Shell-style rendering of the `bson::Document` handed to drivers
    Bson,
}

/// Options for the check and translate commands
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter expression
    pub expression: String,
    /// Output format of the document
    pub format: OutputFormat,
    /// Only validate syntax, don't compile
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression translated; the rendered document
    Success(String),
}

/// Validate or translate one expression
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.expression.trim().is_empty() {
        return Err(CliError::NoInput);
    }

    let translator = Translator::new();

    if options.syntax_only {
        let source = translator.prepare(&options.expression);
        crate::parse(&source)?;
        return Ok(CheckResult::SyntaxValid);
    }

    let doc = translator.translate(&options.expression)?;

    let rendered = match options.format {
        OutputFormat::Json => output::to_json(&doc),
        OutputFormat::PrettyJson => output::to_json_pretty(&doc),
        OutputFormat::Bson => format!("{}", output::to_bson(&doc)),
    };
    Ok(CheckResult::Success(rendered))
}
