//! CLI support for mongoq
//!
//! Provides programmatic access to the mongoq CLI functionality for embedding
//! in other tools.

mod check;
mod docs;

pub use check::{CheckOptions, CheckResult, OutputFormat, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;
use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed expression
    #[error("Syntax error: {0}")]
    Syntax(crate::SyntaxError),

    /// Expression could not be compiled
    #[error("Compile error: {0}")]
    Compile(crate::CompileError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No expression provided
    #[error("No expression provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'mongoq docs' to see available categories.")]
    UnknownCategory(String),
}

impl From<crate::Error> for CliError {
    fn from(e: crate::Error) -> Self {
        match e {
            crate::Error::Syntax(e) => CliError::Syntax(e),
            crate::Error::Compile(e) => CliError::Compile(e),
        }
    }
}

impl From<crate::SyntaxError> for CliError {
    fn from(e: crate::SyntaxError) -> Self {
        CliError::Syntax(e)
    }
}
