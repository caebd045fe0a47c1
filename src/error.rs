use crate::{compiler::CompileError, lexer::SyntaxError};
use thiserror::Error;

/// Why a translation failed. No partial document accompanies either kind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The text is not a well-formed expression.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The expression is well formed but cannot be expressed as a query.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl Error {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }
}
