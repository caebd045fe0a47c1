use crate::ast::{BinOp, UnaryOp};

/// Abstract Syntax Tree node representing a parsed filter expression.
///
/// The tree is produced by the parser and only ever read by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Binary operation (comparison, membership, logical)
    ///
    /// # Examples
    /// ```text
    /// age > 10
    /// "A" | "B"
    /// a && b
    /// ```
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation
    ///
    /// # Example
    /// ```text
    /// !deleted
    /// ```
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Number or string literal, kept as written.
    ///
    /// String literals hold the text between the quotes, escapes included.
    Literal { kind: LiteralKind, raw: String },

    /// Bare, unquoted name
    ///
    /// # Example
    /// ```text
    /// name
    /// ```
    Identifier(String),

    /// Dotted field path, never empty
    ///
    /// # Example
    /// ```text
    /// person.address.city
    /// ```
    Selector(Vec<String>),

    /// Built-in function call
    ///
    /// # Examples
    /// ```text
    /// exists(name)
    /// date("20201201", "20060102")
    /// ```
    Call { function: String, args: Vec<Argument> },

    /// Parenthesized expression
    Paren(Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn string(raw: impl Into<String>) -> Self {
        Expr::Literal {
            kind: LiteralKind::String,
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
}

/// Call argument. Every shape reduces to plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Quoted string, raw text between the quotes
    String(String),
    Identifier(String),
    Selector(Vec<String>),
}

impl Argument {
    /// Source text of the argument with quotes stripped and escapes left as written.
    pub fn raw_text(&self) -> String {
        match self {
            Argument::String(raw) => raw.clone(),
            Argument::Identifier(name) => name.clone(),
            Argument::Selector(segments) => segments.join("."),
        }
    }
}
