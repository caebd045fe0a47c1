//! # Filter Expression Language - Abstract Syntax Tree
//!
//! This module defines the tokens and the expression tree for the filter
//! expression language compiled by [`crate::compiler`].
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, names, calls, operations)
//! - **[operators]** - Binary and unary operators with their precedence tiers
//! - **[functions]** - The fixed table of built-in functions and their arity
//!
//! ## Quick Start
//!
//! ```text
//! age > 10 && (name == "Alice" || name == "Bob")
//! ```
//!
//! ## Precedence
//!
//! From tightest to loosest binding:
//!
//! ```text
//! primary      literal, identifier, a.b.c, f(x), ( ... )
//! unary        !
//! relational   ==  !=  <  <=  >  >=
//! membership   &   then   |
//! and          &&  and
//! or           ||  or
//! ```
//!
//! ## Examples
//!
//! ### Membership lists
//!
//! ```text
//! name == ("Alice" | "Bob")         one of
//! tags == ("red" & "blue")          all of
//! ```
//!
//! ### Existence checks
//!
//! ```text
//! name && !deleted
//! exists(profile.email)
//! ```
pub mod expressions;
pub mod functions;
pub mod operators;
pub mod tokens;

pub use expressions::{Argument, Expr, LiteralKind};
pub use functions::Builtin;
pub use operators::{BinOp, UnaryOp};
pub use tokens::Token;
