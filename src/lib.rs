//! Compile compact filter expressions into MongoDB query documents.
//!
//! ```
//! use mongoq::{translate, output::to_json};
//!
//! let doc = translate("age > 10 && name == (\"Alice\" | \"Bob\")").unwrap();
//! assert_eq!(
//!     to_json(&doc),
//!     r#"{"age":{"$gt":10},"name":{"$in":["Alice","Bob"]}}"#
//! );
//! ```
pub mod ast;
pub mod builtins;
pub mod compiler;
pub mod convert;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod translate;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Argument, BinOp, Builtin, Expr, LiteralKind, Token, UnaryOp};
pub use compiler::{CompileError, Compiler, Context};
pub use convert::ConversionError;
pub use error::Error;
pub use lexer::{Lexer, Position, SyntaxError};
pub use output::{to_bson, to_json, to_json_pretty};
pub use parser::{Parser, parse};
pub use translate::{TranslateOptions, Translator, set_error_observer, translate};
pub use value::{Document, Pattern, QueryValue, Scalar};
