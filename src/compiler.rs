//! Translation of expression trees into query documents.
//!
//! Compilation is a post-order walk. Each node is compiled with a [`Context`]
//! describing what encloses it, and the same syntax can produce different
//! output depending on that context:
//!
//! ```text
//! name                  { name: { $exists: true } }
//! name == x             { name: "x" }
//! x == ("A" | "B")      { x: { $in: ["A", "B"] } }
//! x != ("A" | "B")      { x: { $nin: ["A", "B"] } }
//! ```

use crate::{
    ast::{Argument, BinOp, Builtin, Expr, LiteralKind, UnaryOp},
    builtins,
    convert::{self, ConversionError},
    value::{Document, Pattern, QueryValue, Scalar},
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// What directly encloses the node being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Top of the tree.
    Root,
    /// Operand of `!`.
    Negation,
    /// Operand of a binary operator.
    Operator(BinOp),
    /// Inside parentheses; records the operator the group is an operand of.
    Group(Option<BinOp>),
}

impl Context {
    /// The binary operator this node belongs to, looking through parentheses.
    pub fn enclosing_operator(self) -> Option<BinOp> {
        match self {
            Context::Operator(op) => Some(op),
            Context::Group(op) => op,
            Context::Root | Context::Negation => None,
        }
    }

    fn enter_group(self) -> Context {
        Context::Group(self.enclosing_operator())
    }

    /// A quoted string here is read as "this field exists".
    fn string_means_exists(self) -> bool {
        matches!(self, Context::Root | Context::Operator(BinOp::And))
    }

    /// A bare name here is read as "this field exists".
    fn name_means_exists(self) -> bool {
        match self {
            Context::Root => true,
            Context::Operator(op) => op.is_logical(),
            Context::Negation | Context::Group(_) => false,
        }
    }
}

/// Well-formed expression with invalid semantics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("unsupported use of '{operator}': {detail}")]
    UnsupportedUse { operator: BinOp, detail: &'static str },

    #[error("invalid left operand for operator '{operator}': expected a field name, found {found}")]
    InvalidLeftOperand { operator: BinOp, found: &'static str },

    #[error("invalid right operand for operator '{operator}': expected a number or timestamp, found {found}")]
    InvalidRightOperand { operator: BinOp, found: &'static str },

    #[error("unsupported function: {0}")]
    UnknownFunction(String),

    #[error("{function}() expected {expected} arguments, got {found}")]
    Arity {
        function: Builtin,
        expected: usize,
        found: usize,
    },

    #[error("{function}(): {source}")]
    InvalidArgument {
        function: Builtin,
        #[source]
        source: ConversionError,
    },

    #[error(transparent)]
    InvalidLiteral(#[from] ConversionError),

    #[error("expression does not produce a query document, found {found}")]
    NotADocument { found: &'static str },
}

impl CompileError {
    /// The operator or function the error concerns, when there is one.
    pub fn subject(&self) -> Option<String> {
        match self {
            CompileError::UnsupportedUse { operator, .. }
            | CompileError::InvalidLeftOperand { operator, .. }
            | CompileError::InvalidRightOperand { operator, .. } => Some(operator.to_string()),
            CompileError::UnknownFunction(name) => Some(name.clone()),
            CompileError::Arity { function, .. } | CompileError::InvalidArgument { function, .. } => {
                Some(function.to_string())
            }
            CompileError::InvalidLiteral(_) | CompileError::NotADocument { .. } => None,
        }
    }
}

/// Compiles expression trees. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    /// Reference instant for `dateRelative`; the current time when unset.
    now: Option<DateTime<Utc>>,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler { now: None }
    }

    /// Compiler whose `dateRelative()` is computed from a fixed instant.
    pub fn with_clock(now: DateTime<Utc>) -> Self {
        Compiler { now: Some(now) }
    }

    /// Compile a whole expression. The result must be a query document.
    pub fn compile(&self, expr: &Expr) -> Result<Document, CompileError> {
        match self.compile_node(expr, Context::Root)? {
            QueryValue::Document(doc) => Ok(doc),
            other => Err(CompileError::NotADocument {
                found: other.type_name(),
            }),
        }
    }

    /// Compile one node given what encloses it.
    pub fn compile_node(&self, expr: &Expr, context: Context) -> Result<QueryValue, CompileError> {
        match expr {
            Expr::Binary { op, left, right } => self.compile_binary(*op, left, right, context),
            Expr::Unary { op, operand } => self.compile_unary(*op, operand),
            Expr::Literal { kind, raw } => compile_literal(*kind, raw, context),
            Expr::Identifier(name) => Ok(compile_identifier(name, context)),
            Expr::Selector(segments) => Ok(compile_selector(segments, context)),
            Expr::Call { function, args } => self.compile_call(function, args),
            Expr::Paren(inner) => self.compile_node(inner, context.enter_group()),
        }
    }

    fn compile_unary(&self, op: UnaryOp, operand: &Expr) -> Result<QueryValue, CompileError> {
        match op {
            UnaryOp::Not => match self.compile_node(operand, Context::Negation)? {
                QueryValue::Scalar(Scalar::String(name)) => Ok(exists(name, false)),
                value => Ok(Document::with("$not", value).into()),
            },
        }
    }

    fn compile_call(&self, function: &str, args: &[Argument]) -> Result<QueryValue, CompileError> {
        builtins::call(function, args, self.now.unwrap_or_else(Utc::now))
    }

    fn compile_binary(
        &self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        context: Context,
    ) -> Result<QueryValue, CompileError> {
        let left = self.compile_node(left, Context::Operator(op))?;
        let right = self.compile_node(right, Context::Operator(op))?;

        match op {
            BinOp::Equal => Ok(Document::with(field_key(op, left)?, right).into()),
            BinOp::NotEqual => {
                let key = field_key(op, left)?;
                Ok(Document::with(key, not_equal(right)).into())
            }
            BinOp::LessThan => ordering(op, "$lt", left, right),
            BinOp::GreaterThan => ordering(op, "$gt", left, right),
            BinOp::LessEqual => ordering(op, "$lte", left, right),
            BinOp::GreaterEqual => ordering(op, "$gte", left, right),
            BinOp::And => merge_and(left, right),
            BinOp::Or => {
                let operands = flatten(left, right);
                if context == Context::Operator(BinOp::Or) {
                    Ok(QueryValue::List(operands))
                } else {
                    Ok(Document::with("$or", operands).into())
                }
            }
            BinOp::AnyOf => {
                let items = flatten(left, right);
                if context == Context::Operator(BinOp::AnyOf) {
                    return Ok(QueryValue::List(items));
                }
                let operator = match context.enclosing_operator() {
                    Some(BinOp::NotEqual) => "$nin",
                    _ => "$in",
                };
                Ok(Document::with(operator, items).into())
            }
            BinOp::AllOf => {
                let items = flatten(left, right);
                if context == Context::Operator(BinOp::AllOf) {
                    return Ok(QueryValue::List(items));
                }
                match context.enclosing_operator() {
                    Some(BinOp::Equal) => Ok(Document::with("$all", items).into()),
                    _ => Err(CompileError::UnsupportedUse {
                        operator: op,
                        detail: "an all-of list is only valid as the right side of '=='",
                    }),
                }
            }
        }
    }
}

fn compile_literal(kind: LiteralKind, raw: &str, context: Context) -> Result<QueryValue, CompileError> {
    match kind {
        LiteralKind::Integer => Ok(convert::to_integer(raw)?.into()),
        LiteralKind::Float => Ok(convert::to_float(raw)?.into()),
        LiteralKind::String => {
            let text = convert::unescape(raw);
            if context.string_means_exists() {
                return Ok(exists(text, true));
            }
            if let Ok(oid) = convert::to_object_id(&text) {
                return Ok(oid.into());
            }
            if let Some(pattern) = slash_delimited(&text) {
                return Ok(Pattern::case_insensitive(pattern).into());
            }
            if text.contains('*') {
                return Ok(Pattern::case_insensitive(text.replace('*', ".*")).into());
            }
            Ok(text.into())
        }
    }
}

fn compile_identifier(name: &str, context: Context) -> QueryValue {
    if name.eq_ignore_ascii_case("true") {
        return true.into();
    }
    if name.eq_ignore_ascii_case("false") {
        return false.into();
    }
    if context.name_means_exists() {
        return exists(name.to_string(), true);
    }
    match convert::to_object_id(name) {
        Ok(oid) => oid.into(),
        Err(_) => name.into(),
    }
}

fn compile_selector(segments: &[String], context: Context) -> QueryValue {
    let path = segments.join(".");
    if context.name_means_exists() {
        exists(path, true)
    } else {
        path.into()
    }
}

fn exists(path: String, present: bool) -> QueryValue {
    Document::with(path, Document::with("$exists", present)).into()
}

/// `/text/` without the slashes.
fn slash_delimited(text: &str) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }
    text.strip_prefix('/')?.strip_suffix('/')
}

/// `{ key: { operator: right } }` for `<`, `>`, `<=` and `>=`.
fn ordering(
    op: BinOp,
    operator: &'static str,
    left: QueryValue,
    right: QueryValue,
) -> Result<QueryValue, CompileError> {
    if !right.is_orderable() {
        return Err(CompileError::InvalidRightOperand {
            operator: op,
            found: right.type_name(),
        });
    }
    let key = field_key(op, left)?;
    Ok(Document::with(key, Document::with(operator, right)).into())
}

/// Right side of `!=`: a one-of list becomes `$nin`, anything else `$ne`.
fn not_equal(right: QueryValue) -> QueryValue {
    match right {
        QueryValue::Document(mut doc) if doc.single("$in").is_some() => match doc.remove("$in") {
            Some(items) => Document::with("$nin", items).into(),
            None => Document::with("$ne", doc).into(),
        },
        QueryValue::Document(doc) if doc.single("$nin").is_some() => doc.into(),
        other => Document::with("$ne", other).into(),
    }
}

/// Key of a comparison: the left operand reduced to text.
fn field_key(op: BinOp, left: QueryValue) -> Result<String, CompileError> {
    match left {
        QueryValue::Scalar(Scalar::String(key)) => Ok(key),
        QueryValue::Scalar(Scalar::Integer(n)) => Ok(n.to_string()),
        QueryValue::Scalar(Scalar::Float(n)) => Ok(n.to_string()),
        QueryValue::Scalar(Scalar::Boolean(b)) => Ok(b.to_string()),
        QueryValue::Scalar(Scalar::ObjectId(oid)) => Ok(oid.to_hex()),
        other => Err(CompileError::InvalidLeftOperand {
            operator: op,
            found: other.type_name(),
        }),
    }
}

/// Union of two documents, or `$and` when a key would be overwritten.
fn merge_and(left: QueryValue, right: QueryValue) -> Result<QueryValue, CompileError> {
    match (left, right) {
        (QueryValue::Document(mut left), QueryValue::Document(right)) => {
            if left.is_disjoint(&right) {
                left.extend(right);
                Ok(left.into())
            } else {
                tracing::trace!(
                    keys = ?right.keys().collect::<Vec<_>>(),
                    "conjunction repeats a key, falling back to $and"
                );
                let operands = vec![QueryValue::from(left), QueryValue::from(right)];
                Ok(Document::with("$and", operands).into())
            }
        }
        _ => Err(CompileError::UnsupportedUse {
            operator: BinOp::And,
            detail: "both sides must be query documents",
        }),
    }
}

/// Concatenate operands, splicing in lists from nested chains.
fn flatten(left: QueryValue, right: QueryValue) -> Vec<QueryValue> {
    let mut items = match left {
        QueryValue::List(items) => items,
        other => vec![other],
    };
    match right {
        QueryValue::List(more) => items.extend(more),
        other => items.push(other),
    }
    items
}
