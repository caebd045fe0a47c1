//! Built-in function library.
//!
//! | Call                      | Result                                   |
//! |---------------------------|------------------------------------------|
//! | `exists(path)`            | `{ path: { "$exists": true } }`          |
//! | `nexists(path)`           | `{ path: { "$exists": false } }`         |
//! | `contains(text)`          | pattern `.*text.*`                       |
//! | `regex(pattern)`          | pattern, `\\` collapsed to `\`           |
//! | `date(text[, layout])`    | timestamp                                |
//! | `dateRelative(duration)`  | now + duration                           |
//! | `search(term, ...)`       | `{ "$text": { "$search": "term ..." } }` |

use crate::{
    ast::{Argument, Builtin},
    compiler::CompileError,
    convert,
    value::{Document, Pattern, QueryValue},
};
use chrono::{DateTime, Utc};

/// Evaluate a call to one of the built-in functions.
pub fn call(
    function: &str,
    args: &[Argument],
    now: DateTime<Utc>,
) -> Result<QueryValue, CompileError> {
    let builtin = Builtin::from_name(function)
        .ok_or_else(|| CompileError::UnknownFunction(function.to_string()))?;

    if args.len() < builtin.min_arity() {
        return Err(CompileError::Arity {
            function: builtin,
            expected: builtin.min_arity(),
            found: args.len(),
        });
    }

    match builtin {
        Builtin::Exists => Ok(exists(&argument_text(&args[0]), true)),
        Builtin::NotExists => Ok(exists(&argument_text(&args[0]), false)),
        Builtin::Contains => {
            let text = argument_text(&args[0]);
            Ok(Pattern::case_insensitive(format!(".*{}.*", text)).into())
        }
        Builtin::Regex => {
            let pattern = args[0].raw_text().replace("\\\\", "\\");
            Ok(Pattern::case_insensitive(pattern).into())
        }
        Builtin::Date => {
            let text = argument_text(&args[0]);
            let layout = args.get(1).map(argument_text);
            convert::parse_date(&text, layout.as_deref())
                .map(QueryValue::from)
                .map_err(|source| CompileError::InvalidArgument {
                    function: builtin,
                    source,
                })
        }
        Builtin::DateRelative => {
            let duration = argument_text(&args[0]);
            convert::relative_date(now, &duration)
                .map(QueryValue::from)
                .map_err(|source| CompileError::InvalidArgument {
                    function: builtin,
                    source,
                })
        }
        Builtin::Search => {
            let terms: Vec<String> = args.iter().map(argument_text).collect();
            Ok(Document::with("$text", Document::with("$search", terms.join(" "))).into())
        }
    }
}

fn exists(path: &str, present: bool) -> QueryValue {
    Document::with(path, Document::with("$exists", present)).into()
}

/// Plain text of an argument, string escapes resolved.
fn argument_text(arg: &Argument) -> String {
    match arg {
        Argument::String(raw) => convert::unescape(raw),
        other => other.raw_text(),
    }
}
