//! Text in, query document out.

use crate::{
    compiler::Compiler,
    error::Error,
    lexer::RESERVED_WORDS,
    parser,
    value::Document,
};
use regex::Regex;
use std::sync::{LazyLock, OnceLock};

/// Callback receiving `(original_text, error)` for every failed translation.
pub type ErrorObserver = Box<dyn Fn(&str, &Error) + Send + Sync>;

static ERROR_OBSERVER: OnceLock<ErrorObserver> = OnceLock::new();

/// Register the process-wide error observer.
///
/// The observer can be set once; later calls hand the rejected observer back.
pub fn set_error_observer<F>(observer: F) -> Result<(), ErrorObserver>
where
    F: Fn(&str, &Error) + Send + Sync + 'static,
{
    ERROR_OBSERVER.set(Box::new(observer))
}

fn notify(original: &str, error: &Error) {
    if let Some(observer) = ERROR_OBSERVER.get() {
        observer(original, error);
    }
}

/// A string literal (possibly unterminated) or a name with optional dotted segments.
static WORDS_AND_STRINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:\\.|[^"\\])*"?|[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*"#)
        .expect("static pattern is valid")
});

/// Double-quote bare occurrences of `words`.
///
/// Only whole names are quoted: occurrences inside string literals or as a
/// segment of a dotted path are left alone.
pub fn quote_reserved_words(text: &str, words: &[String]) -> String {
    if words.is_empty() {
        return text.to_string();
    }

    WORDS_AND_STRINGS
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let found = &caps[0];
            if words.iter().any(|word| word == found) {
                format!("\"{}\"", found)
            } else {
                found.to_string()
            }
        })
        .into_owned()
}

/// Settings applied before parsing.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Words quoted by the pre-pass so they read as field names.
    pub reserved_words: Vec<String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            reserved_words: RESERVED_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Parses and compiles filter expressions.
///
/// # Examples
///
/// ```
/// use mongoq::Translator;
///
/// let translator = Translator::new();
/// let doc = translator.translate("type == \"sensor\" and active").unwrap();
///
/// assert_eq!(doc.get("type"), Some(&"sensor".into()));
/// assert!(doc.contains_key("active"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Translator {
    options: TranslateOptions,
    compiler: Compiler,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TranslateOptions) -> Self {
        Translator {
            options,
            compiler: Compiler::new(),
        }
    }

    /// Use a specific compiler, e.g. one with a fixed clock.
    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Apply the reserved-word pre-pass without parsing.
    pub fn prepare(&self, text: &str) -> String {
        quote_reserved_words(text, &self.options.reserved_words)
    }

    /// Translate `text` into a query document.
    ///
    /// On failure the registered error observer, if any, receives the
    /// original text and the error.
    pub fn translate(&self, text: &str) -> Result<Document, Error> {
        tracing::debug!(expression = text, "translating filter expression");

        match self.run(text) {
            Ok(doc) => {
                tracing::debug!(keys = doc.len(), "translated filter expression");
                Ok(doc)
            }
            Err(error) => {
                tracing::debug!(expression = text, %error, "filter expression rejected");
                notify(text, &error);
                Err(error)
            }
        }
    }

    fn run(&self, text: &str) -> Result<Document, Error> {
        let source = self.prepare(text);
        let expr = parser::parse(&source)?;
        Ok(self.compiler.compile(&expr)?)
    }
}

/// Translate `text` with default options.
///
/// ```
/// use mongoq::translate;
///
/// let doc = translate("age > 10 && (name == \"Alice\" || name == \"Bob\")").unwrap();
/// assert!(doc.contains_key("age"));
/// assert!(doc.contains_key("$or"));
/// ```
pub fn translate(text: &str) -> Result<Document, Error> {
    Translator::default().translate(text)
}
