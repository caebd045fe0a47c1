use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal, kept as written
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -10
    /// ```
    Integer(String),

    /// Floating-point literal, kept as written
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -1.0
    /// 2e10
    /// ```
    Float(String),

    /// String literal enclosed in double quotes.
    ///
    /// Holds the text between the quotes verbatim, escape sequences included.
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "5fc4722ae367f19055977d1f"
    /// ```
    String(String),

    // Names
    /// Field name or function name
    ///
    /// Must start with a letter or underscore, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// age
    /// _id
    /// dateRelative
    /// ```
    Identifier(String),

    /// Dotted field path with no whitespace around the dots
    ///
    /// # Examples
    /// ```text
    /// person.age
    /// level1.level2.level3
    /// ```
    Selector(Vec<String>),

    /// A word that must be quoted before it can be used as a field name
    ///
    /// # Examples
    /// ```text
    /// type
    /// ```
    Reserved(String),

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Logical
    /// Logical AND (`&&` or the word `and`)
    AndAnd,

    /// Logical OR (`||` or the word `or`)
    OrOr,

    /// Negation
    Exclamation,

    // Membership
    /// All-of list separator
    ///
    /// # Examples
    /// ```text
    /// tags == ("red" & "blue")
    /// ```
    Ampersand,

    /// One-of list separator
    ///
    /// # Examples
    /// ```text
    /// name == ("Alice" | "Bob")
    /// ```
    Pipe,

    // Delimiters
    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Comma for separating call arguments
    Comma,

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(raw) | Token::Float(raw) => write!(f, "{}", raw),
            Token::String(raw) => write!(f, "\"{}\"", raw),
            Token::Identifier(name) | Token::Reserved(name) => write!(f, "{}", name),
            Token::Selector(segments) => write!(f, "{}", segments.join(".")),
            Token::EqEq => write!(f, "'=='"),
            Token::NotEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::LtEq => write!(f, "'<='"),
            Token::GtEq => write!(f, "'>='"),
            Token::AndAnd => write!(f, "'&&'"),
            Token::OrOr => write!(f, "'||'"),
            Token::Exclamation => write!(f, "'!'"),
            Token::Ampersand => write!(f, "'&'"),
            Token::Pipe => write!(f, "'|'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Comma => write!(f, "','"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
