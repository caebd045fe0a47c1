use crate::ast::Token;
use std::fmt;
use thiserror::Error;

/// Words that cannot appear unquoted as field names.
pub const RESERVED_WORDS: &[&str] = &["type"];

/// 1-based line and column of a character in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Malformed source text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{position}: {message}")]
pub struct SyntaxError {
    pub position: Position,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        SyntaxError {
            position,
            message: message.into(),
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    token_start: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            token_start: Position::start(),
        }
    }

    /// Where the most recently returned token starts.
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_identifier_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads `name(.name)*`. Dots must be followed directly by another name.
    fn read_name(&mut self) -> Result<Token, SyntaxError> {
        let mut segments = vec![self.read_identifier()];

        while self.current_char() == Some('.') {
            let dot = self.here();
            self.advance();
            match self.current_char() {
                Some(ch) if is_identifier_start(ch) => segments.push(self.read_identifier()),
                _ => {
                    return Err(SyntaxError::new(
                        dot,
                        format!("expected field name after '{}.'", segments.join(".")),
                    ));
                }
            }
        }

        if segments.len() > 1 {
            return Ok(Token::Selector(segments));
        }

        let word = segments.remove(0);
        Ok(match word.to_lowercase().as_str() {
            "and" => Token::AndAnd,
            "or" => Token::OrOr,
            _ if RESERVED_WORDS.contains(&word.as_str()) => Token::Reserved(word),
            _ => Token::Identifier(word),
        })
    }

    /// Reads a double-quoted string, keeping escape sequences as written.
    fn read_string(&mut self) -> Result<String, SyntaxError> {
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    result.push(ch);
                    self.advance();
                    if let Some(escaped) = self.current_char() {
                        result.push(escaped);
                        self.advance();
                    }
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(SyntaxError::new(
            self.token_start,
            "unterminated string literal",
        ))
    }

    fn read_digits(&mut self, number: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        self.read_digits(&mut number);

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            number.push('.');
            self.advance();
            self.read_digits(&mut number);
        }

        if matches!(self.current_char(), Some('e' | 'E')) {
            let sign = matches!(self.peek_char(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_char(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..digit_at {
                    number.extend(self.current_char());
                    self.advance();
                }
                self.read_digits(&mut number);
            }
        }

        if is_float {
            Token::Float(number)
        } else {
            Token::Integer(number)
        }
    }

    /// Consumes `first`, and `second` too when it follows directly.
    fn one_or_two(&mut self, second: char, single: Token, double: Token) -> Token {
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        self.token_start = self.here();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some('&') => self.one_or_two('&', Token::Ampersand, Token::AndAnd),
            Some('|') => self.one_or_two('|', Token::Pipe, Token::OrOr),
            Some('!') => self.one_or_two('=', Token::Exclamation, Token::NotEq),
            Some('<') => self.one_or_two('=', Token::Lt, Token::LtEq),
            Some('>') => self.one_or_two('=', Token::Gt, Token::GtEq),
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::EqEq
                } else {
                    return Err(SyntaxError::new(
                        self.token_start,
                        "unexpected '=' (did you mean '=='?)",
                    ));
                }
            }
            Some('"') => Token::String(self.read_string()?),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if is_identifier_start(ch) => self.read_name()?,
            Some(ch) => {
                return Err(SyntaxError::new(
                    self.token_start,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(token)
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and OR And type");
    assert_eq!(lexer.next_token().unwrap(), Token::AndAnd);
    assert_eq!(lexer.next_token().unwrap(), Token::OrOr);
    assert_eq!(lexer.next_token().unwrap(), Token::AndAnd);
    assert_eq!(lexer.next_token().unwrap(), Token::Reserved("type".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_comparison() {
    let mut lexer = Lexer::new("person.age >= 18");
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Selector(vec!["person".to_string(), "age".to_string()])
    );
    assert_eq!(lexer.next_token().unwrap(), Token::GtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer("18".to_string()));
    assert_eq!(lexer.token_start(), Position { line: 1, column: 15 });
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}
