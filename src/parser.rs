use crate::{
    ast::{Argument, BinOp, Builtin, Expr, LiteralKind, Token, UnaryOp},
    lexer::{Lexer, Position, SyntaxError},
};
use std::mem;

/// Deepest expression tree accepted; compiling recurses once per level.
pub const MAX_DEPTH: usize = 256;

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
    /// Open parentheses and negations around the current token.
    nesting: usize,
}

/// A parsed subtree and its depth.
type Node = (Expr, usize);

fn too_deep(position: Position) -> SyntaxError {
    SyntaxError::new(position, "expression nested too deeply")
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, SyntaxError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
            nesting: 0,
        })
    }

    fn advance(&mut self) -> Result<(), SyntaxError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_start();
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), SyntaxError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&format!("expected {}", expected)));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn unexpected(&self, expectation: &str) -> SyntaxError {
        SyntaxError::new(
            self.current_position,
            format!("{}, found {}", expectation, self.current_token),
        )
    }

    fn enter(&mut self, position: Position) -> Result<(), SyntaxError> {
        if self.nesting >= MAX_DEPTH {
            return Err(too_deep(position));
        }
        self.nesting += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    /// Parse primary expressions: literals, names, calls, and groups
    fn parse_primary(&mut self) -> Result<Node, SyntaxError> {
        let position = self.current_position;

        let expr = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Integer(raw) => {
                self.advance()?;
                Expr::Literal {
                    kind: LiteralKind::Integer,
                    raw,
                }
            }
            Token::Float(raw) => {
                self.advance()?;
                Expr::Literal {
                    kind: LiteralKind::Float,
                    raw,
                }
            }
            Token::String(raw) => {
                self.advance()?;
                Expr::string(raw)
            }
            Token::Selector(segments) => {
                self.advance()?;
                Expr::Selector(segments)
            }
            Token::Identifier(name) => {
                self.advance()?;
                if self.check(&Token::LParen) {
                    self.advance()?;
                    self.parse_call(name, position)?
                } else {
                    Expr::Identifier(name)
                }
            }
            Token::LParen => {
                self.enter(position)?;
                self.advance()?;
                let (inner, depth) = self.parse_or()?;
                self.expect(Token::RParen)?;
                self.leave();
                if depth >= MAX_DEPTH {
                    return Err(too_deep(position));
                }
                return Ok((Expr::Paren(Box::new(inner)), depth + 1));
            }
            Token::Reserved(word) => {
                return Err(SyntaxError::new(
                    position,
                    format!(
                        "'{}' is a reserved word, quote it (\"{}\") to use it as a field name",
                        word, word
                    ),
                ));
            }
            token => {
                self.current_token = token;
                return Err(self.unexpected("expected operand"));
            }
        };
        Ok((expr, 1))
    }

    /// Parse the argument list after `name(`
    fn parse_call(&mut self, function: String, position: Position) -> Result<Expr, SyntaxError> {
        let mut args = vec![];

        if !self.check(&Token::RParen) {
            loop {
                args.push(self.parse_argument(&function)?);
                if !self.check(&Token::Comma) {
                    break;
                }
                self.advance()?;
            }
        }

        self.expect(Token::RParen)?;

        if let Some(builtin) = Builtin::from_name(&function)
            && args.len() < builtin.min_arity()
        {
            return Err(SyntaxError::new(
                position,
                format!(
                    "{}() expected {} arguments, got {}",
                    function,
                    builtin.min_arity(),
                    args.len()
                ),
            ));
        }

        Ok(Expr::Call { function, args })
    }

    fn parse_argument(&mut self, function: &str) -> Result<Argument, SyntaxError> {
        let arg = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(raw) => Argument::String(raw),
            Token::Identifier(name) => Argument::Identifier(name),
            Token::Selector(segments) => Argument::Selector(segments),
            token => {
                self.current_token = token;
                return Err(SyntaxError::new(
                    self.current_position,
                    format!(
                        "{}() unsupported argument {}, expected a name or a quoted string",
                        function, self.current_token
                    ),
                ));
            }
        };
        self.advance()?;
        Ok(arg)
    }

    fn parse_unary(&mut self) -> Result<Node, SyntaxError> {
        if self.check(&Token::Exclamation) {
            let position = self.current_position;
            self.enter(position)?;
            self.advance()?;
            let (operand, depth) = self.parse_unary()?;
            self.leave();
            if depth >= MAX_DEPTH {
                return Err(too_deep(position));
            }
            let expr = Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            };
            return Ok((expr, depth + 1));
        }
        self.parse_primary()
    }

    /// Combine two subtrees under `op`, refusing trees deeper than [`MAX_DEPTH`].
    fn join(&self, op: BinOp, left: Node, right: Node, position: Position) -> Result<Node, SyntaxError> {
        let depth = left.1.max(right.1) + 1;
        if depth > MAX_DEPTH {
            return Err(too_deep(position));
        }
        Ok((Expr::binary(op, left.0, right.0), depth))
    }

    fn parse_comparison(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_unary()?;

        if let Some(op) = match &self.current_token {
            Token::EqEq => Some(BinOp::Equal),
            Token::NotEq => Some(BinOp::NotEqual),
            Token::Lt => Some(BinOp::LessThan),
            Token::Gt => Some(BinOp::GreaterThan),
            Token::LtEq => Some(BinOp::LessEqual),
            Token::GtEq => Some(BinOp::GreaterEqual),
            _ => None,
        } {
            let position = self.current_position;
            self.advance()?;
            let right = self.parse_unary()?;
            left = self.join(op, left, right, position)?;
        }
        Ok(left)
    }

    fn parse_all_of(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_comparison()?;

        while self.check(&Token::Ampersand) {
            let position = self.current_position;
            self.advance()?;
            let right = self.parse_comparison()?;
            left = self.join(BinOp::AllOf, left, right, position)?;
        }
        Ok(left)
    }

    fn parse_any_of(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_all_of()?;

        while self.check(&Token::Pipe) {
            let position = self.current_position;
            self.advance()?;
            let right = self.parse_all_of()?;
            left = self.join(BinOp::AnyOf, left, right, position)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_any_of()?;

        while self.check(&Token::AndAnd) {
            let position = self.current_position;
            self.advance()?;
            let right = self.parse_any_of()?;
            left = self.join(BinOp::And, left, right, position)?;
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::OrOr) {
            let position = self.current_position;
            self.advance()?;
            let right = self.parse_and()?;
            left = self.join(BinOp::Or, left, right, position)?;
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_or().map(|(expr, _)| expr)
    }

    /// Parse a complete expression; the whole input must be consumed.
    pub fn parse(&mut self) -> Result<Expr, SyntaxError> {
        if self.check(&Token::Eof) {
            return Err(SyntaxError::new(self.current_position, "empty expression"));
        }
        let expr = self.parse_expression()?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }
}

/// Parse `text` into an expression tree.
pub fn parse(text: &str) -> Result<Expr, SyntaxError> {
    Parser::new(Lexer::new(text))?.parse()
}
