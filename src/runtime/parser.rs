//! Recursive descent parser for client expressions.
//!
//! Parses the text produced by [`Expr::render`](crate::js::Expr::render)
//! into an [`Ast`]. Going through the text, rather than the expression tree
//! directly, means every evaluation also checks that the emitted code is
//! well-formed and that literals decode back to what was written.

use super::lexer::{tokenize, Spanned, Token};
use super::value::JsValue;

/// Errors from expression parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Text that is not a token.
    #[error("invalid token at byte {0}")]
    InvalidToken(usize),
    /// A token in the wrong place.
    #[error("unexpected token at byte {position}: {message}")]
    UnexpectedToken {
        /// Byte offset of the token.
        position: usize,
        /// What was expected instead.
        message: String,
    },
    /// Input ended early.
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!x`
    Not,
    /// `-x`
    Neg,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNotEq,
    /// `==`
    LooseEq,
    /// `!=`
    LooseNotEq,
    /// `+`
    Add,
    /// `-`
    Sub,
}

/// Parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// A literal or keyword constant.
    Literal(JsValue),
    /// A name.
    Identifier(String),
    /// Prefix operator.
    Unary(UnaryOp, Box<Ast>),
    /// Infix operator.
    Binary(BinaryOp, Box<Ast>, Box<Ast>),
    /// `object.property`
    Member(Box<Ast>, String),
    /// `callee(args..)`
    Call(Box<Ast>, Vec<Ast>),
    /// `await operand`
    Await(Box<Ast>),
}

/// Parse a complete expression.
pub fn parse(input: &str) -> Result<Ast, ParseError> {
    let tokens = tokenize(input).map_err(ParseError::InvalidToken)?;
    let mut parser = Parser { tokens, cursor: 0 };
    let ast = parser.parse_or()?;
    match parser.peek() {
        None => Ok(ast),
        Some(tok) => Err(ParseError::UnexpectedToken {
            position: tok.start,
            message: format!("expected end of input, got '{}'", tok.text),
        }),
    }
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    /// Consume the next token if it equals `token`.
    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().is_some_and(|t| &t.token == token) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), ParseError> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(()),
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.start,
                message: format!("expected {what}, got '{}'", tok.text),
            }),
            None => Err(ParseError::UnexpectedEof(format!("expected {what}"))),
        }
    }

    /// Left-associative binary level: `next (op next)*`.
    fn binary_level(
        &mut self,
        ops: &[(Token, BinaryOp)],
        next: fn(&mut Parser) -> Result<Ast, ParseError>,
    ) -> Result<Ast, ParseError> {
        let mut left = next(self)?;
        'outer: loop {
            for (token, op) in ops {
                if self.eat(token) {
                    let right = next(self)?;
                    left = Ast::Binary(*op, Box::new(left), Box::new(right));
                    continue 'outer;
                }
            }
            return Ok(left);
        }
    }

    fn parse_or(&mut self) -> Result<Ast, ParseError> {
        self.binary_level(&[(Token::Or, BinaryOp::Or)], Parser::parse_and)
    }

    fn parse_and(&mut self) -> Result<Ast, ParseError> {
        self.binary_level(&[(Token::And, BinaryOp::And)], Parser::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Ast, ParseError> {
        self.binary_level(
            &[
                (Token::StrictEq, BinaryOp::StrictEq),
                (Token::StrictNotEq, BinaryOp::StrictNotEq),
                (Token::LooseEq, BinaryOp::LooseEq),
                (Token::LooseNotEq, BinaryOp::LooseNotEq),
            ],
            Parser::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<Ast, ParseError> {
        self.binary_level(
            &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)],
            Parser::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Ast, ParseError> {
        if self.eat(&Token::Bang) {
            return Ok(Ast::Unary(UnaryOp::Not, Box::new(self.parse_unary()?)));
        }
        if self.eat(&Token::Minus) {
            return Ok(Ast::Unary(UnaryOp::Neg, Box::new(self.parse_unary()?)));
        }
        if self.eat(&Token::Ident("await".into())) {
            return Ok(Ast::Await(Box::new(self.parse_unary()?)));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Ast, ParseError> {
        let mut ast = self.parse_primary()?;
        loop {
            if self.eat(&Token::Dot) {
                match self.advance() {
                    Some(Spanned {
                        token: Token::Ident(name),
                        ..
                    }) => ast = Ast::Member(Box::new(ast), name),
                    Some(tok) => {
                        return Err(ParseError::UnexpectedToken {
                            position: tok.start,
                            message: format!("expected property name, got '{}'", tok.text),
                        })
                    }
                    None => return Err(ParseError::UnexpectedEof("expected property name".into())),
                }
            } else if self.eat(&Token::ParenOpen) {
                let args = self.parse_arguments()?;
                ast = Ast::Call(Box::new(ast), args);
            } else {
                return Ok(ast);
            }
        }
    }

    /// Arguments after `(`, through the closing `)`.
    fn parse_arguments(&mut self) -> Result<Vec<Ast>, ParseError> {
        let mut args = Vec::new();
        if self.eat(&Token::ParenClose) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_or()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(&Token::ParenClose, "',' or ')'")?;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<Ast, ParseError> {
        let Some(tok) = self.advance() else {
            return Err(ParseError::UnexpectedEof("expected an expression".into()));
        };
        match tok.token {
            Token::Number(n) => Ok(Ast::Literal(JsValue::Number(n))),
            Token::Str(s) => Ok(Ast::Literal(JsValue::String(s))),
            Token::Ident(name) => Ok(match name.as_str() {
                "true" => Ast::Literal(JsValue::Bool(true)),
                "false" => Ast::Literal(JsValue::Bool(false)),
                "null" => Ast::Literal(JsValue::Null),
                "undefined" => Ast::Literal(JsValue::Undefined),
                "NaN" => Ast::Literal(JsValue::Number(f64::NAN)),
                "Infinity" => Ast::Literal(JsValue::Number(f64::INFINITY)),
                _ => Ast::Identifier(name),
            }),
            Token::ParenOpen => {
                let inner = self.parse_or()?;
                self.expect(&Token::ParenClose, "')'")?;
                Ok(inner)
            }
            _ => Err(ParseError::UnexpectedToken {
                position: tok.start,
                message: format!("expected an expression, got '{}'", tok.text),
            }),
        }
    }
}
