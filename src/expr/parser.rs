//! Recursive descent parser.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('-' | '+') unary | power
//! power  := atom (('**' | '^') unary)?
//! atom   := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```

use super::lexer::{tokenize, Token, TokenKind};
use super::{BinaryOp, Builtin, Constant, Expr};
use crate::error::{EpicycleError, Result};

/// Deepest nesting of unary operators, powers and parentheses accepted.
const MAX_DEPTH: usize = 256;

/// Parse expression text.
pub fn parse(source: &str) -> Result<Expr> {
    if source.trim().is_empty() {
        return Err(EpicycleError::parse(0, "empty expression"));
    }
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    let token = parser.peek();
    if token.kind != TokenKind::Eof {
        return Err(EpicycleError::parse(token.position, "unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize() always ends with Eof, and advance() never moves past it
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        let token = self.advance();
        if token.kind == kind {
            Ok(())
        } else {
            Err(EpicycleError::parse(token.position, format!("expected {}", what)))
        }
    }

    fn expr(&mut self) -> Result<Expr> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    // Every recursive rule passes through here, so this bounds the stack
    fn unary(&mut self) -> Result<Expr> {
        if self.depth >= MAX_DEPTH {
            return Err(EpicycleError::parse(
                self.peek().position,
                "expression nested too deeply",
            ));
        }
        self.depth += 1;
        let result = self.unary_inner();
        self.depth -= 1;
        result
    }

    fn unary_inner(&mut self) -> Result<Expr> {
        match self.peek().kind {
            TokenKind::Minus => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.unary()?)))
            },
            TokenKind::Plus => {
                self.advance();
                self.unary()
            },
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.atom()?;
        if self.peek().kind == TokenKind::Pow {
            self.advance();
            let exponent = self.unary()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(value) => Ok(Expr::Number(value)),
            TokenKind::Ident(name) => {
                if self.peek().kind == TokenKind::LParen {
                    let func = Builtin::from_name(&name)
                        .ok_or_else(|| EpicycleError::unknown_function(name.as_str()))?;
                    self.advance();
                    let arg = self.expr()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    return Ok(Expr::call(func, arg));
                }
                if Builtin::from_name(&name).is_some() {
                    return Err(EpicycleError::parse(
                        token.position,
                        format!("'{}' is a function and needs an argument", name),
                    ));
                }
                Ok(match Constant::from_name(&name) {
                    Some(constant) => Expr::Constant(constant),
                    None => Expr::Symbol(name),
                })
            },
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            },
            TokenKind::Eof => Err(EpicycleError::parse(token.position, "unexpected end of input")),
            _ => Err(EpicycleError::parse(token.position, "expected a number, name or '('")),
        }
    }
}
