//! Recursive descent parser building the expression tree.
//!
//! Grammar:
//!   filter   = or_expr EOF ;
//!   or_expr  = and_expr { "or" and_expr } ;
//!   and_expr = primary { "and" primary } ;
//!   primary  = "(" or_expr ")" | clause ;
//!   clause   = atom "=" atom ;
//!
//! Runs of the same operator at one level become a single n-ary group.

use std::fmt;

use tracing::trace;

use crate::error::{FilterError, Result};
use crate::lexer::{tokenize, Atom, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::And => write!(f, "AND"),
            BoolOp::Or => write!(f, "OR"),
        }
    }
}

/// A `key=value` leaf. The value is kept exactly as lexed; unquoting and
/// coercion depend on the key and happen during interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub key: Atom,
    pub value: Atom,
}

impl Clause {
    /// The key with quotes removed.
    pub fn key(&self) -> &str {
        &self.key.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Clause(Clause),
    Group { operator: BoolOp, children: Vec<Expression> },
}

impl Expression {
    /// Number of clauses below this node.
    pub fn clause_count(&self) -> usize {
        match self {
            Expression::Clause(_) => 1,
            Expression::Group { children, .. } => children.iter().map(Expression::clause_count).sum(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Clause(clause) => write!(f, "{}={}", clause.key.raw(), clause.value.raw()),
            Expression::Group { operator, children } => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {operator} ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

pub fn parse_expression(input: &str) -> Result<Expression> {
    Parser::new(input, None)?.parse()
}

pub(crate) struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: Option<usize>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str, max_depth: Option<usize>) -> Result<Self> {
        let tokens = tokenize(input)?;
        trace!(tokens = tokens.len(), "tokenized filter");
        Ok(Self { input, tokens, pos: 0, depth: 0, max_depth })
    }

    pub(crate) fn parse(mut self) -> Result<Expression> {
        if self.tokens.is_empty() {
            return Err(self.error("empty filter", None));
        }
        let expression = self.or_expr()?;
        match self.peek() {
            None => Ok(expression),
            Some(token) => Err(self.unexpected(token)),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    fn error(&self, message: impl Into<String>, offset: Option<usize>) -> FilterError {
        FilterError::syntax(self.input, message, offset)
    }

    fn unexpected(&self, token: &Token) -> FilterError {
        self.error(format!("unexpected {} at offset {}", token.describe(), token.offset), Some(token.offset))
    }

    fn end_of_input(&self, expected: &str) -> FilterError {
        self.error(format!("expected {expected} but reached end of input"), Some(self.input.len()))
    }

    fn or_expr(&mut self) -> Result<Expression> {
        self.chain(BoolOp::Or)
    }

    fn and_expr(&mut self) -> Result<Expression> {
        self.chain(BoolOp::And)
    }

    /// One precedence tier: operands of the next tighter tier joined by `operator`.
    fn chain(&mut self, operator: BoolOp) -> Result<Expression> {
        let keyword = match operator {
            BoolOp::Or => TokenKind::Or,
            BoolOp::And => TokenKind::And,
        };

        let first = self.operand(operator)?;
        if !self.check(&keyword) {
            return Ok(first);
        }

        let mut children = vec![first];
        while self.check(&keyword) {
            self.advance();
            children.push(self.operand(operator)?);
        }
        Ok(Expression::Group { operator, children })
    }

    fn operand(&mut self, operator: BoolOp) -> Result<Expression> {
        match operator {
            BoolOp::Or => self.and_expr(),
            BoolOp::And => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expression> {
        if !self.check(&TokenKind::LParen) {
            return self.clause();
        }

        let open = self.advance().map(|t| t.offset);
        self.depth += 1;
        if let Some(max) = self.max_depth {
            if self.depth > max {
                return Err(FilterError::LimitExceeded { what: "nesting depth", max });
            }
        }

        let inner = self.or_expr()?;
        match self.advance() {
            Some(Token { kind: TokenKind::RParen, .. }) => {
                self.depth -= 1;
                Ok(inner)
            }
            Some(token) => Err(self.unexpected(&token)),
            None => Err(self.error("unbalanced parentheses", open)),
        }
    }

    fn clause(&mut self) -> Result<Expression> {
        let key_token = self.advance().ok_or_else(|| self.end_of_input("a clause"))?;
        let key = key_token.as_atom().ok_or_else(|| self.unexpected(&key_token))?;
        if key.text.is_empty() {
            return Err(self.error("missing key", Some(key_token.offset)));
        }

        match self.advance() {
            Some(Token { kind: TokenKind::Equals, .. }) => (),
            Some(token) => return Err(self.unexpected(&token)),
            None => return Err(self.end_of_input("'='")),
        }

        let value_token = self.advance().ok_or_else(|| self.end_of_input("a value"))?;
        let value = value_token.as_atom().ok_or_else(|| self.unexpected(&value_token))?;

        Ok(Expression::Clause(Clause { key, value }))
    }
}
