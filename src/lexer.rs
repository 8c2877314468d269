//! Tokenizer for smart filter strings.
//!
//! Produces a flat token stream of atoms, `=`, parentheses and the boolean
//! keywords. Nothing here knows what a key or a value means; atoms keep track
//! of whether they were quoted because the clause interpreter needs it.

use crate::error::{FilterError, Result};

pub const QUOTE: char = '"';

/// A bare or quoted lexical value. For quoted atoms `text` is the content
/// between the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub text: String,
    pub quoted: bool,
}

impl Atom {
    pub fn bare(text: impl Into<String>) -> Self {
        Self { text: text.into(), quoted: false }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self { text: text.into(), quoted: true }
    }

    /// The atom as it appeared in the source, quotes included.
    pub fn raw(&self) -> String {
        if self.quoted {
            format!("{QUOTE}{}{QUOTE}", self.text)
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Atom(Atom),
    Equals,
    LParen,
    RParen,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character of the token.
    pub offset: usize,
}

impl Token {
    /// Keywords are only keywords between clauses; anywhere an atom is
    /// expected they are read back as bare words.
    pub fn as_atom(&self) -> Option<Atom> {
        match &self.kind {
            TokenKind::Atom(atom) => Some(atom.clone()),
            TokenKind::And => Some(Atom::bare("and")),
            TokenKind::Or => Some(Atom::bare("or")),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Atom(atom) => format!("'{}'", atom.raw()),
            TokenKind::Equals => "'='".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::And => "'and'".to_string(),
            TokenKind::Or => "'or'".to_string(),
        }
    }
}

fn is_bare(c: char) -> bool {
    !(c.is_whitespace() || c == '(' || c == ')' || c == '=' || c == QUOTE)
}

pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        let kind = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => {
                chars.next();
                TokenKind::LParen
            }
            ')' => {
                chars.next();
                TokenKind::RParen
            }
            '=' => {
                chars.next();
                TokenKind::Equals
            }
            QUOTE => {
                chars.next();
                let start = offset + QUOTE.len_utf8();
                let end = loop {
                    match chars.next() {
                        Some((end, QUOTE)) => break end,
                        Some(_) => (),
                        None => {
                            return Err(FilterError::syntax(input, "unterminated quoted value", Some(offset)));
                        }
                    }
                };
                TokenKind::Atom(Atom::quoted(&input[start..end]))
            }
            _ => {
                let mut end = input.len();
                while let Some(&(i, c)) = chars.peek() {
                    if !is_bare(c) {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                match &input[offset..end] {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    word => TokenKind::Atom(Atom::bare(word)),
                }
            }
        };
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}
