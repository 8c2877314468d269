use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Number, Value};

use crate::lexer::Atom;

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^[-+]?[0-9]+$").unwrap();
    static ref DECIMAL: Regex = Regex::new(r"^[-+]?[0-9]+\.[0-9]+$").unwrap();
}

/// Literal that keeps its quotes when it appears quoted under the fact namespace.
const NULL_LITERAL: &str = "null";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl TypedValue {
    /// `true`/`false`, then integers, then decimals; everything else is text.
    /// Integers too large for an `i64` and decimals too large for an `f64`
    /// stay text.
    pub fn coerce(text: &str) -> Self {
        match text {
            "true" => return TypedValue::Bool(true),
            "false" => return TypedValue::Bool(false),
            _ => (),
        }
        if INTEGER.is_match(text) {
            if let Ok(i) = text.parse::<i64>() {
                return TypedValue::Integer(i);
            }
        } else if DECIMAL.is_match(text) {
            if let Ok(f) = text.parse::<f64>() {
                if f.is_finite() {
                    return TypedValue::Float(f);
                }
            }
        }
        TypedValue::String(text.to_string())
    }

    /// Plain field values: quotes are always stripped before coercion.
    pub fn from_field_atom(atom: &Atom) -> Self {
        Self::coerce(&atom.text)
    }

    /// Values under the fact namespace: a quoted `"null"` keeps its quotes so
    /// it stays distinguishable from the bare word.
    pub fn from_document_atom(atom: &Atom) -> Self {
        if atom.quoted && atom.text == NULL_LITERAL {
            Self::coerce(&atom.raw())
        } else {
            Self::coerce(&atom.text)
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::Integer(i) => Value::from(*i),
            TypedValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            TypedValue::String(s) => Value::String(s.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Bool(b) => write!(f, "{b}"),
            TypedValue::Integer(i) => write!(f, "{i}"),
            TypedValue::Float(x) => write!(f, "{x:?}"),
            TypedValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::Integer(i)
    }
}

impl From<f64> for TypedValue {
    fn from(f: f64) -> Self {
        TypedValue::Float(f)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Bool(b)
    }
}
