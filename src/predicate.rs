//! Compiled predicates and the boolean combinator.
//!
//! A [`Predicate`] is an abstract description of a query; mapping it onto a
//! concrete engine is up to the caller. Combining with [`Predicate::and`] and
//! [`Predicate::or`] is associative: joining onto a node with the same
//! connector appends to it, the way ORM query objects squash repeated `&`/`|`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::parser::BoolOp;
use crate::value::TypedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    /// Exact match.
    Exact,
    /// Case-sensitive substring containment.
    Contains,
}

impl Lookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookup::Exact => "exact",
            Lookup::Contains => "contains",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPredicate {
    pub path: String,
    pub lookup: Lookup,
    pub value: TypedValue,
}

impl FieldPredicate {
    pub fn exact(path: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        Self { path: path.into(), lookup: Lookup::Exact, value: value.into() }
    }

    pub fn contains(path: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        Self { path: path.into(), lookup: Lookup::Contains, value: value.into() }
    }
}

/// Lookups always render Django-style as `path__lookup=value`, whatever key
/// separator the filter was parsed with.
impl fmt::Display for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lookup {
            Lookup::Exact => write!(f, "{}={}", self.path, self.value),
            lookup => write!(f, "{}__{}={}", self.path, lookup.as_str(), self.value),
        }
    }
}

/// The document column at `path` contains `value` as a (partial) subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainmentPredicate {
    pub path: String,
    pub value: Value,
}

impl fmt::Display for ContainmentPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.path, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "predicate", rename_all = "snake_case")]
pub enum Predicate {
    Field(FieldPredicate),
    Containment(ContainmentPredicate),
    /// Programmatic OR produced by search expansion; never merged into a parent.
    OrGroup(Vec<FieldPredicate>),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn and(self, rhs: Predicate) -> Predicate {
        self.combine(BoolOp::And, rhs)
    }

    pub fn or(self, rhs: Predicate) -> Predicate {
        self.combine(BoolOp::Or, rhs)
    }

    pub fn combine(self, operator: BoolOp, rhs: Predicate) -> Predicate {
        let mut members = match (operator, self) {
            (BoolOp::And, Predicate::And(members)) | (BoolOp::Or, Predicate::Or(members)) => members,
            (_, lhs) => vec![lhs],
        };
        match (operator, rhs) {
            (BoolOp::And, Predicate::And(more)) | (BoolOp::Or, Predicate::Or(more)) => members.extend(more),
            (_, rhs) => members.push(rhs),
        }
        match operator {
            BoolOp::And => Predicate::And(members),
            BoolOp::Or => Predicate::Or(members),
        }
    }

    /// Every `(path, lookup)` the predicate touches, in source order.
    /// Containment predicates report their column path with `Lookup::Contains`.
    pub fn lookups(&self) -> Vec<(&str, Lookup)> {
        let mut out = Vec::new();
        self.collect_lookups(&mut out);
        out
    }

    fn collect_lookups<'a>(&'a self, out: &mut Vec<(&'a str, Lookup)>) {
        match self {
            Predicate::Field(field) => out.push((&field.path, field.lookup)),
            Predicate::Containment(containment) => out.push((&containment.path, Lookup::Contains)),
            Predicate::OrGroup(members) => out.extend(members.iter().map(|m| (m.path.as_str(), m.lookup))),
            Predicate::And(members) | Predicate::Or(members) => {
                for member in members {
                    member.collect_lookups(out);
                }
            }
        }
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, operator: BoolOp, members: &[T]) -> fmt::Result {
    write!(f, "(")?;
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            write!(f, " {operator} ")?;
        }
        write!(f, "{member}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Field(field) => write!(f, "{field}"),
            Predicate::Containment(containment) => write!(f, "{containment}"),
            Predicate::OrGroup(members) => write_joined(f, BoolOp::Or, members),
            Predicate::And(members) => write_joined(f, BoolOp::And, members),
            Predicate::Or(members) => write_joined(f, BoolOp::Or, members),
        }
    }
}

impl From<FieldPredicate> for Predicate {
    fn from(field: FieldPredicate) -> Self {
        Predicate::Field(field)
    }
}

impl From<ContainmentPredicate> for Predicate {
    fn from(containment: ContainmentPredicate) -> Self {
        Predicate::Containment(containment)
    }
}
