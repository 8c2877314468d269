//! Smartfilter – a compiler for the host filter language used to select
//! inventory hosts by attribute and by gathered fact data.
//!
//! A filter is a boolean combination of `key=value` clauses:
//!
//! ```text
//! name=web01
//! group__name="prod" and enabled=true
//! (name=web01 or name=web02) and ansible_facts__ansible_distribution="CentOS"
//! ansible_facts__ansible_mounts[]__mount="/boot"
//! search=db or inventory__search=staging
//! ```
//!
//! Compilation runs leaves first:
//! * [`lexer`] – atoms (bare or quoted), `=`, parentheses, `and`/`or`.
//! * [`parser`] – precedence (`and` binds tighter than `or`) and grouping into
//!   an [`parser::Expression`] tree.
//! * [`clause`] – per-clause interpretation: flat field comparison, fact
//!   document containment built from a `__`-separated path, or search
//!   expansion through a [`metadata::SearchFieldProvider`].
//! * [`predicate`] – the abstract [`predicate::Predicate`] handed to whatever
//!   query engine executes it.
//!
//! ## Values
//! Values are coerced in order: `true`/`false`, integers, decimals, text.
//! Quotes around a value are dropped, except that under the fact namespace a
//! quoted `"null"` keeps its quotes so it stays distinct from the bare word.
//!
//! ## Quick Start
//! ```
//! use smartfilter::{parse, SearchFieldRegistry};
//! let fields = SearchFieldRegistry::new().with_model("host", ["name", "description"]);
//! let predicate = parse("name=web01 and ansible_facts__os_family=RedHat", &fields).unwrap();
//! assert_eq!(
//!     predicate.to_string(),
//!     r#"(name="web01" AND ansible_facts__contains={"os_family":"RedHat"})"#
//! );
//! ```
//!
//! Parsing is a pure function of the input, the settings and the provider;
//! nothing is cached between calls.

pub mod clause;
pub mod error;
pub mod lexer;
pub mod metadata;
pub mod parser;
pub mod predicate;
mod search;
pub mod settings;
pub mod value;

use tracing::debug;

use crate::clause::Interpreter;
pub use crate::error::{FilterError, Result};
pub use crate::metadata::{SearchFieldProvider, SearchFieldRegistry};
use crate::parser::{Expression, Parser};
pub use crate::parser::BoolOp;
pub use crate::predicate::{ContainmentPredicate, FieldPredicate, Lookup, Predicate};
pub use crate::settings::FilterSettings;
pub use crate::value::TypedValue;

/// Compile `filter` with default settings.
pub fn parse(filter: &str, provider: &dyn SearchFieldProvider) -> Result<Predicate> {
    SmartFilter::new(provider).parse(filter)
}

/// A filter compiler bound to its settings and search field provider.
pub struct SmartFilter<'p> {
    settings: FilterSettings,
    provider: &'p dyn SearchFieldProvider,
}

impl<'p> SmartFilter<'p> {
    pub fn new(provider: &'p dyn SearchFieldProvider) -> Self {
        Self::with_settings(FilterSettings::default(), provider)
    }

    pub fn with_settings(settings: FilterSettings, provider: &'p dyn SearchFieldProvider) -> Self {
        Self { settings, provider }
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// Parse only, without interpreting any clause.
    pub fn expression(&self, filter: &str) -> Result<Expression> {
        if let Some(max) = self.settings.max_length {
            if filter.chars().count() > max {
                return Err(FilterError::LimitExceeded { what: "length", max });
            }
        }
        Parser::new(filter, self.settings.max_depth)?.parse()
    }

    pub fn parse(&self, filter: &str) -> Result<Predicate> {
        debug!(filter, "compiling smart filter");
        let expression = self.expression(filter)?;
        let interpreter = Interpreter { settings: &self.settings, provider: self.provider };
        let predicate = compile(&interpreter, &expression)?;
        debug!(clauses = expression.clause_count(), %predicate, "compiled smart filter");
        Ok(predicate)
    }
}

/// Replaces clauses with their predicates and folds groups left to right.
fn compile(interpreter: &Interpreter<'_>, expression: &Expression) -> Result<Predicate> {
    match expression {
        Expression::Clause(clause) => interpreter.interpret(clause),
        Expression::Group { operator, children } => {
            let mut children = children.iter().map(|child| compile(interpreter, child));
            let first = children.next().ok_or_else(|| FilterError::Syntax {
                input: expression.to_string(),
                message: "empty group".to_string(),
                offset: None,
            })??;
            children.try_fold(first, |acc, child| -> Result<Predicate> { Ok(acc.combine(*operator, child?)) })
        }
    }
}
