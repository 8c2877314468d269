//! Clause interpretation.
//!
//! Each `key=value` leaf is classified once by its key into a [`KeyKind`]:
//! a plain field comparison, a path into the fact document, or a search
//! expansion. Quote stripping and coercion differ between the first two.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{FilterError, Result};
use crate::metadata::SearchFieldProvider;
use crate::parser::Clause;
use crate::predicate::{ContainmentPredicate, FieldPredicate, Predicate};
use crate::search;
use crate::settings::FilterSettings;
use crate::value::TypedValue;

pub const SEARCH_KEY: &str = "search";
pub const ARRAY_MARKER: &str = "[]";
const CONTAINS_SUFFIX: &str = "contains";

/// Trailing lookup accepted (and dropped) on a document path.
const EXACT_LOOKUP: &str = "exact";

/// Field lookups that have no meaning inside a containment document.
const UNSUPPORTED_LOOKUPS: &[&str] = &[
    "iexact", "contains", "icontains", "in", "gt", "gte", "lt", "lte", "startswith",
    "istartswith", "endswith", "iendswith", "range", "isnull", "regex", "iregex",
    "has_key", "has_keys", "has_any_keys", "contained_by",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind<'k> {
    /// Flat field path, possibly traversing relations.
    Field(&'k str),
    /// Path inside the fact document, namespace prefix removed.
    Document(&'k str),
    /// Search over the root model (`None`) or a relation's model.
    Search(Option<&'k str>),
}

impl<'k> KeyKind<'k> {
    pub fn classify(key: &'k str, settings: &FilterSettings) -> Self {
        let namespace = settings.namespace.as_str();
        let separator = settings.separator.as_str();

        if key == namespace {
            return KeyKind::Document("");
        }
        if let Some(rest) = key.strip_prefix(namespace).and_then(|r| r.strip_prefix(separator)) {
            return KeyKind::Document(rest);
        }
        if key == SEARCH_KEY {
            return KeyKind::Search(None);
        }
        if let Some(relation) = key.strip_suffix(SEARCH_KEY).and_then(|r| r.strip_suffix(separator)) {
            return KeyKind::Search(Some(relation));
        }
        KeyKind::Field(key)
    }
}

/// One step of a document path: `name` or `name[]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'s> {
    Object(&'s str),
    Array(&'s str),
}

impl<'s> PathSegment<'s> {
    pub fn parse(segment: &'s str, key: &str) -> Result<Self> {
        let (name, segment) = match segment.strip_suffix(ARRAY_MARKER) {
            Some(name) => (name, PathSegment::Array(name)),
            None => (segment, PathSegment::Object(segment)),
        };
        if name.is_empty() {
            return Err(FilterError::MalformedPath {
                key: key.to_string(),
                reason: "empty path segment".to_string(),
            });
        }
        Ok(segment)
    }

    /// Wrap `inner` one level: `{name: inner}` or `{name: [inner]}`.
    pub fn wrap(self, inner: Value) -> Value {
        let (name, value) = match self {
            PathSegment::Object(name) => (name, inner),
            PathSegment::Array(name) => (name, Value::Array(vec![inner])),
        };
        let mut map = Map::new();
        map.insert(name.to_string(), value);
        Value::Object(map)
    }
}

pub(crate) struct Interpreter<'a> {
    pub(crate) settings: &'a FilterSettings,
    pub(crate) provider: &'a dyn SearchFieldProvider,
}

impl Interpreter<'_> {
    pub(crate) fn interpret(&self, clause: &Clause) -> Result<Predicate> {
        let key = clause.key();
        match KeyKind::classify(key, self.settings) {
            KeyKind::Field(path) => {
                let value = TypedValue::from_field_atom(&clause.value);
                Ok(FieldPredicate::exact(path, value).into())
            }
            KeyKind::Document(path) => {
                let leaf = TypedValue::from_document_atom(&clause.value);
                let document = self.build_document(key, path, leaf.to_json())?;
                trace!(key, %document, "built containment document");
                Ok(ContainmentPredicate { path: self.containment_path(), value: document }.into())
            }
            KeyKind::Search(relation) => {
                let value = TypedValue::from_field_atom(&clause.value);
                search::expand(self.provider, self.settings, relation, value)
            }
        }
    }

    fn containment_path(&self) -> String {
        format!("{}{}{}", self.settings.namespace, self.settings.separator, CONTAINS_SUFFIX)
    }

    /// Folds the path right to left so the leaf ends up innermost.
    fn build_document(&self, key: &str, path: &str, leaf: Value) -> Result<Value> {
        let mut segments: Vec<&str> = path.split(self.settings.separator.as_str()).collect();

        if segments.len() > 1 {
            match segments.last().copied() {
                Some(EXACT_LOOKUP) => {
                    segments.pop();
                }
                Some(lookup) if UNSUPPORTED_LOOKUPS.contains(&lookup) => {
                    return Err(FilterError::UnsupportedLookup {
                        namespace: self.settings.namespace.clone(),
                        lookup: lookup.to_string(),
                    });
                }
                _ => (),
            }
        }

        let segments = segments
            .into_iter()
            .map(|segment| PathSegment::parse(segment, key))
            .collect::<Result<Vec<_>>>()?;

        Ok(segments.into_iter().rev().fold(leaf, |inner, segment| segment.wrap(inner)))
    }
}
