//! Search field metadata.
//!
//! The compiler never looks models up on its own; it asks a provider which
//! text fields a model (or a relation's target model) can be searched on.

use std::collections::HashMap;

use crate::settings::FilterSettings;

pub trait SearchFieldProvider: Send + Sync {
    /// Searchable fields of `model`, or `None` when the name does not resolve.
    fn search_fields(&self, model: &str) -> Option<Vec<String>>;
}

/// In-memory provider backed by a map from model name to field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFieldRegistry {
    models: HashMap<String, Vec<String>>,
}

impl SearchFieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &FilterSettings) -> Self {
        Self { models: settings.search_fields.clone() }
    }

    pub fn with_model<I, S>(mut self, model: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(model, fields);
        self
    }

    pub fn register<I, S>(&mut self, model: &str, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models.insert(model.to_string(), fields.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl SearchFieldProvider for SearchFieldRegistry {
    fn search_fields(&self, model: &str) -> Option<Vec<String>> {
        self.models.get(model).cloned()
    }
}
