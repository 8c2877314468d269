//! Configuration for the filter compiler.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional file, then `SMARTFILTER_*` environment variables.

use std::collections::HashMap;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_NAMESPACE: &str = "ansible_facts";
pub const DEFAULT_SEPARATOR: &str = "__";
pub const DEFAULT_ROOT_MODEL: &str = "host";
const ENV_PREFIX: &str = "SMARTFILTER";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Key prefix addressing the JSON document column.
    pub namespace: String,
    /// Relation and path separator inside keys.
    pub separator: String,
    /// Model whose search fields a bare `search=` expands to.
    pub root_model: String,
    /// Longest accepted filter, in characters.
    pub max_length: Option<usize>,
    /// Deepest accepted parenthesis nesting.
    pub max_depth: Option<usize>,
    /// Searchable text fields per model, used to seed a registry.
    pub search_fields: HashMap<String, Vec<String>>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            root_model: DEFAULT_ROOT_MODEL.to_string(),
            max_length: None,
            max_depth: None,
            search_fields: HashMap::new(),
        }
    }
}

impl FilterSettings {
    /// Defaults, overridden by `path` (any format `config` understands, the
    /// file may be missing) and then by the environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<FilterSettings>()?;
        settings.validated()
    }

    pub fn from_toml(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<FilterSettings>()?;
        settings.validated()
    }

    fn validated(self) -> Result<Self> {
        if self.separator.is_empty() {
            return Err(crate::FilterError::Config("separator must not be empty".into()));
        }
        if self.namespace.is_empty() {
            return Err(crate::FilterError::Config("namespace must not be empty".into()));
        }
        Ok(self)
    }
}
