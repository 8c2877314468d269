use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid query {input}: {message}")]
    Syntax { input: String, message: String, offset: Option<usize> },
    #[error("Malformed path '{key}': {reason}")]
    MalformedPath { key: String, reason: String },
    #[error("No related field named {0}")]
    UnknownRelation(String),
    #[error("{namespace} does not support searching with __{lookup}")]
    UnsupportedLookup { namespace: String, lookup: String },
    #[error("No searchable fields for {0}")]
    NoSearchFields(String),
    #[error("Filter exceeds {what} limit of {max}")]
    LimitExceeded { what: &'static str, max: usize },
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    pub(crate) fn syntax(input: &str, message: impl Into<String>, offset: Option<usize>) -> Self {
        Self::Syntax { input: input.to_string(), message: message.into(), offset }
    }

    /// True for everything a caller should answer with "invalid filter".
    /// Configuration problems are faults of the deployment, not of the filter.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

// Helper conversions
impl From<config::ConfigError> for FilterError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
