//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The dataset could not be fetched or parsed
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// The matching engine failed unexpectedly
    #[error("Match failure: {0}")]
    MatchFailure(String),

    /// A single candidate could not be scored
    #[error("Score failure for '{record}': {reason}")]
    ScoreFailure {
        /// Name of the record being scored
        record: String,
        /// What was wrong with it
        reason: String,
    },

    /// None of the configured input selectors matched an element
    #[error("Search input not found (tried {0})")]
    InputNotFound(String),

    /// Template rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] wayfarer_core::Error),
}

/// Error code for integration with wayfarer-core error handling.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Dataset fetch or parse failure
    DatasetUnavailable = 11001,
    /// Matching engine failure
    MatchFailure = 11002,
    /// Per-candidate scoring failure
    ScoreFailure = 11003,
    /// Search input missing from the page
    InputNotFound = 11004,
    /// Template rendering failure
    Render = 11005,
    /// Configuration error
    Config = 11006,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::DatasetUnavailable(_) => SearchErrorCode::DatasetUnavailable,
            SearchError::MatchFailure(_) => SearchErrorCode::MatchFailure,
            SearchError::ScoreFailure { .. } => SearchErrorCode::ScoreFailure,
            SearchError::InputNotFound(_) => SearchErrorCode::InputNotFound,
            SearchError::Render(_) => SearchErrorCode::Render,
            SearchError::Config(_) => SearchErrorCode::Config,
        }
    }

    /// Create a dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::DatasetUnavailable(msg.into())
    }

    /// Create a score failure
    pub fn score(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ScoreFailure {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

impl From<handlebars::RenderError> for SearchError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<handlebars::TemplateError> for SearchError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Render(err.to_string())
    }
}
