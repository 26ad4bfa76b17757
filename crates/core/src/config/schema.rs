//! Configuration schema definitions
//!
//! Every section has serde defaults, so an empty file (or no file at all)
//! yields the production behaviour of the search widget.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub page: PageConfig,
}

impl ConfigSchema {
    /// Reject values the pipeline cannot operate with.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.matching.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::invalid_value(
                "matching.threshold",
                format!("{threshold} is outside [0, 1]"),
            ));
        }
        if self.matching.keys.is_empty() {
            return Err(Error::invalid_value("matching.keys", "at least one key is required"));
        }
        if self.matching.distance == 0 {
            return Err(Error::invalid_value("matching.distance", "must be greater than zero"));
        }
        if self.search.min_query_len == 0 {
            return Err(Error::invalid_value("search.min_query_len", "must be greater than zero"));
        }
        if self.search.top_n == 0 {
            return Err(Error::invalid_value("search.top_n", "must be greater than zero"));
        }
        if self.dataset.groups.is_empty() {
            return Err(Error::invalid_value("dataset.groups", "at least one group is required"));
        }
        if self.dataset.location.trim().is_empty() {
            return Err(Error::invalid_value("dataset.location", "must not be empty"));
        }
        Ok(())
    }
}

/// Debounce and result-list configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum normalized query length that triggers a search
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Number of cards rendered
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            top_n: default_top_n(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    3
}

fn default_top_n() -> usize {
    2
}

/// Record field searched by the fuzzy matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKey {
    Description,
    Name,
    Categories,
}

/// Fuzzy matching configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingConfig {
    /// Maximum accepted distance (0 = exact, 1 = anything)
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Fields searched, in priority order
    #[serde(default = "default_keys")]
    pub keys: Vec<SearchKey>,

    /// How far from the start of a field a match may drift before it
    /// costs a full point of distance
    #[serde(default = "default_distance")]
    pub distance: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            keys: default_keys(),
            distance: default_distance(),
        }
    }
}

fn default_threshold() -> f64 {
    0.4
}

fn default_keys() -> Vec<SearchKey> {
    vec![SearchKey::Description, SearchKey::Name, SearchKey::Categories]
}

fn default_distance() -> u32 {
    100
}

/// Dataset resource configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetConfig {
    /// File path or http(s) URL of the JSON document
    #[serde(default = "default_location")]
    pub location: String,

    /// Top-level groups flattened into the record collection
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            groups: default_groups(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_location() -> String {
    "./database.json".to_string()
}

fn default_groups() -> Vec<String> {
    vec!["countries", "temples", "beaches"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Result markup configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    #[serde(default = "default_placeholder_description")]
    pub placeholder_description: String,

    #[serde(default = "default_loading_message")]
    pub loading_message: String,

    #[serde(default = "default_empty_message")]
    pub empty_message: String,

    #[serde(default = "default_error_message")]
    pub error_message: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            placeholder_image: default_placeholder_image(),
            placeholder_description: default_placeholder_description(),
            loading_message: default_loading_message(),
            empty_message: default_empty_message(),
            error_message: default_error_message(),
        }
    }
}

fn default_placeholder_image() -> String {
    "images/placeholder.png".to_string()
}

fn default_placeholder_description() -> String {
    "No description available".to_string()
}

fn default_loading_message() -> String {
    "Finding the best destinations...".to_string()
}

fn default_empty_message() -> String {
    "No destinations found".to_string()
}

fn default_error_message() -> String {
    "Something went wrong while searching destinations. Please try again.".to_string()
}

/// Selectors used to locate the widget's elements on the host page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageConfig {
    #[serde(default = "default_input_selectors")]
    pub input_selectors: Vec<String>,

    #[serde(default = "default_results_selectors")]
    pub results_selectors: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            input_selectors: default_input_selectors(),
            results_selectors: default_results_selectors(),
        }
    }
}

fn default_input_selectors() -> Vec<String> {
    vec!["#Research".to_string(), ".nav-right input[type=\"text\"]".to_string()]
}

fn default_results_selectors() -> Vec<String> {
    vec!["#results".to_string(), ".search-results".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_defaults_are_valid() {
        let schema = ConfigSchema::default();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.search.debounce_ms, 300);
        assert_eq!(schema.search.min_query_len, 3);
        assert_eq!(schema.search.top_n, 2);
        assert_eq!(schema.matching.threshold, 0.4);
        assert_eq!(
            schema.matching.keys,
            vec![SearchKey::Description, SearchKey::Name, SearchKey::Categories]
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [search]
            top_n = 5

            [matching]
            keys = ["name"]
            "#,
        )
        .unwrap();

        assert_eq!(schema.search.top_n, 5);
        assert_eq!(schema.search.debounce_ms, 300);
        assert_eq!(schema.matching.keys, vec![SearchKey::Name]);
        assert_eq!(schema.matching.threshold, 0.4);
        assert_eq!(schema.dataset.groups.len(), 3);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut schema = ConfigSchema::default();
        schema.matching.threshold = 1.5;
        let err = schema.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
        assert!(err.message.contains("matching.threshold"));
    }

    #[test]
    fn test_zero_min_length_rejected() {
        let mut schema = ConfigSchema::default();
        schema.search.min_query_len = 0;
        assert!(schema.validate().is_err());
    }
}
