//! Destination records and the category weight table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a record; datasets use both numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric id
    Number(i64),
    /// String id
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// Category tags as they appear in the dataset.
///
/// Anything that is not a list of strings is kept verbatim so that one bad
/// record fails its own scoring instead of the whole dataset parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryTags {
    /// Well-formed list of tags
    Tags(Vec<String>),
    /// Any other JSON value
    Malformed(serde_json::Value),
}

impl Default for CategoryTags {
    fn default() -> Self {
        CategoryTags::Tags(Vec::new())
    }
}

impl CategoryTags {
    /// Returns the tags, or `None` when the data is malformed.
    ///
    /// An explicit `null` counts as no tags.
    pub fn tags(&self) -> Option<&[String]> {
        match self {
            CategoryTags::Tags(tags) => Some(tags.as_slice()),
            CategoryTags::Malformed(serde_json::Value::Null) => Some(&[] as &[String]),
            CategoryTags::Malformed(_) => None,
        }
    }
}

/// A destination as loaded from the dataset. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationRecord {
    /// Optional dataset id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Thematic tags used for weighting
    #[serde(default)]
    pub categories: CategoryTags,
    /// Card image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl DestinationRecord {
    /// Creates a record with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            categories: CategoryTags::default(),
            image_url: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category tags.
    pub fn with_categories<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = CategoryTags::Tags(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the image URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Closed set of categories that carry ranking weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Culture = 0,
    Nature = 1,
    Adventure = 2,
    Relaxation = 3,
    Gastronomy = 4,
}

impl Category {
    /// Every weighted category.
    pub const ALL: [Category; 5] = [
        Category::Culture,
        Category::Nature,
        Category::Adventure,
        Category::Relaxation,
        Category::Gastronomy,
    ];

    /// The dataset tag for this category.
    pub fn tag(self) -> &'static str {
        match self {
            Category::Culture => "culture",
            Category::Nature => "nature",
            Category::Adventure => "adventure",
            Category::Relaxation => "relaxation",
            Category::Gastronomy => "gastronomy",
        }
    }

    /// Parses a dataset tag. Tags are exact keys; anything else returns `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }
}

/// Additive weight per category, fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryWeightTable {
    weights: [f64; 5],
}

/// Weights used by the search widget.
pub static DEFAULT_WEIGHTS: CategoryWeightTable = CategoryWeightTable {
    weights: [0.30, 0.25, 0.20, 0.15, 0.10],
};

impl CategoryWeightTable {
    /// Builds a custom table from `(category, weight)` pairs; unlisted
    /// categories weigh 0. Returns `None` for negative or non-finite weights.
    pub fn custom(entries: &[(Category, f64)]) -> Option<Self> {
        let mut weights = [0.0; 5];
        for &(category, weight) in entries {
            if !weight.is_finite() || weight < 0.0 {
                return None;
            }
            weights[category as usize] = weight;
        }
        Some(Self { weights })
    }

    /// Weight of a category.
    #[inline]
    pub fn weight(&self, category: Category) -> f64 {
        self.weights[category as usize]
    }

    /// Weight of a raw dataset tag; unknown tags weigh 0.
    pub fn weight_for_tag(&self, tag: &str) -> f64 {
        Category::from_tag(tag).map_or(0.0, |c| self.weight(c))
    }

    /// Iterates over `(category, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.weight(c)))
    }
}

impl Default for CategoryWeightTable {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_weights() {
        assert_eq!(DEFAULT_WEIGHTS.weight(Category::Culture), 0.30);
        assert_eq!(DEFAULT_WEIGHTS.weight(Category::Nature), 0.25);
        assert_eq!(DEFAULT_WEIGHTS.weight(Category::Adventure), 0.20);
        assert_eq!(DEFAULT_WEIGHTS.weight(Category::Relaxation), 0.15);
        assert_eq!(DEFAULT_WEIGHTS.weight(Category::Gastronomy), 0.10);
    }

    #[test]
    fn test_unknown_tag_weighs_zero() {
        assert_eq!(DEFAULT_WEIGHTS.weight_for_tag("nightlife"), 0.0);
        assert_eq!(DEFAULT_WEIGHTS.weight_for_tag("culture"), 0.30);
    }

    #[test]
    fn test_tags_match_exactly() {
        assert_eq!(Category::from_tag("culture"), Some(Category::Culture));
        assert_eq!(Category::from_tag("Culture"), None);
        assert_eq!(Category::from_tag(" culture "), None);
        assert_eq!(DEFAULT_WEIGHTS.weight_for_tag("CULTURE"), 0.0);
    }

    #[test]
    fn test_custom_rejects_negative() {
        assert!(CategoryWeightTable::custom(&[(Category::Nature, -0.1)]).is_none());
        let table = CategoryWeightTable::custom(&[(Category::Nature, 1.0)]).unwrap();
        assert_eq!(table.weight(Category::Nature), 1.0);
        assert_eq!(table.weight(Category::Culture), 0.0);
    }

    #[test]
    fn test_record_deserialize_full() {
        let record: DestinationRecord = serde_json::from_value(json!({
            "id": 7,
            "name": "Kyoto",
            "description": "ancient temples and gardens",
            "categories": ["culture", "nature"],
            "imageUrl": "kyoto.jpg"
        }))
        .unwrap();

        assert_eq!(record.id, Some(RecordId::Number(7)));
        assert_eq!(record.image_url.as_deref(), Some("kyoto.jpg"));
        assert_eq!(record.categories.tags().unwrap().len(), 2);
    }

    #[test]
    fn test_record_minimal() {
        let record: DestinationRecord = serde_json::from_value(json!({"name": "Bora Bora"})).unwrap();
        assert!(record.description.is_none());
        assert_eq!(record.categories.tags(), Some(&[][..]));
    }

    #[test]
    fn test_record_malformed_categories_still_parses() {
        let record: DestinationRecord =
            serde_json::from_value(json!({"name": "Oddity", "categories": "culture"})).unwrap();
        assert!(record.categories.tags().is_none());

        let record: DestinationRecord =
            serde_json::from_value(json!({"name": "Nulls", "categories": null})).unwrap();
        assert_eq!(record.categories.tags(), Some(&[][..]));
    }

    #[test]
    fn test_record_requires_name() {
        let parsed = serde_json::from_value::<DestinationRecord>(json!({"description": "nameless"}));
        assert!(parsed.is_err());
    }
}
