//! Fuzzy matching algorithms and the default matching engine.
//!
//! The engine follows the Bitap family's scoring model: a field score is the
//! fraction of the pattern that had to be edited plus a proximity penalty for
//! matches far from the start of the field. Scores live in `[0, 1]`, 0 being
//! an exact match.

use crate::normalize::normalize;
use crate::record::DestinationRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;
use wayfarer_core::config::{MatchingConfig, SearchKey};

/// Calculate Levenshtein edit distance between two strings.
///
/// # Arguments
/// * `a` - First string
/// * `b` - Second string
///
/// # Returns
/// Number of single-character edits needed to transform a into b
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    // Use two rows for space optimization
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Best approximate occurrence of a pattern inside a text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occurrence {
    /// Edits needed to turn the matched slice into the pattern
    pub errors: usize,
    /// Character offset where the matched slice starts
    pub start: usize,
    /// Combined accuracy and proximity score
    pub score: f64,
}

/// Find the best-scoring approximate occurrence of `pattern` in `text`.
///
/// This is Levenshtein distance with a free starting point in the text
/// (Sellers' algorithm), tracking where each alignment starts so that the
/// proximity penalty can be applied. Returns `None` for an empty pattern.
///
/// # Arguments
/// * `text` - Text to search in
/// * `pattern` - Pattern to look for
/// * `distance` - Offset at which proximity costs a full point
pub fn best_occurrence(text: &str, pattern: &str, distance: u32) -> Option<Occurrence> {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let m = p.len();
    if m == 0 {
        return None;
    }

    let score_of = |errors: usize, start: usize| compute_score(errors, m, start, distance);

    // Column over pattern prefixes: (edits, start offset)
    let mut prev: Vec<(usize, usize)> = (0..=m).map(|i| (i, 0)).collect();
    let mut curr = vec![(0, 0); m + 1];

    let mut best = Occurrence { errors: m, start: 0, score: score_of(m, 0) };

    for j in 1..=t.len() {
        curr[0] = (0, j);
        for i in 1..=m {
            let cost = usize::from(p[i - 1] != t[j - 1]);
            let diag = (prev[i - 1].0 + cost, prev[i - 1].1);
            let skip_pattern = (curr[i - 1].0 + 1, curr[i - 1].1);
            let skip_text = (prev[i].0 + 1, prev[i].1);

            let mut cell = diag;
            if skip_pattern.0 < cell.0 {
                cell = skip_pattern;
            }
            if skip_text.0 < cell.0 {
                cell = skip_text;
            }
            curr[i] = cell;
        }

        let (errors, start) = curr[m];
        let score = score_of(errors, start);
        if score < best.score {
            best = Occurrence { errors, start, score };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    Some(best)
}

fn compute_score(errors: usize, pattern_len: usize, start: usize, distance: u32) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    if distance == 0 {
        return if start == 0 { accuracy } else { 1.0 };
    }
    accuracy + start as f64 / f64::from(distance)
}

/// Field-length norm: long fields count less than short ones.
fn field_norm(text: &str) -> f64 {
    let tokens = text.unicode_words().count().max(1) as f64;
    (1000.0 / tokens.sqrt()).round() / 1000.0
}

/// Options passed to a [`MatchEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Record fields to search
    pub keys: Vec<SearchKey>,
    /// Maximum accepted distance
    pub threshold: f64,
    /// Proximity scale, see [`best_occurrence`]
    pub distance: u32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::from(&MatchingConfig::default())
    }
}

impl From<&MatchingConfig> for MatchOptions {
    fn from(config: &MatchingConfig) -> Self {
        Self {
            keys: config.keys.clone(),
            threshold: config.threshold,
            distance: config.distance,
        }
    }
}

/// A match reported by an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMatch {
    /// Index of the record in the searched slice
    pub index: usize,
    /// Distance in `[0, 1]`, if the engine computed one
    pub distance: Option<f64>,
}

/// Failure inside a matching engine.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

/// An approximate string matching capability.
///
/// Implementations receive an already-normalized query and report matching
/// record indices, best match first.
pub trait MatchEngine: Send + Sync {
    /// Search `records` for `query`.
    fn search(
        &self,
        query: &str,
        records: &[Arc<DestinationRecord>],
        options: &MatchOptions,
    ) -> Result<Vec<RawMatch>, EngineError>;
}

/// Default engine: approximate substring scoring per field.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitapEngine;

impl BitapEngine {
    /// Distance of one record, or `None` when no field matched.
    pub fn score_record(record: &DestinationRecord, pattern: &str, options: &MatchOptions) -> Option<f64> {
        let mut total = 1.0;
        let mut matched = false;

        for key in &options.keys {
            for value in field_values(record, *key) {
                let text = normalize(value);
                let score = if text == pattern {
                    Some(0.0)
                } else {
                    best_occurrence(&text, pattern, options.distance)
                        .map(|o| o.score)
                        .filter(|s| *s <= options.threshold)
                };

                if let Some(score) = score {
                    matched = true;
                    total *= score.max(f64::EPSILON).powf(field_norm(&text));
                }
            }
        }

        matched.then_some(total)
    }
}

impl MatchEngine for BitapEngine {
    fn search(
        &self,
        query: &str,
        records: &[Arc<DestinationRecord>],
        options: &MatchOptions,
    ) -> Result<Vec<RawMatch>, EngineError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        if !options.threshold.is_finite() {
            return Err(EngineError(format!("threshold {} is not finite", options.threshold)));
        }

        let score = |(index, record): (usize, &Arc<DestinationRecord>)| {
            Self::score_record(record, query, options).map(|d| RawMatch { index, distance: Some(d) })
        };

        #[cfg(feature = "parallel")]
        let mut matches: Vec<RawMatch> = {
            use rayon::prelude::*;
            records.par_iter().enumerate().filter_map(score).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let mut matches: Vec<RawMatch> = records.iter().enumerate().filter_map(score).collect();

        // Stable: equal distances keep dataset order
        matches.sort_by(|a, b| {
            let a = a.distance.unwrap_or(1.0);
            let b = b.distance.unwrap_or(1.0);
            a.total_cmp(&b)
        });

        Ok(matches)
    }
}

fn field_values(record: &DestinationRecord, key: SearchKey) -> Vec<&str> {
    match key {
        SearchKey::Name => vec![record.name.as_str()],
        SearchKey::Description => record.description.as_deref().into_iter().collect(),
        SearchKey::Categories => record
            .categories
            .tags()
            .map(|tags| tags.iter().map(String::as_str).collect())
            .unwrap_or_default(),
    }
}
