//! Relevance scoring for search results.
//!
//! The final score is additive and deliberately unnormalized:
//!
//! ```text
//! total = (1 - distance) + Σ weight(category)
//! ```
//!
//! A destination carrying several weighted categories can outrank one with a
//! closer lexical match, which surfaces thematically rich destinations first.
//! Totals may therefore exceed 1.

use crate::error::{Result, SearchError};
use crate::matcher::MatchCandidate;
use crate::record::{Category, CategoryWeightTable, DestinationRecord};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// A candidate with its final score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    /// The matched record
    pub record: Arc<DestinationRecord>,
    /// Raw distance reported by the matcher
    pub distance: Option<f64>,
    /// Inverted distance in `[0, 1]`
    pub base: f64,
    /// Base plus category weights
    pub total: f64,
}

impl RankedResult {
    /// Score as a whole percentage, as shown on result cards.
    pub fn percent(&self) -> i64 {
        (self.total * 100.0).round() as i64
    }
}

/// Invert a raw distance into a quality measure.
///
/// A missing (or NaN) distance is treated as the worst case.
#[inline]
pub fn base_score(distance: Option<f64>) -> f64 {
    let distance = distance.filter(|d| !d.is_nan()).unwrap_or(1.0).clamp(0.0, 1.0);
    1.0 - distance
}

/// Score a single candidate.
///
/// Each distinct recognised category adds its weight once; unknown tags add
/// nothing. Fails when the category data is malformed or the total is not
/// finite.
pub fn score(candidate: &MatchCandidate, weights: &CategoryWeightTable) -> Result<f64> {
    let record = &candidate.record;
    let tags = record
        .categories
        .tags()
        .ok_or_else(|| SearchError::score(&record.name, "categories is not a list of strings"))?;

    let mut seen = [false; Category::ALL.len()];
    let mut bonus = 0.0;
    for category in tags.iter().filter_map(|t| Category::from_tag(t)) {
        if !seen[category as usize] {
            seen[category as usize] = true;
            bonus += weights.weight(category);
        }
    }

    let total = base_score(candidate.distance) + bonus;
    if !total.is_finite() {
        return Err(SearchError::score(&record.name, format!("total {total} is not finite")));
    }
    Ok(total)
}

/// Score and order candidates, best first.
///
/// A candidate that fails to score is logged and ranked with a score of 0
/// rather than dropping the whole list. Ties keep the matcher's order.
pub fn rank(candidates: Vec<MatchCandidate>, weights: &CategoryWeightTable) -> Vec<RankedResult> {
    let mut results: Vec<RankedResult> = candidates
        .into_iter()
        .map(|candidate| {
            let total = match score(&candidate, weights) {
                Ok(total) => total,
                Err(err) => {
                    warn!(error = %err, "scoring failed, ranking candidate with 0");
                    0.0
                }
            };
            RankedResult {
                base: base_score(candidate.distance),
                distance: candidate.distance,
                record: candidate.record,
                total,
            }
        })
        .collect();

    results.sort_by(|a, b| b.total.total_cmp(&a.total));
    results
}
