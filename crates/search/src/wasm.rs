//! WASM bindings for search utilities.

use crate::dataset::Dataset;
use crate::matcher::FuzzyMatcher;
use crate::record::DEFAULT_WEIGHTS;
use crate::relevance::{rank, RankedResult};
use crate::render::{RenderState, ResultRenderer};
use serde::Serialize;
use tracing::error;
use wasm_bindgen::prelude::*;
use wayfarer_core::config::{DatasetConfig, RenderConfig, SearchConfig};

/// Normalize a raw query the way the search pipeline does.
#[wasm_bindgen]
pub fn normalize_query(raw: &str) -> String {
    crate::normalize(raw)
}

/// Calculate Levenshtein edit distance between two strings.
#[wasm_bindgen]
pub fn edit_distance(a: &str, b: &str) -> usize {
    crate::levenshtein_distance(a, b)
}

#[derive(Serialize)]
struct RankedJson<'a> {
    id: Option<String>,
    name: &'a str,
    distance: Option<f64>,
    score: f64,
    percent: i64,
}

fn ranked(query: &str, dataset_json: &str) -> crate::Result<Vec<RankedResult>> {
    let dataset = Dataset::from_json(dataset_json, &DatasetConfig::default().groups)?;
    let candidates = FuzzyMatcher::default().matches(&crate::normalize(query), dataset.records())?;
    Ok(rank(candidates, &DEFAULT_WEIGHTS))
}

/// Rank destinations and return them as JSON.
///
/// # Arguments
/// * `query` - Raw search query
/// * `dataset_json` - Dataset document (object of groups)
/// * `max_results` - Maximum results to return (0 for all)
///
/// # Returns
/// JSON array of `{id, name, distance, score, percent}`, best first
#[wasm_bindgen]
pub fn rank_destinations(query: &str, dataset_json: &str, max_results: usize) -> Result<String, JsError> {
    let results = ranked(query, dataset_json)?;
    let limit = if max_results == 0 { results.len() } else { max_results };

    let out: Vec<RankedJson<'_>> = results
        .iter()
        .take(limit)
        .map(|r| RankedJson {
            id: r.record.id.as_ref().map(ToString::to_string),
            name: &r.record.name,
            distance: r.distance,
            score: r.total,
            percent: r.percent(),
        })
        .collect();

    Ok(serde_json::to_string(&out)?)
}

/// Results markup for `query`, as the widget would render it.
#[wasm_bindgen]
pub fn render_results(query: &str, dataset_json: &str) -> Result<String, JsError> {
    let renderer = ResultRenderer::new(RenderConfig::default(), SearchConfig::default().top_n)?;
    let markup = match ranked(query, dataset_json) {
        Ok(results) if results.is_empty() => renderer.markup(&RenderState::Empty)?,
        Ok(results) => renderer.markup(&RenderState::Results(&results))?,
        Err(err) => {
            error!(code = ?err.code(), error = %err, "ranking failed, showing error state");
            renderer.error_markup()
        }
    };
    Ok(markup)
}
