//! Adapter over a [`MatchEngine`] that enforces the matching contract.

use crate::error::{Result, SearchError};
use crate::fuzzy::{BitapEngine, MatchEngine, MatchOptions};
use crate::record::DestinationRecord;
use std::sync::Arc;
use tracing::debug;
use wayfarer_core::config::MatchingConfig;

/// A record that matched the current query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// The matched record
    pub record: Arc<DestinationRecord>,
    /// Raw distance in `[0, 1]` (lower is better), if known
    pub distance: Option<f64>,
}

/// Produces threshold-filtered candidates for a normalized query.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher<E = BitapEngine> {
    engine: E,
    options: MatchOptions,
}

impl FuzzyMatcher<BitapEngine> {
    /// Matcher over the default engine.
    pub fn new(options: MatchOptions) -> Self {
        Self::with_engine(BitapEngine, options)
    }

    /// Matcher configured from the `[matching]` section.
    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(MatchOptions::from(config))
    }
}

impl Default for FuzzyMatcher<BitapEngine> {
    fn default() -> Self {
        Self::new(MatchOptions::default())
    }
}

impl<E: MatchEngine> FuzzyMatcher<E> {
    /// Matcher over a custom engine.
    pub fn with_engine(engine: E, options: MatchOptions) -> Self {
        Self { engine, options }
    }

    /// Active options.
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Match `query` against `records`.
    ///
    /// Candidates whose distance exceeds the threshold are dropped; a NaN
    /// distance is reported as unknown. Order follows the engine.
    pub fn matches(&self, query: &str, records: &[Arc<DestinationRecord>]) -> Result<Vec<MatchCandidate>> {
        if query.is_empty() || records.is_empty() {
            return Ok(Vec::new());
        }

        let raw = self
            .engine
            .search(query, records, &self.options)
            .map_err(|e| SearchError::MatchFailure(e.to_string()))?;

        let mut candidates = Vec::with_capacity(raw.len());
        for m in raw {
            let record = records.get(m.index).ok_or_else(|| {
                SearchError::MatchFailure(format!(
                    "engine reported record {} of {}",
                    m.index,
                    records.len()
                ))
            })?;

            let distance = m.distance.filter(|d| !d.is_nan()).map(|d| d.clamp(0.0, 1.0));
            if distance.is_some_and(|d| d > self.options.threshold) {
                continue;
            }

            candidates.push(MatchCandidate {
                record: Arc::clone(record),
                distance,
            });
        }

        debug!(query, candidates = candidates.len(), "fuzzy match complete");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::{EngineError, RawMatch};
    use proptest::prelude::*;

    struct Scripted(Vec<RawMatch>);

    impl MatchEngine for Scripted {
        fn search(&self, _: &str, _: &[Arc<DestinationRecord>], _: &MatchOptions) -> std::result::Result<Vec<RawMatch>, EngineError> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl MatchEngine for Broken {
        fn search(&self, _: &str, _: &[Arc<DestinationRecord>], _: &MatchOptions) -> std::result::Result<Vec<RawMatch>, EngineError> {
            Err(EngineError("index corrupted".to_string()))
        }
    }

    fn dataset(names: &[&str]) -> Vec<Arc<DestinationRecord>> {
        names.iter().map(|n| Arc::new(DestinationRecord::new(*n))).collect()
    }

    #[test]
    fn test_kyoto_typo_survives_threshold() {
        let records = vec![Arc::new(
            DestinationRecord::new("Kyoto")
                .with_description("ancient temples and gardens")
                .with_categories(["culture", "nature"]),
        )];

        let candidates = FuzzyMatcher::default().matches("kioto", &records).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].record.name, "Kyoto");
        assert!(candidates[0].distance.unwrap() <= 0.4);
    }

    #[test]
    fn test_no_candidates_for_unrelated_query() {
        let records = dataset(&["Kyoto", "Bali", "Machu Picchu"]);
        assert!(FuzzyMatcher::default().matches("zzzzz", &records).unwrap().is_empty());
    }

    #[test]
    fn test_empty_query_is_not_an_error() {
        let records = dataset(&["Kyoto"]);
        assert!(FuzzyMatcher::default().matches("", &records).unwrap().is_empty());
    }

    #[test]
    fn test_filters_engine_results_beyond_threshold() {
        let engine = Scripted(vec![
            RawMatch { index: 0, distance: Some(0.1) },
            RawMatch { index: 1, distance: Some(0.9) },
            RawMatch { index: 2, distance: None },
            RawMatch { index: 1, distance: Some(f64::NAN) },
        ]);
        let matcher = FuzzyMatcher::with_engine(engine, MatchOptions::default());

        let candidates = matcher.matches("abc", &dataset(&["a", "b", "c"])).unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.record.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
        assert_eq!(candidates[1].distance, None);
        assert_eq!(candidates[2].distance, None);
    }

    #[test]
    fn test_engine_failure_is_match_failure() {
        let matcher = FuzzyMatcher::with_engine(Broken, MatchOptions::default());
        let err = matcher.matches("kyoto", &dataset(&["Kyoto"])).unwrap_err();
        assert!(matches!(err, SearchError::MatchFailure(_)));
    }

    #[test]
    fn test_out_of_range_index_is_match_failure() {
        let engine = Scripted(vec![RawMatch { index: 5, distance: Some(0.0) }]);
        let matcher = FuzzyMatcher::with_engine(engine, MatchOptions::default());
        assert!(matcher.matches("kyoto", &dataset(&["Kyoto"])).is_err());
    }

    proptest! {
        #[test]
        fn prop_candidates_within_threshold(
            names in proptest::collection::vec("[a-z ]{1,12}", 1..20),
            query in "[a-z]{3,6}",
        ) {
            let records: Vec<Arc<DestinationRecord>> =
                names.into_iter().map(|n| Arc::new(DestinationRecord::new(n))).collect();
            let candidates = FuzzyMatcher::default().matches(&query, &records).unwrap();
            for c in candidates {
                prop_assert!(c.distance.map_or(true, |d| d <= 0.4));
            }
        }
    }
}
