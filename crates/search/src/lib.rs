//! Destination search and ranking for Wayfarer.
//!
//! This crate provides:
//! - Session-cached dataset loading from files, HTTP or memory
//! - Query normalization (case, accents, whitespace)
//! - Approximate substring matching with a pluggable engine
//! - Additive relevance scoring with category weights
//! - Debounced, last-result-wins rendering into a results container
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wayfarer_core::config::ConfigSchema;
//! use wayfarer_search::{MemoryPage, MemoryView, SearchWidget, StaticSource};
//!
//! # async fn demo() -> wayfarer_search::Result<()> {
//! let view = Arc::new(MemoryView::new());
//! let page = MemoryPage::new(view.clone()).with_input("#Research");
//!
//! let source = StaticSource::new(r#"{"temples": [{"name": "Kyoto"}]}"#);
//! let mut widget = SearchWidget::new(ConfigSchema::default(), source);
//! widget.setup(&page)?;
//! widget.on_input("kioto");
//! # Ok(())
//! # }
//! ```

mod dataset;
mod debounce;
mod error;
mod fuzzy;
mod matcher;
mod normalize;
mod pipeline;
mod record;
mod relevance;
mod render;
mod widget;

#[cfg(feature = "wasm")]
mod wasm;

pub use dataset::{AnySource, Dataset, DatasetAccess, DatasetLocation, DatasetSource, GroupSummary, StaticSource};
#[cfg(feature = "file")]
pub use dataset::FileSource;
#[cfg(feature = "http")]
pub use dataset::HttpSource;
pub use debounce::{DebounceState, InputDisposition, SearchDebouncer};
pub use error::{Result, SearchError, SearchErrorCode};
pub use fuzzy::{best_occurrence, levenshtein_distance, BitapEngine, EngineError, MatchEngine, MatchOptions, Occurrence, RawMatch};
pub use matcher::{FuzzyMatcher, MatchCandidate};
pub use normalize::{normalize, query_len};
pub use pipeline::{Invocation, Outcome, Presenter, SearchPipeline, Ticket};
pub use record::{Category, CategoryTags, CategoryWeightTable, DestinationRecord, RecordId, DEFAULT_WEIGHTS};
pub use relevance::{base_score, rank, score, RankedResult};
pub use render::{MemoryView, RenderState, ResultRenderer, ResultView};
pub use widget::{MemoryPage, Mount, Page, SearchWidget, SetupOutcome};
