//! CLI command implementations

pub mod config;
pub mod dataset;
pub mod search;
pub mod watch;

use anyhow::Result;
use std::sync::Arc;
use wayfarer_core::config::ConfigSchema;
use wayfarer_search::{AnySource, DatasetAccess, FuzzyMatcher, Presenter, ResultRenderer, ResultView, SearchPipeline};

/// Pipeline over the configured dataset, rendering into `view`.
pub fn pipeline(schema: &ConfigSchema, view: Arc<dyn ResultView>) -> Result<SearchPipeline<AnySource>> {
    Ok(SearchPipeline::new(
        dataset_access(schema)?,
        FuzzyMatcher::from_config(&schema.matching),
        Presenter::new(ResultRenderer::from_schema(schema)?, view),
    ))
}

/// Dataset access for the configured location and groups.
pub fn dataset_access(schema: &ConfigSchema) -> Result<DatasetAccess<AnySource>> {
    let source = AnySource::from_config(&schema.dataset)?;
    Ok(DatasetAccess::new(source, schema.dataset.groups.clone()))
}
