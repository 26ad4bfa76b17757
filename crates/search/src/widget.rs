//! Attaching the search pipeline to a page.
//!
//! The host supplies a [`Page`] that can look up the search input and the
//! results container. [`SearchWidget::setup`] wires everything once; later
//! calls are no-ops.

use crate::dataset::{DatasetAccess, DatasetSource};
use crate::debounce::{InputDisposition, SearchDebouncer};
use crate::error::{Result, SearchError};
use crate::fuzzy::{BitapEngine, MatchEngine, MatchOptions};
use crate::matcher::FuzzyMatcher;
use crate::pipeline::{lock, Invocation, Presenter, SearchPipeline};
use crate::render::{MemoryView, ResultRenderer, ResultView};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use wayfarer_core::config::ConfigSchema;

/// Where a newly created results container goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    /// Inside the page's main content region
    MainRegion,
    /// Right after the search input
    AfterInput,
}

/// Element lookups the widget needs from its host page.
pub trait Page {
    type View: ResultView + 'static;

    /// First selector that matches a text input, if any.
    fn find_input(&self, selectors: &[String]) -> Option<String>;

    /// An existing results container matching one of `selectors`.
    fn find_results(&self, selectors: &[String]) -> Option<Arc<Self::View>>;

    /// Whether the page has a main content region.
    fn has_main_region(&self) -> bool;

    /// Create and attach an empty results container.
    fn create_results(&self, mount: Mount) -> Arc<Self::View>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    Initialized,
    AlreadyInitialized,
}

/// Owns the pipeline and its one-time page setup.
pub struct SearchWidget<S, E = BitapEngine> {
    schema: ConfigSchema,
    parts: Option<(S, E)>,
    debouncer: Option<Arc<SearchDebouncer<S, E>>>,
    reports: Option<UnboundedSender<Invocation>>,
}

impl<S: DatasetSource + 'static> SearchWidget<S, BitapEngine> {
    pub fn new(schema: ConfigSchema, source: S) -> Self {
        Self::with_engine(schema, source, BitapEngine)
    }
}

impl<S, E> SearchWidget<S, E>
where
    S: DatasetSource + 'static,
    E: MatchEngine + 'static,
{
    /// Widget over a custom matching engine.
    pub fn with_engine(schema: ConfigSchema, source: S, engine: E) -> Self {
        Self {
            schema,
            parts: Some((source, engine)),
            debouncer: None,
            reports: None,
        }
    }

    /// Forward completed invocations to `reports` once set up.
    pub fn with_reports(mut self, reports: UnboundedSender<Invocation>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Wire the pipeline to `page`.
    ///
    /// Idempotent. Fails with [`SearchError::InputNotFound`] when no input
    /// selector matches, leaving the widget uninitialized so a later call can
    /// retry.
    pub fn setup<P: Page>(&mut self, page: &P) -> Result<SetupOutcome> {
        if self.debouncer.is_some() {
            debug!("search widget already initialized");
            return Ok(SetupOutcome::AlreadyInitialized);
        }

        let selectors = &self.schema.page.input_selectors;
        let input = page.find_input(selectors).ok_or_else(|| {
            warn!(selectors = ?selectors, "search input not found");
            SearchError::InputNotFound(selectors.join(", "))
        })?;

        let view = match page.find_results(&self.schema.page.results_selectors) {
            Some(view) => view,
            None => {
                let mount = if page.has_main_region() {
                    Mount::MainRegion
                } else {
                    Mount::AfterInput
                };
                debug!(?mount, "creating results container");
                page.create_results(mount)
            }
        };

        let renderer = ResultRenderer::from_schema(&self.schema)?;
        let Some((source, engine)) = self.parts.take() else {
            return Ok(SetupOutcome::AlreadyInitialized);
        };

        let pipeline = SearchPipeline::new(
            DatasetAccess::new(source, self.schema.dataset.groups.clone()),
            FuzzyMatcher::with_engine(engine, MatchOptions::from(&self.schema.matching)),
            Presenter::new(renderer, view),
        );

        let mut debouncer = SearchDebouncer::from_config(Arc::new(pipeline), &self.schema.search);
        if let Some(reports) = self.reports.take() {
            debouncer = debouncer.with_reports(reports);
        }
        self.debouncer = Some(Arc::new(debouncer));

        info!(input = %input, "search widget initialized");
        Ok(SetupOutcome::Initialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.debouncer.is_some()
    }

    pub fn debouncer(&self) -> Option<&Arc<SearchDebouncer<S, E>>> {
        self.debouncer.as_ref()
    }

    /// Forward an input change; `None` before setup.
    pub fn on_input(&self, raw: &str) -> Option<InputDisposition> {
        self.debouncer.as_ref().map(|d| d.on_input(raw))
    }

    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }
}

/// A page described in memory.
///
/// Lists which input and results selectors exist and hands out a single
/// shared view for the results container.
#[derive(Debug)]
pub struct MemoryPage<V = MemoryView> {
    inputs: Vec<String>,
    results: Vec<String>,
    main_region: bool,
    view: Arc<V>,
    mounted: Mutex<Option<Mount>>,
}

impl<V: ResultView + 'static> MemoryPage<V> {
    pub fn new(view: Arc<V>) -> Self {
        Self {
            inputs: Vec::new(),
            results: Vec::new(),
            main_region: false,
            view,
            mounted: Mutex::new(None),
        }
    }

    /// Add an input matched by `selector`.
    pub fn with_input(mut self, selector: impl Into<String>) -> Self {
        self.inputs.push(selector.into());
        self
    }

    /// Add an existing results container matched by `selector`.
    pub fn with_results(mut self, selector: impl Into<String>) -> Self {
        self.results.push(selector.into());
        self
    }

    pub fn with_main_region(mut self) -> Self {
        self.main_region = true;
        self
    }

    /// Where the widget created its container, if it did.
    pub fn mounted(&self) -> Option<Mount> {
        *lock(&self.mounted)
    }

    pub fn view(&self) -> &Arc<V> {
        &self.view
    }
}

impl<V: ResultView + 'static> Page for MemoryPage<V> {
    type View = V;

    fn find_input(&self, selectors: &[String]) -> Option<String> {
        selectors.iter().find(|s| self.inputs.contains(s)).cloned()
    }

    fn find_results(&self, selectors: &[String]) -> Option<Arc<V>> {
        selectors
            .iter()
            .any(|s| self.results.contains(s))
            .then(|| Arc::clone(&self.view))
    }

    fn has_main_region(&self) -> bool {
        self.main_region
    }

    fn create_results(&self, mount: Mount) -> Arc<V> {
        *lock(&self.mounted) = Some(mount);
        Arc::clone(&self.view)
    }
}
