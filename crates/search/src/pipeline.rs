//! One search invocation, end to end.
//!
//! `SearchPipeline::run` renders Loading, loads the dataset, matches, ranks and
//! renders the outcome. Every rendering goes through the [`Presenter`], which
//! stamps it with a sequence number and discards anything older than what is
//! already on screen.

use crate::dataset::{DatasetAccess, DatasetSource};
use crate::error::{Result, SearchErrorCode};
use crate::fuzzy::{BitapEngine, MatchEngine};
use crate::matcher::FuzzyMatcher;
use crate::normalize::normalize;
use crate::record::{CategoryWeightTable, DEFAULT_WEIGHTS};
use crate::relevance::{rank, RankedResult};
use crate::render::{RenderState, ResultRenderer, ResultView};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sequence number reserved for one rendering cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Serializes renderings into the results container.
///
/// Tickets are issued in increasing order. A rendering is applied only if its
/// ticket is not older than the last one applied, so a slow invocation can
/// never overwrite a newer one.
pub struct Presenter {
    renderer: ResultRenderer,
    view: Arc<dyn ResultView>,
    next_seq: AtomicU64,
    last_rendered: Mutex<u64>,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("next_seq", &self.next_seq)
            .field("last_rendered", &self.last_rendered)
            .finish_non_exhaustive()
    }
}

impl Presenter {
    pub fn new(renderer: ResultRenderer, view: Arc<dyn ResultView>) -> Self {
        Self {
            renderer,
            view,
            next_seq: AtomicU64::new(0),
            last_rendered: Mutex::new(0),
        }
    }

    /// Reserve the next sequence number.
    pub fn issue(&self) -> Ticket {
        Ticket(self.next_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Render `state` unless a newer ticket has already rendered.
    ///
    /// Returns whether the container was updated. A template failure falls
    /// back to the error markup so the container never keeps a stale Loading.
    pub fn present(&self, ticket: Ticket, state: &RenderState<'_>) -> bool {
        let markup = self.renderer.markup(state).unwrap_or_else(|err| {
            error!(error = %err, "render failed, showing error state");
            self.renderer.error_markup()
        });
        self.apply(ticket, |view| view.replace(markup))
    }

    /// Empty the container unless a newer ticket has already rendered.
    pub fn clear(&self, ticket: Ticket) -> bool {
        self.apply(ticket, |view| view.clear())
    }

    /// Sequence number of the rendering currently on screen (0 before any).
    pub fn last_rendered(&self) -> u64 {
        *lock(&self.last_rendered)
    }

    pub fn renderer(&self) -> &ResultRenderer {
        &self.renderer
    }

    fn apply(&self, ticket: Ticket, write: impl FnOnce(&dyn ResultView)) -> bool {
        let mut last = lock(&self.last_rendered);
        if ticket.0 < *last {
            debug!(seq = ticket.0, last = *last, "discarding stale rendering");
            return false;
        }
        write(self.view.as_ref());
        *last = ticket.0;
        true
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Ranked results, with their count
    Results(usize),
    /// Nothing matched
    Empty,
    /// Aborted with an error
    Failed(SearchErrorCode),
}

/// Report of one completed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Ticket sequence number
    pub seq: u64,
    /// Normalized query
    pub query: String,
    /// What happened
    pub outcome: Outcome,
    /// False when the final rendering was discarded as stale
    pub rendered: bool,
    /// Time from start to final rendering
    pub elapsed: Duration,
}

/// Dataset access, matching, ranking and presentation wired together.
#[derive(Debug)]
pub struct SearchPipeline<S, E = BitapEngine> {
    dataset: DatasetAccess<S>,
    matcher: FuzzyMatcher<E>,
    weights: CategoryWeightTable,
    presenter: Presenter,
}

impl<S: DatasetSource, E: MatchEngine> SearchPipeline<S, E> {
    pub fn new(dataset: DatasetAccess<S>, matcher: FuzzyMatcher<E>, presenter: Presenter) -> Self {
        Self {
            dataset,
            matcher,
            weights: DEFAULT_WEIGHTS,
            presenter,
        }
    }

    /// Replace the category weights.
    pub fn with_weights(mut self, weights: CategoryWeightTable) -> Self {
        self.weights = weights;
        self
    }

    /// Load, match and rank without touching the container.
    pub async fn search(&self, query: &str) -> Result<Vec<RankedResult>> {
        let query = normalize(query);
        let dataset = self.dataset.load_all().await?;
        let candidates = self.matcher.matches(&query, dataset.records())?;
        Ok(rank(candidates, &self.weights))
    }

    /// Run a full invocation: Loading, then Results, Empty or Error.
    pub async fn run(&self, query: &str) -> Invocation {
        let started = Instant::now();
        let ticket = self.presenter.issue();
        let query = normalize(query);
        debug!(seq = ticket.seq(), query = %query, "search started");
        self.presenter.present(ticket, &RenderState::Loading);

        let (outcome, rendered) = match self.search(&query).await {
            Ok(results) if results.is_empty() => {
                (Outcome::Empty, self.presenter.present(ticket, &RenderState::Empty))
            }
            Ok(results) => (
                Outcome::Results(results.len()),
                self.presenter.present(ticket, &RenderState::Results(&results)),
            ),
            Err(err) => {
                error!(seq = ticket.seq(), query = %query, error = %err, "search failed");
                (
                    Outcome::Failed(err.code()),
                    self.presenter.present(ticket, &RenderState::Error),
                )
            }
        };

        Invocation {
            seq: ticket.seq(),
            query,
            outcome,
            rendered,
            elapsed: started.elapsed(),
        }
    }

    /// Clear the container under a fresh ticket, so in-flight results are dropped.
    pub fn clear(&self) -> Ticket {
        let ticket = self.presenter.issue();
        self.presenter.clear(ticket);
        ticket
    }

    pub fn dataset(&self) -> &DatasetAccess<S> {
        &self.dataset
    }

    pub fn matcher(&self) -> &FuzzyMatcher<E> {
        &self.matcher
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }
}
