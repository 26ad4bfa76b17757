//! Keystroke debouncing in front of the pipeline.

use crate::dataset::DatasetSource;
use crate::fuzzy::{BitapEngine, MatchEngine};
use crate::normalize::{normalize, query_len};
use crate::pipeline::{lock, Invocation, SearchPipeline};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use wayfarer_core::config::SearchConfig;

/// Whether an invocation is waiting for its delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

/// What [`SearchDebouncer::on_input`] did with an input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    /// Too short: results cleared, nothing scheduled
    Cleared,
    /// An invocation is scheduled after the delay
    Scheduled,
}

/// Collapses rapid input changes into a single pipeline invocation.
///
/// Each input cancels the pending timer. Only a value that survives the full
/// delay runs, and a run that has started is never cancelled; its rendering
/// is still subject to the presenter's sequence check.
pub struct SearchDebouncer<S, E = BitapEngine> {
    pipeline: Arc<SearchPipeline<S, E>>,
    delay: Duration,
    min_len: usize,
    pending: Mutex<Option<JoinHandle<()>>>,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
    reports: Option<UnboundedSender<Invocation>>,
}

impl<S, E> SearchDebouncer<S, E>
where
    S: DatasetSource + 'static,
    E: MatchEngine + 'static,
{
    pub fn new(pipeline: Arc<SearchPipeline<S, E>>, delay: Duration, min_len: usize) -> Self {
        Self {
            pipeline,
            delay,
            min_len,
            pending: Mutex::new(None),
            in_flight: Arc::new(Mutex::new(Vec::new())),
            reports: None,
        }
    }

    /// Debouncer using `debounce_ms` and `min_query_len` from `[search]`.
    pub fn from_config(pipeline: Arc<SearchPipeline<S, E>>, config: &SearchConfig) -> Self {
        Self::new(pipeline, Duration::from_millis(config.debounce_ms), config.min_query_len)
    }

    /// Send every completed invocation to `reports`.
    pub fn with_reports(mut self, reports: UnboundedSender<Invocation>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Handle the input's current value.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input(&self, raw: &str) -> InputDisposition {
        if let Some(timer) = lock(&self.pending).take() {
            timer.abort();
        }

        let query = normalize(raw);
        if query_len(&query) < self.min_len {
            let ticket = self.pipeline.clear();
            debug!(seq = ticket.seq(), "query too short, results cleared");
            return InputDisposition::Cleared;
        }

        let pipeline = Arc::clone(&self.pipeline);
        let in_flight = Arc::clone(&self.in_flight);
        let reports = self.reports.clone();
        let delay = self.delay;

        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let run = tokio::spawn(async move {
                let invocation = pipeline.run(&query).await;
                if let Some(reports) = reports {
                    // receiver gone means nobody is listening
                    let _ = reports.send(invocation);
                }
            });

            let mut in_flight = lock(&in_flight);
            in_flight.retain(|handle| !handle.is_finished());
            in_flight.push(run);
        });

        *lock(&self.pending) = Some(timer);
        InputDisposition::Scheduled
    }

    pub fn state(&self) -> DebounceState {
        match lock(&self.pending).as_ref() {
            Some(timer) if !timer.is_finished() => DebounceState::Pending,
            _ => DebounceState::Idle,
        }
    }

    /// Wait for the pending timer and every started invocation.
    pub async fn settle(&self) {
        let timer = lock(&self.pending).take();
        if let Some(timer) = timer {
            Self::join(timer).await;
        }

        loop {
            let handles = std::mem::take(&mut *lock(&self.in_flight));
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                Self::join(handle).await;
            }
        }
    }

    pub fn pipeline(&self) -> &Arc<SearchPipeline<S, E>> {
        &self.pipeline
    }

    async fn join(handle: JoinHandle<()>) {
        if let Err(err) = handle.await {
            if err.is_panic() {
                error!(error = %err, "search task panicked");
            }
        }
    }
}

impl<S, E> Drop for SearchDebouncer<S, E> {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.pending).take() {
            timer.abort();
        }
    }
}
