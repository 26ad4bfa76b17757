//! Result markup for the search container.
//!
//! Every state renders distinct markup so hosts and tests can tell them
//! apart: a spinner while loading, result cards, a "no results" paragraph and
//! a retry-oriented error block. Values are HTML-escaped by handlebars.

use crate::error::Result;
use crate::relevance::RankedResult;
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use wayfarer_core::config::{ConfigSchema, RenderConfig};

const LOADING_TEMPLATE: &str = r#"<div class="loading-state"><div class="loading-spinner"></div><p>{{message}}</p></div>"#;

const RESULTS_TEMPLATE: &str = concat!(
    r#"<div class="cities-recommendation">"#,
    r#"{{#each cards}}<div class="recommendation-card">"#,
    r#"<img src="{{image}}" alt="{{title}}" onerror="this.src='{{fallback_image}}'">"#,
    r#"<div class="recommendation-card-content"><h3>{{title}}</h3>"#,
    r#"<p class="score">Match: {{percent}}%</p><p>{{description}}</p></div>"#,
    r#"</div>{{/each}}</div>"#,
);

const EMPTY_TEMPLATE: &str = r#"<p class="empty">{{message}}</p>"#;

const ERROR_TEMPLATE: &str = r#"<div class="error-state"><p>{{message}}</p></div>"#;

/// Used when even the error template cannot be rendered.
pub(crate) const FALLBACK_ERROR_MARKUP: &str =
    r#"<div class="error-state"><p>Search failed. Please try again.</p></div>"#;

/// What the results container should show.
#[derive(Debug, Clone, Copy)]
pub enum RenderState<'a> {
    /// Search in progress
    Loading,
    /// Ranked results, best first
    Results(&'a [RankedResult]),
    /// Nothing passed the threshold
    Empty,
    /// The invocation failed
    Error,
}

/// A container the renderer writes into.
pub trait ResultView: Send + Sync {
    /// Replace the container's content.
    fn replace(&self, markup: String);

    /// Remove all content.
    fn clear(&self) {
        self.replace(String::new());
    }
}

/// In-memory results container.
#[derive(Debug, Default)]
pub struct MemoryView {
    markup: Mutex<String>,
    writes: AtomicUsize,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content.
    pub fn markup(&self) -> String {
        self.markup.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of replacements so far, clears included.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.markup.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

impl ResultView for MemoryView {
    fn replace(&self, markup: String) {
        *self.markup.lock().unwrap_or_else(PoisonError::into_inner) = markup;
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Serialize)]
struct Card<'a> {
    title: &'a str,
    image: &'a str,
    fallback_image: &'a str,
    percent: i64,
    description: &'a str,
}

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

/// Turns a [`RenderState`] into markup.
#[derive(Debug)]
pub struct ResultRenderer {
    registry: Handlebars<'static>,
    config: RenderConfig,
    top_n: usize,
}

impl ResultRenderer {
    /// Create a renderer showing at most `top_n` cards.
    pub fn new(config: RenderConfig, top_n: usize) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string("loading", LOADING_TEMPLATE)?;
        registry.register_template_string("results", RESULTS_TEMPLATE)?;
        registry.register_template_string("empty", EMPTY_TEMPLATE)?;
        registry.register_template_string("error", ERROR_TEMPLATE)?;

        Ok(Self {
            registry,
            config,
            top_n: top_n.max(1),
        })
    }

    /// Renderer configured from `[render]` and `search.top_n`.
    pub fn from_schema(schema: &ConfigSchema) -> Result<Self> {
        Self::new(schema.render.clone(), schema.search.top_n)
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Markup for `state`.
    pub fn markup(&self, state: &RenderState<'_>) -> Result<String> {
        let markup = match state {
            RenderState::Loading => self.registry.render(
                "loading",
                &Message { message: &self.config.loading_message },
            )?,
            RenderState::Results(results) if results.is_empty() => {
                return self.markup(&RenderState::Empty);
            }
            RenderState::Results(results) => {
                let cards: Vec<Card<'_>> = results
                    .iter()
                    .take(self.top_n)
                    .map(|r| Card {
                        title: &r.record.name,
                        image: r
                            .record
                            .image_url
                            .as_deref()
                            .filter(|url| !url.trim().is_empty())
                            .unwrap_or(&self.config.placeholder_image),
                        fallback_image: &self.config.placeholder_image,
                        percent: r.percent(),
                        description: r
                            .record
                            .description
                            .as_deref()
                            .filter(|d| !d.trim().is_empty())
                            .unwrap_or(&self.config.placeholder_description),
                    })
                    .collect();
                self.registry
                    .render("results", &serde_json::json!({ "cards": cards }))?
            }
            RenderState::Empty => self.registry.render(
                "empty",
                &Message { message: &self.config.empty_message },
            )?,
            RenderState::Error => self.registry.render(
                "error",
                &Message { message: &self.config.error_message },
            )?,
        };
        Ok(markup)
    }

    /// Error markup that cannot fail.
    pub fn error_markup(&self) -> String {
        self.markup(&RenderState::Error)
            .unwrap_or_else(|_| FALLBACK_ERROR_MARKUP.to_string())
    }

    /// Render `state` into `target`.
    pub fn render(&self, target: &dyn ResultView, state: &RenderState<'_>) -> Result<()> {
        target.replace(self.markup(state)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DestinationRecord;
    use std::sync::Arc;

    fn renderer() -> ResultRenderer {
        ResultRenderer::new(RenderConfig::default(), 2).unwrap()
    }

    fn ranked(record: DestinationRecord, total: f64) -> RankedResult {
        RankedResult {
            record: Arc::new(record),
            distance: Some(0.0),
            base: 1.0,
            total,
        }
    }

    #[test]
    fn test_loading_markup() {
        let markup = renderer().markup(&RenderState::Loading).unwrap();
        assert!(markup.contains(r#"class="loading-state""#));
        assert!(markup.contains(r#"class="loading-spinner""#));
    }

    #[test]
    fn test_results_are_capped_at_top_n() {
        let results = vec![
            ranked(DestinationRecord::new("Kyoto"), 1.35),
            ranked(DestinationRecord::new("Nara"), 1.1),
            ranked(DestinationRecord::new("Osaka"), 0.9),
        ];
        let markup = renderer().markup(&RenderState::Results(&results)).unwrap();

        assert_eq!(markup.matches(r#"class="recommendation-card""#).count(), 2);
        assert!(markup.contains("<h3>Kyoto</h3>"));
        assert!(markup.contains("<h3>Nara</h3>"));
        assert!(!markup.contains("Osaka"));
        assert!(markup.contains("Match: 135%"));
    }

    #[test]
    fn test_card_fallbacks() {
        let results = vec![ranked(DestinationRecord::new("Bali"), 0.8)];
        let markup = renderer().markup(&RenderState::Results(&results)).unwrap();

        assert!(markup.contains(r#"src="images/placeholder.png""#));
        assert!(markup.contains("this.src='images/placeholder.png'"));
        assert!(markup.contains("No description available"));
    }

    #[test]
    fn test_card_uses_record_fields() {
        let record = DestinationRecord::new("Bali")
            .with_description("rice terraces")
            .with_image_url("bali.jpg");
        let results = vec![ranked(record, 0.8)];
        let markup = renderer().markup(&RenderState::Results(&results)).unwrap();

        assert!(markup.contains(r#"src="bali.jpg""#));
        assert!(markup.contains("<p>rice terraces</p>"));
    }

    #[test]
    fn test_values_are_escaped() {
        let results = vec![ranked(DestinationRecord::new("<script>alert(1)</script>"), 0.5)];
        let markup = renderer().markup(&RenderState::Results(&results)).unwrap();
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_and_error_are_distinct() {
        let r = renderer();
        let empty = r.markup(&RenderState::Empty).unwrap();
        let error = r.markup(&RenderState::Error).unwrap();

        assert!(empty.contains(r#"class="empty""#));
        assert!(error.contains(r#"class="error-state""#));
        assert_ne!(empty, error);
        assert!(!error.contains("loading"));
    }

    #[test]
    fn test_results_without_entries_render_empty() {
        let r = renderer();
        assert_eq!(
            r.markup(&RenderState::Results(&[])).unwrap(),
            r.markup(&RenderState::Empty).unwrap()
        );
    }

    #[test]
    fn test_render_into_memory_view() {
        let view = MemoryView::new();
        renderer().render(&view, &RenderState::Empty).unwrap();
        assert!(view.markup().contains("No destinations found"));
        view.clear();
        assert!(view.is_empty());
        assert_eq!(view.writes(), 2);
    }
}
