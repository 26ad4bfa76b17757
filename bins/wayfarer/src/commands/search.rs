//! Search command - rank destinations for one query

use anyhow::{bail, Result};
use console::Term;
use std::sync::Arc;
use wayfarer_cli::output::{format_count, format_duration, print_results, Status};
use wayfarer_cli::progress;
use wayfarer_core::config::Config;
use wayfarer_search::{normalize, query_len, MemoryView, Outcome};
use wayfarer_telemetry::{metrics, names, Timer};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
    Html,
}

impl Format {
    pub fn from_flags(json: bool, html: bool) -> Self {
        match (json, html) {
            (true, _) => Format::Json,
            (false, true) => Format::Html,
            _ => Format::Text,
        }
    }
}

/// Run search command
pub async fn run(config: &Config, query: &str, format: Format, all: bool) -> Result<()> {
    let schema = &config.schema;
    let normalized = normalize(query);
    if query_len(&normalized) < schema.search.min_query_len {
        Status::warning(&format!(
            "Query \"{}\" is shorter than {} characters; the widget clears results instead of searching",
            normalized, schema.search.min_query_len
        ));
        return Ok(());
    }

    let view = Arc::new(MemoryView::new());
    let pipeline = super::pipeline(schema, view.clone())?;
    metrics().increment(names::INVOCATIONS);

    if format == Format::Html {
        let invocation = pipeline.run(&normalized).await;
        metrics().histogram(names::LATENCY_MS, invocation.elapsed.as_secs_f64() * 1000.0);
        println!("{}", view.markup());
        if let Outcome::Failed(code) = invocation.outcome {
            metrics().increment(names::FAILURES);
            bail!("search failed (code {})", code as u32);
        }
        return Ok(());
    }

    let spinner = (format == Format::Text && Term::stdout().is_term())
        .then(|| progress::spinner(&format!("Searching {}...", schema.dataset.location)));
    let timer = Timer::start(names::LATENCY_MS);
    let outcome = pipeline.search(&normalized).await;
    let elapsed = timer.stop();

    let results = match outcome {
        Ok(results) => {
            if let Some(pb) = &spinner {
                progress::finish_success(pb, &format_count(results.len(), "match", "matches"));
            }
            results
        }
        Err(e) => {
            metrics().increment(names::FAILURES);
            if let Some(pb) = &spinner {
                progress::finish_error(pb, "search failed");
            }
            return Err(e.into());
        }
    };

    let shown = if all { results.len() } else { schema.search.top_n.min(results.len()) };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&results[..shown])?),
        _ if results.is_empty() => Status::info(&schema.render.empty_message),
        _ => {
            Status::header(&format!("Results for \"{}\"", normalized));
            print_results(&results[..shown], schema.search.top_n);
            if shown < results.len() {
                Status::info(&format!(
                    "{} more (use --all)",
                    format_count(results.len() - shown, "candidate", "candidates")
                ));
            }
            tracing::info!(elapsed = %format_duration(elapsed), "search complete");
        }
    }

    Ok(())
}
