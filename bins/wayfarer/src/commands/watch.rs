//! Watch command - interactive, debounced search session
//!
//! Each stdin line is treated as the input's new value. Lines that arrive
//! faster than the debounce delay collapse into one search, exactly as
//! keystrokes do in the browser.

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use wayfarer_cli::output::{format_duration, Status};
use wayfarer_cli::view::{TerminalView, ViewMode};
use wayfarer_core::config::Config;
use wayfarer_search::{AnySource, Invocation, MemoryPage, Outcome, SearchWidget};
use wayfarer_telemetry::{metrics, names};

/// Run watch command
pub async fn run(config: &Config, html: bool) -> Result<()> {
    let mode = if html { ViewMode::Html } else { ViewMode::Text };
    let view = Arc::new(TerminalView::stdout(mode));

    let input = config
        .schema
        .page
        .input_selectors
        .first()
        .cloned()
        .unwrap_or_else(|| "#Research".to_string());
    let page = MemoryPage::new(view).with_input(input).with_main_region();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let source = AnySource::from_config(&config.schema.dataset)?;
    let mut widget = SearchWidget::new(config.schema.clone(), source).with_reports(tx);
    widget.setup(&page)?;

    Status::info(&format!(
        "Type a destination and press Enter ({}ms debounce, Ctrl-D to quit)",
        config.schema.search.debounce_ms
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    widget.on_input(&line);
                }
                None => break,
            },
            Some(invocation) = rx.recv() => record(&invocation),
        }
    }

    if let Some(debouncer) = widget.debouncer() {
        debouncer.settle().await;
    }
    while let Ok(invocation) = rx.try_recv() {
        record(&invocation);
    }

    Ok(())
}

fn record(invocation: &Invocation) {
    let registry = metrics();
    registry.increment(names::INVOCATIONS);
    registry.histogram(names::LATENCY_MS, invocation.elapsed.as_secs_f64() * 1000.0);
    if !invocation.rendered {
        registry.increment(names::STALE_DISCARDED);
    }
    if let Outcome::Failed(code) = invocation.outcome {
        registry.increment(names::FAILURES);
        tracing::warn!(query = %invocation.query, code = code as u32, "search failed");
    }
    tracing::info!(
        seq = invocation.seq,
        query = %invocation.query,
        elapsed = %format_duration(invocation.elapsed),
        "search finished"
    );
}
