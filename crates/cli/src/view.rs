//! Results container that mirrors renderings to the terminal.

use console::Term;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use wayfarer_search::ResultView;

/// How a [`TerminalView`] prints each rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Text content with tags stripped
    Text,
    /// Raw markup
    Html,
}

/// Prints every rendering it receives and remembers the latest one.
pub struct TerminalView {
    term: Term,
    mode: ViewMode,
    markup: Mutex<String>,
    renders: AtomicUsize,
}

impl TerminalView {
    /// A view writing to stdout.
    pub fn stdout(mode: ViewMode) -> Self {
        Self {
            term: Term::stdout(),
            mode,
            markup: Mutex::new(String::new()),
            renders: AtomicUsize::new(0),
        }
    }

    /// The latest markup.
    pub fn markup(&self) -> String {
        self.markup.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of renderings received, clears included.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl ResultView for TerminalView {
    fn replace(&self, markup: String) {
        let n = self.renders.fetch_add(1, Ordering::SeqCst) + 1;
        let body = match self.mode {
            _ if markup.is_empty() => "(cleared)".to_string(),
            ViewMode::Text => markup_text(&markup),
            ViewMode::Html => markup.clone(),
        };
        // a closed stdout only loses the echo
        let _ = self.term.write_line(&format!("[{n}] {}", body));
        *self.markup.lock().unwrap_or_else(PoisonError::into_inner) = markup;
    }
}

/// Text content of rendered markup: tags become separators, entities are
/// decoded, whitespace collapses.
pub fn markup_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x3D;", "=")
        .replace("&#x60;", "`")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_text_strips_tags() {
        let markup = r#"<div class="cities-recommendation"><div class="recommendation-card"><h3>Kyoto</h3><p class="score">Match: 135%</p><p>temples</p></div></div>"#;
        assert_eq!(markup_text(markup), "Kyoto Match: 135% temples");
    }

    #[test]
    fn test_markup_text_decodes_entities() {
        assert_eq!(markup_text("<p>Fish &amp; Chips &lt;3</p>"), "Fish & Chips <3");
    }

    #[test]
    fn test_view_remembers_latest() {
        let view = TerminalView::stdout(ViewMode::Text);
        view.replace("<p class=\"empty\">No destinations found</p>".to_string());
        view.clear();
        assert_eq!(view.renders(), 2);
        assert!(view.markup().is_empty());
    }
}
