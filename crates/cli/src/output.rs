//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;
use wayfarer_search::RankedResult;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{:.1}s", secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Plain one-line summary of a ranked result.
///
/// `position` is 1-based.
pub fn result_line(position: usize, result: &RankedResult) -> String {
    let distance = result
        .distance
        .map_or_else(|| "-".to_string(), |d| format!("{d:.3}"));
    let tags = result
        .record
        .categories
        .tags()
        .map(|t| t.join(", "))
        .unwrap_or_else(|| "<malformed>".to_string());

    format!(
        "{position:>2}. {name}  match {percent}%  (distance {distance}, score {total:.3})  [{tags}]",
        name = result.record.name,
        percent = result.percent(),
        total = result.total,
    )
}

/// Print ranked results, best first, highlighting the ones a card would show.
pub fn print_results(results: &[RankedResult], shown: usize) {
    for (i, result) in results.iter().enumerate() {
        let line = result_line(i + 1, result);
        if i < shown {
            println!("{}", line.bold());
        } else {
            println!("{}", line.dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use wayfarer_search::DestinationRecord;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration(Duration::from_secs_f32(5.5)), "5.5s");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "destination", "destinations"), "1 destination");
        assert_eq!(format_count(5, "destination", "destinations"), "5 destinations");
    }

    #[test]
    fn test_result_line() {
        let result = RankedResult {
            record: Arc::new(DestinationRecord::new("Kyoto").with_categories(["culture", "nature"])),
            distance: Some(0.2),
            base: 0.8,
            total: 1.35,
        };
        assert_eq!(
            result_line(1, &result),
            " 1. Kyoto  match 135%  (distance 0.200, score 1.350)  [culture, nature]"
        );
    }

    #[test]
    fn test_result_line_without_distance() {
        let result = RankedResult {
            record: Arc::new(DestinationRecord::new("Bali")),
            distance: None,
            base: 0.0,
            total: 0.0,
        };
        assert!(result_line(12, &result).starts_with("12. Bali  match 0%  (distance -"));
    }
}
