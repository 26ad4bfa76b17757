//! Dataset command - group and record counts

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use wayfarer_cli::output::{format_count, Status};
use wayfarer_core::config::Config;
use wayfarer_search::{DatasetSource, GroupSummary};

/// JSON output for the dataset command
#[derive(Debug, Serialize)]
struct JsonDatasetOutput<'a> {
    source: String,
    total: usize,
    groups: &'a [GroupSummary],
    missing: Vec<&'a str>,
}

/// Run dataset command
pub async fn run(config: &Config, json: bool) -> Result<()> {
    let access = super::dataset_access(&config.schema)?;
    let dataset = access.load_all().await?;

    let missing: Vec<&str> = config
        .schema
        .dataset
        .groups
        .iter()
        .map(String::as_str)
        .filter(|name| !dataset.groups().iter().any(|g| g.name == *name))
        .collect();

    if json {
        let output = JsonDatasetOutput {
            source: access.source().describe(),
            total: dataset.len(),
            groups: dataset.groups(),
            missing,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    Status::header(&format!("Dataset {}", access.source().describe()));
    for group in dataset.groups() {
        println!("  {:<16} {}", group.name, group.records.to_string().bold());
    }
    for name in &missing {
        println!("  {:<16} {}", name, "missing".dimmed());
    }
    println!();
    Status::success(&format!(
        "{} in {}",
        format_count(dataset.len(), "destination", "destinations"),
        format_count(dataset.groups().len(), "group", "groups")
    ));

    Ok(())
}
