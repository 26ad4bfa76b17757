//! Config command - print the effective configuration

use anyhow::Result;
use wayfarer_cli::output::Status;
use wayfarer_core::config::Config;

/// Run config command
pub fn run(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&config.schema)?);
        return Ok(());
    }

    match &config.path {
        Some(path) => Status::info(&format!("Loaded from {}", path)),
        None => Status::info("No configuration file found, using defaults"),
    }
    println!();
    print!("{}", toml::to_string_pretty(&config.schema)?);
    Ok(())
}
