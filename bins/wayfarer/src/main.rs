//! Wayfarer - destination search from the terminal
//!
//! Runs the same search pipeline as the website widget against a local or
//! remote dataset: one-shot searches, an interactive debounced session,
//! dataset statistics and the effective configuration.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::ExitCode;
use wayfarer_cli::output::Status;
use wayfarer_core::config::Config;
use wayfarer_core::error::exit_codes;
use wayfarer_telemetry::TelemetryConfig;

mod commands;

/// Destination search and ranking
#[derive(Parser)]
#[command(name = "wayfarer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file (defaults to .wayfarer.toml, wayfarer.toml, .config/wayfarer.toml)
    #[arg(short, long, global = true, env = "WAYFARER_CONFIG")]
    config: Option<String>,

    /// Dataset file path or URL, overriding the configuration
    #[arg(short, long, global = true)]
    dataset: Option<String>,

    /// Maximum match distance in [0, 1], overriding the configuration
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Print collected metrics as JSON to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the dataset once and print ranked destinations
    Search {
        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Print results as JSON
        #[arg(long, conflicts_with = "html")]
        json: bool,

        /// Print the markup the widget would render
        #[arg(long)]
        html: bool,

        /// Show every candidate, not just the top results
        #[arg(short, long)]
        all: bool,
    },

    /// Read queries from stdin, one line per input change, through the debouncer
    Watch {
        /// Print raw markup instead of text
        #[arg(long)]
        html: bool,
    },

    /// Show dataset groups and record counts
    Dataset {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig {
        json: cli.log_json,
        ..TelemetryConfig::from_verbosity(cli.verbose, cli.quiet)
    };
    if let Err(e) = wayfarer_telemetry::init_with_config(telemetry) {
        Status::warning(&format!("Logging disabled: {}", e));
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            return ExitCode::from(exit_codes::CONFIG_ERROR as u8);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            Status::error(&format!("Failed to start runtime: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let Cli { command, metrics, .. } = cli;
    let result = runtime.block_on(async {
        match command {
            Commands::Search { query, json, html, all } => {
                let query = query.join(" ");
                let format = commands::search::Format::from_flags(json, html);
                commands::search::run(&config, &query, format, all).await
            }
            Commands::Watch { html } => commands::watch::run(&config, html).await,
            Commands::Dataset { json } => commands::dataset::run(&config, json).await,
            Commands::Config { json } => commands::config::run(&config, json),
        }
    });

    if metrics {
        eprintln!("{}", serde_json::to_string_pretty(&wayfarer_telemetry::metrics().export_json()).unwrap_or_default());
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Load the configuration file and apply command-line overrides.
fn load_config(cli: &Cli) -> wayfarer_core::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(dataset) = &cli.dataset {
        config.schema.dataset.location = dataset.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.schema.matching.threshold = threshold;
    }
    config.schema.validate()?;

    tracing::debug!(path = ?config.path, dataset = %config.schema.dataset.location, "configuration loaded");
    Ok(config)
}
