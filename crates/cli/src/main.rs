use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use sojourn_import::import::{create_extractor, import_trips_file, load_route_config};
use sojourn_import::{analyze_with, export_trips_csv, parse_csv_text, RecordExtractor, RouteConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sojourn")]
#[command(about = "UK travel history parser and absence calculator")]
struct Cli {
    /// TOML file adding port names and carrier route overrides.
    #[arg(long, global = true)]
    routes: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair a travel-history export into trips and summarise absences.
    Analyze {
        /// Export text file, or `-` for stdin.
        input: String,
    },
    /// Import a trips table (CSV, TSV or .xlsx).
    Import {
        /// Table file, or `-` for stdin (delimited text only).
        input: String,
    },
    /// Pair a travel-history export and write the trips as CSV.
    Export {
        input: String,
    },
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
}

fn extractor(routes: Option<&Path>) -> anyhow::Result<RecordExtractor> {
    let config = match routes {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read route config {}", path.display()))?;
            load_route_config(&content)?
        }
        None => RouteConfig::default(),
    };
    Ok(create_extractor(config))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Analyze { input } => {
            let extractor = extractor(cli.routes.as_deref())?;
            let result = analyze_with(&extractor, &read_input(&input)?);
            print_json(&result, cli.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Import { input } => {
            let result = if input == "-" {
                parse_csv_text(&read_input(&input)?)
            } else {
                import_trips_file(Path::new(&input))
                    .await
                    .with_context(|| format!("Failed to read {input}"))?
            };
            for warning in &result.warnings {
                tracing::warn!("{warning}");
            }
            for error in &result.errors {
                tracing::error!("{error}");
            }
            print_json(&result, cli.pretty)?;
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Export { input } => {
            let extractor = extractor(cli.routes.as_deref())?;
            let result = analyze_with(&extractor, &read_input(&input)?);
            print!("{}", export_trips_csv(&result.trips)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
