//! CLI interface for rust-gds-flights

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_gds_flights::{
    flatten_with_report, render_table, to_json_pretty, write_json, FlatSummary, FlightError,
    SearchRequest, ShopClient, ShopConfig,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "rust-gds-flights")]
#[command(about = "Low-fare flight search with flattened itinerary summaries")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Also write JSON logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for flights (credentials from GDS_AUTH_TOKEN / GDS_PCC or .env)
    Search {
        /// Origin location code
        #[arg(short, long)]
        from: String,
        /// Destination location code
        #[arg(short, long)]
        to: String,
        /// Departure date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Number of adults
        #[arg(long, default_value = "1")]
        adults: u32,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Output file for JSON results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Flatten a saved shop response
    Flatten {
        /// Response JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Output file for JSON results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn init_logging(verbose: bool, log_dir: Option<&PathBuf>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "rust-gds-flights.log");
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    debug!("Logging initialized");
    Ok(())
}

fn emit(summaries: &[FlatSummary], format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    if let Some(output_file) = output {
        write_json(&output_file, summaries)?;
        println!("Results saved to {}", output_file.display());
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No flight options could be parsed from the response.");
        return Ok(());
    }

    match format {
        OutputFormat::Table => print!("{}", render_table(summaries)),
        OutputFormat::Json => println!("{}", to_json_pretty(summaries)?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_dir.as_ref())?;

    match cli.command {
        Commands::Search {
            from,
            to,
            date,
            adults,
            format,
            output,
        } => {
            let config = ShopConfig::from_env()?;
            let request = SearchRequest::new(&from, &to, &date)?.with_adults(adults)?;
            let client = ShopClient::new(config)?;

            println!(
                "Searching for flights from {} to {} on {}...",
                request.origin, request.destination, request.departure_date
            );

            match client.search(&request).await {
                Ok(summaries) => {
                    println!("\nFlight search successful");
                    println!("=====================================");
                    emit(&summaries, format, output)?;
                }
                Err(FlightError::ApiError { status, body }) => {
                    eprintln!("\nAPI call failed");
                    eprintln!("=======================");
                    eprintln!("Status: {}", status);
                    eprintln!("Error Data: {}", body);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("\nAPI call failed");
                    eprintln!("=======================");
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Flatten {
            input,
            format,
            output,
        } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let document: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", input.display()))?;

            let report = flatten_with_report(&document);
            info!(parsed = report.summaries.len(), skipped = report.skipped, "Flattened response");
            emit(&report.summaries, format, output)?;
            if report.skipped > 0 {
                eprintln!("Skipped {} itineraries that could not be parsed", report.skipped);
            }
        }
    }

    Ok(())
}
