//! CLI entry point for the bike-share trip analytics tool.
//!
//! Provides subcommands for building an aggregated JSON report from a trip
//! CSV, exporting the cleaned and enriched table, and checking how many rows
//! the cleaning rules drop.

use anyhow::{Context, Result};
use bikeshare_trips::{
    cleaning::full_clean_pipeline,
    config::ReportConfig,
    filter::{TripFilter, distinct_models, distinct_user_types},
    loader::{load_station_coordinates, load_trips},
    output::{export_enriched_csv, print_pretty, write_json, write_json_file},
    report::TripReport,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_trips")]
#[command(about = "Clean bike-share trip CSVs and summarise ridership", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the aggregated report (counts, stations, user types, durations)
    Report {
        /// Trip CSV to analyse
        #[arg(value_name = "TRIPS_CSV")]
        source: PathBuf,

        /// JSON config overriding column names, top-N and quantiles
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Optional station coordinates CSV (station_id,station_name,lat,lon)
        #[arg(short, long)]
        stations: Option<PathBuf>,

        /// Number of popular stations to list
        #[arg(long)]
        top_n: Option<usize>,

        /// First trip date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last trip date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Only include these user types (repeatable)
        #[arg(long = "user-type", value_name = "USER_TYPE")]
        user_types: Vec<String>,

        /// Only include these bike models (repeatable)
        #[arg(long = "model", value_name = "MODEL")]
        models: Vec<String>,

        /// JSON file to write the report to (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the cleaned and enriched trip table as CSV
    Export {
        #[arg(value_name = "TRIPS_CSV")]
        source: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// CSV file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Gzip compress the output
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Report how many rows survive basic cleaning
    Validate {
        #[arg(value_name = "TRIPS_CSV")]
        source: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_trips.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_trips.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            source,
            config,
            stations,
            top_n,
            from,
            to,
            user_types,
            models,
            output,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(top_n) = top_n {
                config.top_n = top_n;
            }

            let filter = TripFilter {
                date_range: match (from, to) {
                    (None, None) => None,
                    (from, to) => Some((
                        from.unwrap_or(NaiveDate::MIN),
                        to.unwrap_or(NaiveDate::MAX),
                    )),
                },
                user_types: (!user_types.is_empty()).then(|| user_types.into_iter().collect()),
                models: (!models.is_empty()).then(|| models.into_iter().collect()),
            };

            let frame = load_trips(&source, &config.schema)?;
            let cleaned = full_clean_pipeline(&frame, &config.schema)
                .with_context(|| format!("Failed to clean {}", source.display()))?;

            let coordinates = match stations {
                Some(path) => {
                    let loaded = load_station_coordinates(&path)?;
                    if loaded.is_none() {
                        warn!(
                            path = %path.display(),
                            "Station coordinates file not found, skipping map points"
                        );
                    }
                    loaded
                }
                None => None,
            };

            let report = TripReport::build(&cleaned, &filter, &config, coordinates.as_deref())?;
            print_pretty(&report);

            match output {
                Some(path) => {
                    write_json_file(&path, &report)?;
                    info!(path = %path.display(), "Report written");
                }
                None => write_json(&report, std::io::stdout().lock())?,
            }
        }
        Commands::Export {
            source,
            config,
            output,
            gzip,
        } => {
            let config = load_config(config.as_deref())?;
            let frame = load_trips(&source, &config.schema)?;
            let cleaned = full_clean_pipeline(&frame, &config.schema)
                .with_context(|| format!("Failed to clean {}", source.display()))?;

            export_enriched_csv(&output, &cleaned.frame, &config.schema, gzip)?;
        }
        Commands::Validate { source, config } => {
            let config = load_config(config.as_deref())?;
            let frame = load_trips(&source, &config.schema)?;
            let cleaned = full_clean_pipeline(&frame, &config.schema)
                .with_context(|| format!("Failed to clean {}", source.display()))?;

            let summary = cleaned.summary;
            if summary.dropped_rows > 0 {
                warn!(
                    dropped_rows = summary.dropped_rows,
                    "Rows dropped for missing times, missing user type or invalid duration"
                );
            }
            info!(
                raw_rows = summary.raw_rows,
                clean_rows = summary.clean_rows,
                dropped_rows = summary.dropped_rows,
                "Validation summary"
            );
            info!(
                user_types = ?distinct_user_types(&cleaned.frame),
                models = ?distinct_models(&cleaned.frame),
                "Filter choices"
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => ReportConfig::load(path),
        None => Ok(ReportConfig::default()),
    }
}
