//! CLI entry point for the bikeshare statistics tool.
//!
//! Provides subcommands for analyzing one city under a month/day filter,
//! sweeping every month for a city, and listing the known datasets.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Result, bail};
use bikeshare_stats::calendar::{ALL, Calendar};
use bikeshare_stats::catalog::CityCatalog;
use bikeshare_stats::error::AnalysisError;
use bikeshare_stats::filter::{FilterCriteria, filter};
use bikeshare_stats::loader::CsvTripSource;
use bikeshare_stats::output::{append_summary, print_json, print_pretty, render_page};
use bikeshare_stats::pager::{PAGE_SIZE, RowPager};
use bikeshare_stats::session::{AnalysisReport, AnalysisSession, ExecutionMode};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute travel-time, station, duration, and rider statistics for a city
    Analyze {
        /// City to analyze (chicago, new york city, washington)
        #[arg(value_name = "CITY")]
        city: String,

        /// Month to filter by (all, january, ..., june)
        #[arg(short, long, default_value = ALL)]
        month: String,

        /// Day of week to filter by (all, monday, ..., sunday)
        #[arg(short, long, default_value = ALL)]
        day: String,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a one-line summary to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of 5-row pages of raw trips to print after the report
        #[arg(short, long, default_value_t = 0)]
        pages: usize,

        /// Run the aggregators in parallel
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Analyze every month for a city, loading the data once
    Sweep {
        /// City to analyze
        #[arg(value_name = "CITY")]
        city: String,

        /// Day of week to filter by (all, monday, ..., sunday)
        #[arg(short, long, default_value = ALL)]
        day: String,

        /// Print each report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Run the aggregators in parallel
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// List the cities that can be analyzed
    Cities,
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

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
    let calendar = Calendar::bikeshare();
    let catalog = load_catalog()?;

    match cli.command {
        Commands::Analyze {
            city,
            month,
            day,
            json,
            output,
            pages,
            parallel,
        } => {
            validate_choice("month", &month, &calendar.month_tokens())?;
            validate_choice("day", &day, &calendar.weekday_tokens())?;
            let city_key = catalog.resolve(&city)?.to_string();

            let session = AnalysisSession::new(CsvTripSource::new(catalog), &calendar)
                .with_mode(mode(parallel));
            let loaded = session.load(&city_key)?;
            let criteria = FilterCriteria::new(&month, &day);

            let report = match session.analyze(&loaded, &city_key, &criteria) {
                Ok(report) => report,
                Err(AnalysisError::EmptyResultSet) => {
                    eprintln!("No data matches these filters. Try another month or day.");
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            };

            present(&report, json)?;

            if let Some(path) = output {
                append_summary(&path, &report)?;
                info!(path = %path.display(), "Summary appended");
            }

            if pages > 0 {
                let trips = filter(&loaded.records, &criteria, &calendar)?;
                let mut stdout = std::io::stdout().lock();
                let mut pager = RowPager::new(&trips, PAGE_SIZE);
                for _ in 0..pages {
                    let first = pager.offset();
                    match pager.next_page() {
                        Some(page) => render_page(page, first, &mut stdout)?,
                        None => break,
                    }
                }
                if pager.is_exhausted() {
                    info!(rows = trips.len(), "All rows shown");
                }
            }
        }
        Commands::Sweep {
            city,
            day,
            json,
            parallel,
        } => {
            validate_choice("day", &day, &calendar.weekday_tokens())?;
            let city_key = catalog.resolve(&city)?.to_string();

            let filters: Vec<FilterCriteria> = calendar
                .months()
                .iter()
                .map(|m| FilterCriteria::new(m.name(), &day))
                .collect();

            let session = AnalysisSession::new(CsvTripSource::new(catalog), &calendar)
                .with_mode(mode(parallel));
            let results = session.run_filters(&city_key, &filters)?;

            let mut reported = 0;
            for (criteria, result) in filters.iter().zip(results) {
                match result {
                    Ok(report) => {
                        present(&report, json)?;
                        reported += 1;
                    }
                    Err(AnalysisError::EmptyResultSet) => {
                        warn!(month = criteria.month(), "No trips for month, skipping");
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            if reported == 0 {
                eprintln!("No data matches these filters in any month.");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Cities => {
            info!(data_dir = %catalog.data_dir().display(), "Known cities");
            for (city, file) in catalog.iter() {
                println!("{city:<16} {file}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Builds the city catalog from `BIKESHARE_DATA_DIR` and the optional
/// `BIKESHARE_CATALOG` JSON override.
fn load_catalog() -> Result<CityCatalog> {
    let data_dir = std::env::var("BIKESHARE_DATA_DIR").unwrap_or_else(|_| ".".to_string());
    match std::env::var("BIKESHARE_CATALOG") {
        Ok(path) => Ok(CityCatalog::load(Path::new(&path), data_dir)?),
        Err(_) => Ok(CityCatalog::bikeshare(data_dir)),
    }
}

/// Rejects a filter value outside the recognized tokens before the core runs.
fn validate_choice(dimension: &str, value: &str, choices: &[String]) -> Result<()> {
    let value = value.trim().to_lowercase();
    if !choices.contains(&value) {
        bail!(
            "'{value}' is not a valid {dimension}; choose one of: {}",
            choices.join(", ")
        );
    }
    Ok(())
}

fn mode(parallel: bool) -> ExecutionMode {
    if parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    }
}

fn present(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        print_json(report)
    } else {
        print_pretty(report)
    }
}
