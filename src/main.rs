//! CLI entry point for the traffic counter.
//!
//! Loads a file of half-hourly `<count> <timestamp>` records and prints totals,
//! per-day totals, the busiest half hours and the quietest unbroken window.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use traffic_counter::analyzers::aggregate::totals_by_day;
use traffic_counter::analyzers::ranking::{bottom_k, contiguous_windows, top_k};
use traffic_counter::analyzers::report::Report;
use traffic_counter::fetch::load_dataset;
use traffic_counter::output::{
    append_daily_totals, write_daily_totals, write_entries, write_json, write_text, write_windows,
};

#[derive(Parser)]
#[command(name = "traffic_counter")]
#[command(about = "Summarize half-hourly traffic counts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full summary report
    Report {
        /// Record file to read
        #[arg(value_name = "FILE", default_value = "data.txt")]
        input: String,

        /// Number of busiest half hours to list
        #[arg(short = 'k', long, default_value_t = 3)]
        top: usize,

        /// Length of the quietest-period window, in minutes
        #[arg(short, long, default_value_t = 90)]
        window_minutes: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the total count and per-day totals
    Totals {
        /// Record file to read
        #[arg(value_name = "FILE", default_value = "data.txt")]
        input: String,
    },
    /// List the busiest (or quietest) half hours
    Top {
        /// Record file to read
        #[arg(value_name = "FILE", default_value = "data.txt")]
        input: String,

        /// Number of half hours to list
        #[arg(short = 'k', long, default_value_t = 3)]
        count: usize,

        /// List the quietest half hours instead, lowest first
        #[arg(long, default_value_t = false)]
        lowest: bool,
    },
    /// Rank unbroken windows by summed count, lowest first
    Windows {
        /// Record file to read
        #[arg(value_name = "FILE", default_value = "data.txt")]
        input: String,

        /// Window length in minutes (a multiple of 30)
        #[arg(short, long, default_value_t = 90)]
        window_minutes: i64,

        /// Maximum number of windows to print (0 = all)
        #[arg(short = 'n', long, default_value_t = 0)]
        limit: usize,
    },
    /// Append per-day totals to a CSV file
    Export {
        /// Record file to read
        #[arg(value_name = "FILE", default_value = "data.txt")]
        input: String,

        /// CSV file to append results to
        #[arg(short, long, default_value = "daily_totals.csv")]
        output: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/traffic_counter.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("traffic_counter.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Report {
            input,
            top,
            window_minutes,
            format,
        } => {
            let dataset = load_dataset(&input)?;
            let report = Report::build(&dataset, top, window_minutes.saturating_mul(60))?;
            match format {
                Format::Text => write_text(&mut out, &report)?,
                Format::Json => write_json(&mut out, &report)?,
            }
        }
        Commands::Totals { input } => {
            let dataset = load_dataset(&input)?;
            writeln!(out, "{}", dataset.total_count())?;
            write_daily_totals(&mut out, &totals_by_day(&dataset))?;
        }
        Commands::Top {
            input,
            count,
            lowest,
        } => {
            let dataset = load_dataset(&input)?;
            let entries = if lowest {
                bottom_k(&dataset, count)?
            } else {
                top_k(&dataset, count)?
            };
            write_entries(&mut out, &entries)?;
        }
        Commands::Windows {
            input,
            window_minutes,
            limit,
        } => {
            let dataset = load_dataset(&input)?;
            let mut windows = contiguous_windows(&dataset, window_minutes.saturating_mul(60))?;
            if limit > 0 {
                windows.truncate(limit);
            }
            write_windows(&mut out, &windows)?;
        }
        Commands::Export { input, output } => {
            let dataset = load_dataset(&input)?;
            let totals = totals_by_day(&dataset);
            append_daily_totals(&output, &totals)?;
            info!(path = %output, days = totals.len(), "Daily totals exported");
        }
    }

    out.flush()?;
    Ok(())
}
