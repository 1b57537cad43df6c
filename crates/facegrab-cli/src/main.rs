use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facegrab_acquire::{output, AcquireConfig, Crawler};
use facegrab_model::DEFAULT_IMAGE_BASE;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "facegrab")]
#[command(about = "Download team and face images from a team listing or a CSV export")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// Directory images are written to (created if absent)
    #[arg(short = 'O', long, global = true, default_value = ".")]
    output_dir: PathBuf,

    /// Prefix of the team/ and face/ image folders
    #[arg(long, global = true, default_value = DEFAULT_IMAGE_BASE)]
    image_base: String,

    /// Per-request timeout in seconds; 0 waits indefinitely
    #[arg(long, global = true, default_value_t = 60)]
    timeout_secs: u64,

    /// Maximum simultaneous image downloads (default: no limit)
    #[arg(long, global = true)]
    max_concurrent: Option<usize>,

    /// Write a JSON summary of the run to this path
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a team listing page and download team crests and player faces
    Crawl {
        /// URL of the listing page with `item-title` team links
        base_url: Option<String>,
    },

    /// Download player faces for every Unique ID in a semicolon-delimited CSV
    Csv {
        /// CSV export with a `Unique ID` column
        csv_file: Option<PathBuf>,

        /// Only download these IDs (repeatable)
        #[arg(long = "only", value_name = "ID")]
        only: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.utc);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Install the global fmt subscriber. `RUST_LOG`, when set, replaces `--log-level`.
fn init_logging(log_level: &LogLevel, utc: bool) {
    // Keep the HTML parser quiet at debug/trace
    let level = match log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let timeout = (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs));
    let config = AcquireConfig::default()
        .with_dest_dir(&cli.output_dir)
        .with_image_base(cli.image_base)
        .with_timeout(timeout)
        .with_max_concurrent(cli.max_concurrent);

    let report = match cli.command {
        Commands::Crawl { base_url } => {
            let base_url =
                base_url.context("Please provide the base URL as a command-line argument.")?;
            tracing::info!(url = %base_url, output_dir = %config.dest_dir.display(), "Crawling team listing");

            let crawler = Crawler::new(&config)?;
            crawler.run(&base_url).await?
        }
        Commands::Csv { csv_file, only } => {
            let csv_file =
                csv_file.context("Please provide a CSV file as a command-line argument.")?;
            tracing::info!(csv = %csv_file.display(), output_dir = %config.dest_dir.display(), "Reading Unique IDs");

            // Read everything up front so a bad file fails before any request
            let ids = facegrab_acquire::read_unique_ids(&csv_file)?;
            let ids = facegrab_acquire::retain_only(ids, &only);

            let crawler = Crawler::new(&config)?;
            crawler.run_ids(&csv_file.display().to_string(), &ids).await
        }
    };

    if let Some(path) = &cli.report {
        output::write_report(&report, path)?;
    }

    Ok(())
}
