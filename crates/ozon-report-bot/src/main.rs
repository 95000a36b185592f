//! Main entry point for the OZON report.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use ozon_report_bot::{load_config, startup_logging, ReportJob, RunOutcome};
use ozon_report_common::init_logging;
use ozon_report_config::ConfigLoader;
use std::path::PathBuf;
use tracing::{error, info};

/// Daily OZON sales and ad-spend report for Telegram.
#[derive(Debug, Parser)]
#[command(name = "ozon-report", version, about)]
struct Args {
    /// Configuration file (YAML or TOML)
    #[arg(short, long, env = "OZON_REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Environment file loaded before the configuration
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Log level filter, overrides the configuration
    #[arg(long)]
    log_level: Option<String>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Render everything and print the summary without sending it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().require_delivery(!args.dry_run);
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &args.env_file {
        loader = loader.with_env_file(path);
    }
    let startup = startup_logging(args.log_level.as_deref());
    let mut config = load_config(&loader, &startup).context("failed to load configuration")?;

    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    let _guard = init_logging(&config.logging).context("failed to initialize logging")?;

    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    info!("Starting OZON report for {} (dry run: {})", today, args.dry_run);

    let job = ReportJob::from_config(&config, args.dry_run).inspect_err(|e| {
        error!("Failed to set up report job: {}", e);
    })?;
    match job.run(today).await {
        Ok(RunOutcome::Delivered { chart }) => {
            info!("Done, chart at {}", chart.display());
            Ok(())
        }
        Ok(RunOutcome::InsufficientData { days }) => {
            info!("Done, only {} days of sales available", days);
            Ok(())
        }
        Err(e) => {
            error!("Report failed: {}", e);
            Err(e.into())
        }
    }
}
