// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::Settings;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use core_types::{InstrumentId, parse_trade_date};
use database::Db;
use engine::{BatchReport, Engine, Outcome};
use screener::{Filter, Screener};
use std::sync::Arc;
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Daily technical indicators and stock screens.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculates and stores one instrument's indicators for a day.
    Calculate {
        /// The instrument code (e.g., "600519.SH").
        #[arg(short, long)]
        code: String,

        /// Trade date, YYYY-MM-DD or YYYYMMDD. Defaults to today.
        #[arg(short, long, value_parser = parse_trade_date)]
        date: Option<NaiveDate>,
    },

    /// Calculates indicators for many instruments at once.
    Batch {
        /// Trade date, YYYY-MM-DD or YYYYMMDD. Defaults to today.
        #[arg(short, long, value_parser = parse_trade_date)]
        date: Option<NaiveDate>,

        /// Restrict the run to these codes; every listed instrument otherwise.
        #[arg(short, long = "code")]
        codes: Vec<String>,
    },

    /// Rebuilds the stored indicator history of one instrument.
    Backfill {
        #[arg(short, long)]
        code: String,

        /// Last day to rebuild. Defaults to today.
        #[arg(short, long, value_parser = parse_trade_date)]
        date: Option<NaiveDate>,
    },

    /// Runs one screen and prints its candidates as JSON.
    Screen {
        /// The filter name, see `filters`.
        filter: Filter,

        #[arg(short, long, value_parser = parse_trade_date)]
        date: Option<NaiveDate>,
    },

    /// Lists the available screens.
    Filters,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("loading configuration")?;

    let level = settings.app.log_level.parse().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("sqlx::query", tracing::Level::WARN) // Disable sqlx query debug logs
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(environment = %settings.app.environment, "Starting indicator application");

    match cli.command {
        Commands::Calculate { code, date } => handle_calculate(&settings, code, date).await?,
        Commands::Batch { date, codes } => handle_batch(&settings, date, codes).await?,
        Commands::Backfill { code, date } => handle_backfill(&settings, code, date).await?,
        Commands::Screen { filter, date } => handle_screen(&settings, filter, date).await?,
        Commands::Filters => handle_filters(),
    }

    Ok(())
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

async fn open_store(settings: &Settings) -> Result<Arc<Db>> {
    let db = database::connect(&settings.database)
        .await
        .context("connecting to the database")?;
    Ok(Arc::new(db))
}

async fn handle_calculate(settings: &Settings, code: String, date: Option<NaiveDate>) -> Result<()> {
    let engine = Engine::new(open_store(settings).await?, &settings.app);
    let instrument = InstrumentId::new(code);
    let date = today_or(date);

    match engine.calculate(&instrument, date).await? {
        Outcome::Stored(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        Outcome::InsufficientData { bars } => {
            println!("{instrument}: only {bars} bars up to {date}, nothing stored");
        }
    }
    Ok(())
}

async fn handle_batch(settings: &Settings, date: Option<NaiveDate>, codes: Vec<String>) -> Result<()> {
    let engine = Engine::new(open_store(settings).await?, &settings.app);
    let date = today_or(date);

    let report = if codes.is_empty() {
        engine.run_all(date).await?
    } else {
        engine.run_batch(codes.into_iter().map(InstrumentId::new).collect(), date).await
    };
    print_report(&report);
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!(
        "{}: {} instruments, {} stored, {} with too little history, {} failed",
        report.date,
        report.total(),
        report.stored(),
        report.insufficient(),
        report.failed()
    );
    for (instrument, error) in report.failures() {
        println!("  {instrument}: {error:#}");
    }
}

async fn handle_backfill(settings: &Settings, code: String, date: Option<NaiveDate>) -> Result<()> {
    let engine = Engine::new(open_store(settings).await?, &settings.app);
    let instrument = InstrumentId::new(code);
    let written = engine.backfill(&instrument, today_or(date)).await?;
    println!("{instrument}: {written} records written");
    Ok(())
}

async fn handle_screen(settings: &Settings, filter: Filter, date: Option<NaiveDate>) -> Result<()> {
    let screener = Screener::new(open_store(settings).await?, settings.screener.clone());
    let result = screener.run(filter, today_or(date)).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn handle_filters() {
    for filter in Filter::ALL {
        println!("{:<24} top {:<3} {}", filter.name(), filter.cap(), filter.description());
    }
}
