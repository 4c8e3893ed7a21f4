use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use clickup_sheets_sync::{Config, MemorySink, ScopeFilter, SheetsSink, Syncer, TabularSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clickup-sheets-sync")]
#[command(about = "Export ClickUp task details and time entries into Google Sheets tabs")]
struct Cli {
    /// First creation date in scope (YYYY-MM-DD)
    #[arg(long)]
    start_date: NaiveDate,

    /// Time of day for the start bound (HH:MM)
    #[arg(long, default_value = "00:00", value_parser = parse_time)]
    start_time: NaiveTime,

    /// Last due date in scope (YYYY-MM-DD)
    #[arg(long)]
    due_date: NaiveDate,

    /// Time of day for the due bound (HH:MM)
    #[arg(long, default_value = "23:59", value_parser = parse_time)]
    due_time: NaiveTime,

    /// Export archived spaces, folders, lists and tasks instead of active ones
    #[arg(long)]
    archived: bool,

    /// TOML configuration file
    #[arg(short, long, env = "CLICKUP_SHEETS_CONFIG")]
    config: Option<PathBuf>,

    /// Build both datasets but do not upload them
    #[arg(long)]
    dry_run: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn parse_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, "%H:%M")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let scope = ScopeFilter::from_local(
        (cli.start_date, cli.start_time),
        (cli.due_date, cli.due_time),
        cli.archived,
        config.display_time_zone,
    )?;

    let memory = MemorySink::new();
    let sheets;
    let sink: &dyn TabularSink = if cli.dry_run {
        &memory
    } else {
        sheets = SheetsSink::new(&config.export)?;
        &sheets
    };

    let syncer = Syncer::new(config)?;
    let report = syncer.run(scope, sink).await.context("sync run aborted")?;

    println!(
        "Tab {}: {} tasks, {} detail rows ({} skipped), {} time entry rows ({} skipped){}",
        report.tab,
        report.task_ids,
        report.detail_rows,
        report.skipped_details,
        report.time_rows,
        report.skipped_time_entries,
        if cli.dry_run { " [dry run, nothing uploaded]" } else { "" }
    );
    Ok(())
}
