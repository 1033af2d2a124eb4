//! CLI for schema migrations, sample data and quick status checks
//!
//! Outputs one JSON object per command so scripts can parse the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use events_core::config::Config;
use events_core::domains::bookings::Booking;
use events_core::domains::events::actions::seed_sample_events;
use events_core::domains::events::Event;
use events_core::kernel::Database;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "migrate_cli")]
#[command(about = "Database tooling for the Dev Events API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Insert the sample conference catalogue (skips existing events)
    Seed,

    /// Print event and booking counts
    Status,
}

#[derive(Serialize, Default)]
struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bookings: Option<i64>,
}

fn output(resp: Response) -> Result<()> {
    println!("{}", serde_json::to_string(&resp)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (url, max_connections) = Config::database_from_env()?;
    let db = Database::new(url, max_connections);

    let result = match cli.command {
        Commands::Migrate => cmd_migrate(&db).await,
        Commands::Seed => cmd_seed(&db).await,
        Commands::Status => cmd_status(&db).await,
    };

    db.shutdown().await;
    result
}

async fn cmd_migrate(db: &Database) -> Result<()> {
    db.migrate().await.context("Failed to run migrations")?;
    output(Response {
        success: true,
        message: Some("Migrations applied".to_string()),
        ..Default::default()
    })
}

async fn cmd_seed(db: &Database) -> Result<()> {
    db.migrate().await.context("Failed to run migrations")?;
    let pool = db.acquire().await?;
    let report = seed_sample_events(&pool)
        .await
        .context("Failed to seed sample events")?;
    output(Response {
        success: true,
        created: Some(report.created),
        skipped: Some(report.skipped),
        ..Default::default()
    })
}

async fn cmd_status(db: &Database) -> Result<()> {
    let pool = db.acquire().await?;
    let events = Event::count(&pool).await?;
    let bookings = Booking::count_all(&pool).await?;
    output(Response {
        success: true,
        events: Some(events),
        bookings: Some(bookings),
        ..Default::default()
    })
}
