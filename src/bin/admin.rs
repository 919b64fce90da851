//! CLI administration tool for snaplink.
//!
//! Inspects and maintains the PostgreSQL record store without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Record counts
//! cargo run --bin admin -- stats
//!
//! # Inspect a single short code
//! cargo run --bin admin -- lookup 4fR9xQ2b
//!
//! # Delete expired records (asks for confirmation unless --yes)
//! cargo run --bin admin -- purge-expired
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//!
//! The service itself never deletes records: expired links keep answering
//! `410 Gone` until `purge-expired` is run, typically from cron.

use snaplink::domain::expiration::ExpirationPolicy;
use snaplink::domain::repositories::RecordStore;
use snaplink::infrastructure::persistence::PgRecordStore;
use snaplink::utils::code_generator::is_valid_code;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show record counts
    Stats,

    /// Show the record behind a short code
    Lookup {
        /// 8-character short code
        code: String,
    },

    /// Delete records whose expiration date has passed
    PurgeExpired {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let store = PgRecordStore::new(Arc::new(pool.clone()));

    match cli.command {
        Commands::Stats => handle_stats(&store).await?,
        Commands::Lookup { code } => handle_lookup(&store, &code).await?,
        Commands::PurgeExpired { yes } => handle_purge(&store, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Displays total, active and expired record counts.
async fn handle_stats(store: &PgRecordStore) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let total = store
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count records: {}", e))?;
    let expired = store
        .count_expired(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count expired records: {}", e))?;

    println!(
        "  Records: {}",
        total.to_string().bright_green().bold()
    );
    println!(
        "  Active:  {}",
        (total - expired).to_string().bright_green().bold()
    );
    println!("  Expired: {}", expired.to_string().yellow().bold());
    println!();

    Ok(())
}

/// Prints a single record and whether it still redirects.
async fn handle_lookup(store: &PgRecordStore, code: &str) -> Result<()> {
    println!("{}", "🔍 Lookup".bright_blue().bold());
    println!();

    if !is_valid_code(code) {
        println!("{}", "❌ Invalid short URL format".red());
        return Ok(());
    }

    let record = store
        .find_by_short_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let Some(record) = record else {
        println!("{}", "⚠️  URL not found".yellow());
        return Ok(());
    };

    let status = if ExpirationPolicy::default().is_expired(&record, Utc::now()) {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    };

    println!("  ID:       {}", record.id.to_string().bright_black());
    println!("  Code:     {}", record.short_code.cyan());
    println!("  URL:      {}", record.original_url.bright_white());
    println!(
        "  Created:  {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Expires:  {}",
        record.expiration_date.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Status:   {}", status);
    println!();

    Ok(())
}

/// Deletes expired records after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is given
/// - Uses a single cutoff timestamp for counting and deleting
async fn handle_purge(store: &PgRecordStore, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge Expired Records".bright_blue().bold());
    println!();

    let cutoff = Utc::now();
    let expired = store
        .count_expired(cutoff)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count expired records: {}", e))?;

    if expired == 0 {
        println!("{}", "  Nothing to purge".yellow());
        return Ok(());
    }

    println!(
        "  Expired records: {}",
        expired.to_string().bright_white().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these records?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = store
        .purge_expired(cutoff)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge records: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Deleted records:".green().bold(),
        deleted.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrated: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = 'url_records')",
            )
            .fetch_one(pool)
            .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  url_records: {}",
                if migrated {
                    "present".green()
                } else {
                    "missing (start the server to migrate)".red()
                }
            );
            println!();
        }
    }

    Ok(())
}
