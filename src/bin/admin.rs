//! CLI administration tool for shortit.
//!
//! Manages alias records directly against PostgreSQL without going through
//! the HTTP API. Uses the same allocator as the server, so dedup and
//! uniqueness rules are identical.
//!
//! # Usage
//!
//! ```bash
//! # List all aliases
//! cargo run --bin admin -- aliases list
//!
//! # Shorten a URL, optionally with a custom name
//! cargo run --bin admin -- aliases create https://example.com --alias "my link"
//!
//! # Delete a record
//! cargo run --bin admin -- aliases delete 42
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*` components),
//! `SHORT_URL_PREFIX`, `ALIAS_MAX_ATTEMPTS`.

use shortit::application::services::AliasAllocator;
use shortit::config::{self, StorageBackend};
use shortit::infrastructure::persistence::PgAliasRepository;
use shortit::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type PgAllocator = AliasAllocator<PgAliasRepository>;

/// CLI tool for managing shortit.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage alias records
    Aliases {
        #[command(subcommand)]
        action: AliasAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum AliasAction {
    /// List all records
    List,

    /// Shorten a URL
    Create {
        /// Destination URL
        url: String,

        /// Custom name (whitespace becomes hyphens)
        #[arg(short, long)]
        alias: Option<String>,
    },

    /// Delete a record by ID
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("admin only works with the postgres storage backend");
    }

    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Aliases { action } => {
            let repository = Arc::new(PgAliasRepository::new(Arc::new(pool)));
            let allocator = AliasAllocator::new(
                repository,
                config.short_url_prefix.as_str(),
                config.alias_max_attempts,
            );
            handle_alias_action(action, &allocator).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_alias_action(action: AliasAction, allocator: &PgAllocator) -> Result<()> {
    match action {
        AliasAction::List => list_aliases(allocator).await,
        AliasAction::Create { url, alias } => create_alias(allocator, url, alias).await,
        AliasAction::Delete { id, yes } => delete_alias(allocator, id, yes).await,
    }
}

/// Lists all records.
///
/// ```text
/// 📋 Aliases
///
///   ID   Alias                          Destination                              Created
///   ────────────────────────────────────────────────────────────────────────────────────────
///   1    https://shortit/AB12x          https://example.com                      2024-06-01 10:30
/// ```
async fn list_aliases(allocator: &PgAllocator) -> Result<()> {
    println!("{}", "📋 Aliases".bright_blue().bold());
    println!();

    let records = allocator
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list aliases: {}", e))?;

    if records.is_empty() {
        println!("{}", "  No aliases found".yellow());
        println!();
        println!(
            "  Create one with: {} admin -- aliases create <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {:<40} {}",
        "ID".bright_white().bold(),
        "Alias".bright_white().bold(),
        "Destination".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for record in &records {
        let alias = if record.is_custom() {
            record.alias.green()
        } else {
            record.alias.cyan()
        };

        println!(
            "  {:<4} {:<30} {:<40} {}",
            record.id.to_string().bright_black(),
            alias,
            record.destination_url,
            record
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn create_alias(allocator: &PgAllocator, url: String, alias: Option<String>) -> Result<()> {
    println!("{}", "✂️  Shorten URL".bright_blue().bold());
    println!();

    let allocation = allocator
        .create(url, alias)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create alias: {}", e))?;

    if allocation.is_created() {
        println!("{}", "✅ URL shortened successfully".green().bold());
    } else {
        println!("{}", "⚠️  Original URL already exists".yellow());
    }

    println!("  ID:    {}", allocation.record.id.to_string().bright_black());
    println!("  Alias: {}", allocation.record.alias.bright_yellow().bold());
    println!();

    Ok(())
}

/// Deletes a record after confirmation (default: No).
async fn delete_alias(allocator: &PgAllocator, id: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Alias".bright_blue().bold());
    println!();

    let record = allocator
        .resolve(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Alias not found")?;

    println!("  Alias:       {}", record.alias.cyan());
    println!("  Destination: {}", record.destination_url);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this alias?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    allocator
        .delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete alias: {}", e))?;

    println!();
    println!("{}", "✅ Alias deleted successfully!".green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM aliases")
                .fetch_one(pool)
                .await
                .context("Table 'aliases' is missing; start the server once to run migrations")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  Aliases: {}", count.to_string().bright_green().bold());
        }
    }

    Ok(())
}
