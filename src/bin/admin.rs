//! CLI administration tool for short-links.
//!
//! Works directly against the database, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Create the urls table if missing
//! cargo run --bin admin -- db init
//!
//! # Create a link (prompts for the URL when omitted)
//! cargo run --bin admin -- link create https://example.com --code promo
//!
//! # Show a link and its clicks
//! cargo run --bin admin -- link show promo
//!
//! # Store-wide totals
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string, or the `DB_HOST`,
//!   `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` parts as for the server
//! - `BASE_URL` (optional): public origin used to print short URLs

use short_links::AppError;
use short_links::application::services::LinkService;
use short_links::config::{Config, mask_connection_string};
use short_links::infrastructure::cache::NullCache;
use short_links::infrastructure::persistence::{PgLinkRepository, run_migrations};
use short_links::utils::public_url::short_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

type Service = LinkService<PgLinkRepository>;

/// CLI tool for managing short-links.
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
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show link and click totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a short link
    Create {
        /// Long URL to shorten (prompted when omitted)
        url: Option<String>,

        /// Custom short code (generated when omitted)
        #[arg(short, long)]
        code: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a link with its click count
    Show {
        /// Short code
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Create the urls table if it does not exist
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    let service = LinkService::new(
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))),
        Arc::new(NullCache::new()),
    );

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &service).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &service).await?,
    }

    Ok(())
}

async fn handle_link_action(action: LinkAction, service: &Service) -> Result<()> {
    match action {
        LinkAction::Create { url, code, yes } => create_link(service, url, code, yes).await,
        LinkAction::Show { code } => show_link(service, &code).await,
    }
}

/// Creates a link, prompting for missing input.
///
/// A taken custom code is reported without creating anything.
async fn create_link(
    service: &Service,
    url: Option<String>,
    code: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create short link".bright_blue().bold());
    println!();

    let long_url = match url {
        Some(u) => u,
        None => Input::<String>::new().with_prompt("Long URL").interact_text()?,
    };

    println!("  URL:  {}", long_url.cyan());
    match code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => println!("  Code: {}", c.cyan()),
        None => println!("  Code: {}", "(generated)".bright_black()),
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    match service.create_short_link(long_url, code).await {
        Ok(link) => {
            println!("{}", "Link created".green().bold());
            println!("  Code:      {}", link.code.bright_yellow().bold());
            if let Ok(base) = std::env::var("BASE_URL") {
                println!("  Short URL: {}", short_url(&base, &link.code).cyan());
            }
            Ok(())
        }
        Err(AppError::CodeTaken { custom_code, .. }) => {
            println!(
                "{} '{}' is already taken, pick another code",
                "Code".red(),
                custom_code.yellow()
            );
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Failed to create link: {}", e)),
    }
}

/// Prints a link with its click count. Does not count as a click.
async fn show_link(service: &Service, code: &str) -> Result<()> {
    match service.stats(code).await {
        Ok(link) => {
            println!("{}", "Short link".bright_blue().bold());
            println!();
            println!("  Code:   {}", link.code.cyan());
            println!("  URL:    {}", link.long_url);
            println!("  Clicks: {}", link.clicks.to_string().bright_white().bold());
            Ok(())
        }
        Err(AppError::NotFound { .. }) => {
            println!("{} {}", "No link with code".yellow(), code.cyan());
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Database error: {}", e)),
    }
}

/// Displays store-wide totals.
async fn handle_stats(service: &Service) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let overview = service
        .overview()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!(
        "  Links:  {}",
        overview.links.to_string().bright_white().bold()
    );
    println!(
        "  Clicks: {}",
        overview.clicks.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool, service: &Service) -> Result<()> {
    match action {
        DbAction::Check => {
            service
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;
            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Init => {
            run_migrations(pool).await?;
            println!("{}", "Schema ready".green().bold());
        }
    }

    Ok(())
}
