//! Demo data tool for the SpecEqui catalog
//!
//! Usage:
//!   cargo run --bin seed -- populate --count 25
//!   cargo run --bin seed -- clear --confirm

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use sqlx::postgres::PgPoolOptions;

use specequi_server::{config::AppConfig, repository::Repository, seed, services::catalog::CatalogService};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fill or empty the equipment catalog", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add demo manufacturers, tags and published equipment
    Populate {
        /// Number of equipment records to create
        #[arg(long, default_value = "25")]
        count: usize,

        /// Random seed, for a reproducible catalog
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Delete all equipment, tags and manufacturers (accounts are kept)
    Clear {
        /// Required; without it nothing is deleted
        #[arg(long)]
        confirm: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("specequi_server={}", config.logging.level).into()),
        )
        .init();

    if let Command::Clear { confirm: false } = args.command {
        println!("Nothing deleted: pass --confirm to remove all catalog data");
        return Ok(());
    }

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let repository = Repository::new(pool);

    match args.command {
        Command::Populate { count, seed: fixed } => {
            let mut rng = match fixed {
                Some(value) => StdRng::seed_from_u64(value),
                None => StdRng::from_entropy(),
            };
            let catalog = CatalogService::new(repository.clone(), config.catalog.clone());
            let report = seed::populate(&repository, &catalog, count, &mut rng)
                .await
                .context("Failed to populate the catalog")?;
            println!(
                "Created {} equipment records ({} with details), {} manufacturers, {} tags",
                report.equipment_created, report.details_created, report.manufacturers_created, report.tags_created
            );
        }
        Command::Clear { .. } => {
            let removed = repository
                .clear_catalog()
                .await
                .context("Failed to clear the catalog")?;
            println!(
                "Deleted {} equipment records, {} tags, {} manufacturers, {} detail records",
                removed.equipment, removed.tags, removed.manufacturers, removed.details
            );
        }
    }

    Ok(())
}
