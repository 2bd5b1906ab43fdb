//! cdg-seed - Compliance Demo Generator
//!
//! Populates a demo database for the compliance/ethics-management platform
//! with reproducible synthetic data: organizational hierarchy, knowledge-base
//! articles, policies with translations, disclosures, an audit-log timeline,
//! and the analytical pattern pools the case generator consumes.
//!
//! Re-running with the same seed reproduces the same dataset; all writes are
//! idempotent upserts, so a failed run is simply re-run from scratch.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use cdg_common::config::SeedConfig;
use cdg_common::db::init_database;
use cdg_seed::seeders;

#[derive(Parser)]
#[command(name = "cdg-seed", about = "Seed the compliance platform demo database")]
struct Cli {
    /// Master seed; each seeder derives its own offset stream from it
    #[arg(long)]
    seed: Option<u64>,

    /// Path to the SQLite database file
    #[arg(long)]
    db: Option<String>,

    /// Records per write batch
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Fail on unknown-id bookkeeping instead of ignoring it
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every seeder in dependency order
    All,
    /// Organizations, departments, and employees
    Org,
    /// Knowledge-base articles
    KnowledgeBase,
    /// Policy documents and translations
    Policies,
    /// Conflict-of-interest and gift disclosures
    Disclosures,
    /// Audit-log timeline events
    Activity,
    /// Repeat-subject / manager-hotspot pools and retaliation chains
    Patterns,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting cdg-seed v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Seeding failed: {e:#}");
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = SeedConfig::resolve(
        cli.seed,
        cli.db.as_deref(),
        cli.chunk_size,
        cli.strict,
    )?;
    info!(
        seed = config.master_seed,
        db = %config.db_path.display(),
        chunk_size = config.chunk_size,
        "Resolved configuration"
    );

    let pool = init_database(&config.db_path).await?;

    let written = match cli.command {
        Command::All => seeders::run_all(&pool, &config).await?,
        Command::Org => seeders::org::run(&pool, &config).await?,
        Command::KnowledgeBase => seeders::knowledge_base::run(&pool, &config).await?,
        Command::Policies => seeders::policies::run(&pool, &config).await?,
        Command::Disclosures => seeders::disclosures::run(&pool, &config).await?,
        Command::Activity => seeders::activity::run(&pool, &config).await?,
        Command::Patterns => seeders::patterns::run(&pool, &config).await?,
    };

    info!(rows = written, "Seeding complete");
    Ok(())
}
