//! Batch seeders
//!
//! Each submodule is one independent seeding step with the signature
//! `run(&SqlitePool, &SeedConfig) -> Result<usize>` (rows written). Seeders
//! that depend on earlier steps load their inputs from the database, so they
//! work both standalone and under [`run_all`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use cdg_common::config::SeedConfig;
use cdg_common::{Error, Result};

pub mod activity;
pub mod disclosures;
pub mod knowledge_base;
pub mod org;
pub mod patterns;
pub mod policies;

/// Reference time for relative dates: today at noon UTC. Stable within a day
/// so repeated runs while preparing a demo produce identical timestamps.
pub(crate) fn anchor() -> DateTime<Utc> {
    let noon = Utc::now()
        .date_naive()
        .and_hms_opt(12, 0, 0)
        .expect("noon is a valid time");
    DateTime::from_naive_utc_and_offset(noon, Utc)
}

pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::Internal(format!("malformed guid {raw}: {e}")))
}

/// Run every seeder in dependency order. Later seeders read rows the earlier
/// ones wrote.
pub async fn run_all(pool: &SqlitePool, config: &SeedConfig) -> Result<usize> {
    let mut total = 0;
    total += org::run(pool, config).await?;
    total += knowledge_base::run(pool, config).await?;
    total += policies::run(pool, config).await?;
    total += disclosures::run(pool, config).await?;
    total += patterns::run(pool, config).await?;
    total += activity::run(pool, config).await?;
    info!(rows = total, "All seeders finished");
    Ok(total)
}
