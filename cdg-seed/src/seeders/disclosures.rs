//! Disclosure seeder
//!
//! A subset of employees file conflict-of-interest, gift, outside-employment,
//! and financial-interest disclosures. Statuses follow the weighted lifecycle
//! distribution; resolved statuses get a resolution date after submission.

use chrono::Duration;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use cdg_common::config::SeedConfig;
use cdg_common::db::models::Disclosure;
use cdg_common::db::upsert_disclosures;
use cdg_common::rng::offsets;
use cdg_common::template::pick_weighted;
use cdg_common::{Error, Result, SeedRng};

use crate::data::templates::{disclosure_template, narrative_placeholders};
use crate::data::{DISCLOSURE_STATUSES, DISCLOSURE_TYPES};
use crate::seeders::{anchor, parse_uuid};

pub async fn run(pool: &SqlitePool, config: &SeedConfig) -> Result<usize> {
    let employee_ids = load_employee_ids(pool).await?;
    if employee_ids.is_empty() {
        return Err(Error::InvalidInput(
            "no employees found; run the org seeder first".into(),
        ));
    }

    let mut rng = SeedRng::with_offset(config.master_seed, offsets::DISCLOSURES);
    let anchor = anchor();
    let placeholders = narrative_placeholders(anchor);

    let mut disclosures = Vec::new();
    for employee_id in &employee_ids {
        if !rng.chance(0.3) {
            continue;
        }
        let count = rng.random_int(1, 2);
        for _ in 0..count {
            let disclosure_type = pick_weighted(&mut rng, DISCLOSURE_TYPES)
                .copied()
                .unwrap_or("conflict_of_interest");
            let status = pick_weighted(&mut rng, DISCLOSURE_STATUSES)
                .copied()
                .unwrap_or("submitted");

            let amount = match disclosure_type {
                "gift" => Some(rng.random_float(25.0, 500.0)),
                "financial_interest" => Some(rng.random_float(1_000.0, 50_000.0)),
                _ => None,
            };

            let submitted_at = anchor - Duration::days(rng.random_int(10, 400));
            let resolved_at = match status {
                "approved" | "denied" | "expired" => {
                    Some(submitted_at + Duration::days(rng.random_int(3, 45)))
                }
                _ => None,
            };

            disclosures.push(Disclosure {
                guid: rng.uuid(),
                employee_id: *employee_id,
                disclosure_type: disclosure_type.to_string(),
                status: status.to_string(),
                description: placeholders.expand(disclosure_template(disclosure_type), &mut rng),
                amount,
                submitted_at,
                resolved_at,
            });
        }
    }

    let written = upsert_disclosures(pool, &disclosures, config.chunk_size).await?;
    info!(disclosures = disclosures.len(), "Seeded disclosures");
    Ok(written)
}

async fn load_employee_ids(pool: &SqlitePool) -> Result<Vec<Uuid>> {
    let rows = sqlx::query("SELECT guid FROM employees ORDER BY email")
        .fetch_all(pool)
        .await?;
    rows.iter()
        .map(|row| parse_uuid(&row.get::<String, _>("guid")))
        .collect()
}
