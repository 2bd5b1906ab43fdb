//! Policy document seeder
//!
//! Every tenant gets the full policy library. Each topic carries one or two
//! versions (the newer one supersedes), a weighted status, and translations in
//! the fixed language set for published versions.

use chrono::Duration;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use cdg_common::config::SeedConfig;
use cdg_common::db::models::{Policy, PolicyTranslation};
use cdg_common::db::{upsert_policies, upsert_policy_translations};
use cdg_common::rng::offsets;
use cdg_common::template::pick_weighted;
use cdg_common::{Error, Result, SeedRng};

use crate::data::templates::{narrative_placeholders, POLICY_BODY_TEMPLATES};
use crate::data::{LANGUAGES, POLICY_STATUSES, POLICY_TOPICS};
use crate::seeders::{anchor, parse_uuid};

pub async fn run(pool: &SqlitePool, config: &SeedConfig) -> Result<usize> {
    let org_ids = load_org_ids(pool).await?;
    if org_ids.is_empty() {
        return Err(Error::InvalidInput(
            "no organizations found; run the org seeder first".into(),
        ));
    }

    let mut rng = SeedRng::with_offset(config.master_seed, offsets::POLICIES);
    let anchor = anchor();
    let placeholders = narrative_placeholders(anchor);

    let mut policies = Vec::new();
    let mut translations = Vec::new();

    for org_id in &org_ids {
        for (slug, title) in POLICY_TOPICS {
            // Roughly a third of the topics carry a superseded version 1
            // alongside the current version 2.
            let latest_version = if rng.chance(0.3) { 2 } else { 1 };
            for version in 1..=latest_version {
                let is_latest = version == latest_version;
                let status = if is_latest {
                    pick_weighted(&mut rng, POLICY_STATUSES)
                        .copied()
                        .unwrap_or("published")
                } else {
                    "archived"
                };

                let body = POLICY_BODY_TEMPLATES
                    .iter()
                    .map(|template| placeholders.expand(template, &mut rng))
                    .collect::<Vec<_>>()
                    .join("\n\n");

                let policy = Policy {
                    guid: rng.uuid(),
                    org_id: *org_id,
                    slug: slug.to_string(),
                    version,
                    title: title.to_string(),
                    status: status.to_string(),
                    effective_at: anchor - Duration::days(rng.random_int(30, 1100)),
                    body,
                };

                if status == "published" {
                    for (language, lead_in) in LANGUAGES {
                        translations.push(PolicyTranslation {
                            policy_id: policy.guid,
                            language: language.to_string(),
                            title: format!("{lead_in}: {title}"),
                            body: format!("{lead_in}.\n\n{}", policy.body),
                        });
                    }
                }

                policies.push(policy);
            }
        }
    }

    let mut written = 0;
    written += upsert_policies(pool, &policies, config.chunk_size).await?;
    written += upsert_policy_translations(pool, &translations, config.chunk_size).await?;

    info!(
        policies = policies.len(),
        translations = translations.len(),
        "Seeded policy library"
    );
    Ok(written)
}

async fn load_org_ids(pool: &SqlitePool) -> Result<Vec<Uuid>> {
    let rows = sqlx::query("SELECT guid FROM organizations ORDER BY slug")
        .fetch_all(pool)
        .await?;
    rows.iter()
        .map(|row| parse_uuid(&row.get::<String, _>("guid")))
        .collect()
}
