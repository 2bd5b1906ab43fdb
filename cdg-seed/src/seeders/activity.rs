//! Audit-event seeder
//!
//! Generates a browsable activity trail: employees viewing, editing, and
//! routing the entities the other seeders created. Runs last in the batch so
//! the trail covers cases too; standalone runs simply cover whichever entity
//! tables are populated.

use chrono::Duration;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use cdg_common::config::SeedConfig;
use cdg_common::db::models::AuditEvent;
use cdg_common::db::insert_audit_events;
use cdg_common::rng::offsets;
use cdg_common::template::pick_weighted;
use cdg_common::{Error, Result, SeedRng};

use crate::data::templates::{activity_detail_template, narrative_placeholders};
use crate::data::{ACTIVITY_ACTIONS, ACTIVITY_ENTITY_TYPES};
use crate::seeders::{anchor, parse_uuid};

/// Trailing window the event timestamps walk backward over.
const WINDOW_DAYS: i64 = 180;
/// Events per entity, inclusive.
const EVENTS_PER_ENTITY: (i64, i64) = (0, 5);

pub async fn run(pool: &SqlitePool, config: &SeedConfig) -> Result<usize> {
    let actor_ids = load_ids(pool, "SELECT guid FROM employees ORDER BY email").await?;
    if actor_ids.is_empty() {
        return Err(Error::InvalidInput(
            "no employees found; run the org seeder first".into(),
        ));
    }

    let mut rng = SeedRng::with_offset(config.master_seed, offsets::ACTIVITY);
    let anchor = anchor();
    let placeholders = narrative_placeholders(anchor);

    let mut events = Vec::new();
    for entity_type in ACTIVITY_ENTITY_TYPES {
        let query = match *entity_type {
            "case" => "SELECT guid FROM cases ORDER BY guid",
            "policy" => "SELECT guid FROM policies ORDER BY guid",
            "kb_article" => "SELECT guid FROM kb_articles ORDER BY slug",
            "disclosure" => "SELECT guid FROM disclosures ORDER BY guid",
            _ => continue,
        };
        let entity_ids = load_ids(pool, query).await?;

        for entity_id in &entity_ids {
            let event_count = rng.random_int(EVENTS_PER_ENTITY.0, EVENTS_PER_ENTITY.1);
            for _ in 0..event_count {
                let action = pick_weighted(&mut rng, ACTIVITY_ACTIONS)
                    .copied()
                    .unwrap_or("viewed");
                let actor_id = rng.pick(&actor_ids).copied().unwrap_or(Uuid::nil());

                events.push(AuditEvent {
                    guid: rng.uuid(),
                    actor_id,
                    action: action.to_string(),
                    entity_type: entity_type.to_string(),
                    entity_id: *entity_id,
                    detail: placeholders.expand(activity_detail_template(action), &mut rng),
                    occurred_at: anchor - Duration::days(rng.random_int(0, WINDOW_DAYS)),
                });
            }
        }
    }

    let written = insert_audit_events(pool, &events, config.chunk_size).await?;
    info!(events = events.len(), "Seeded activity trail");
    Ok(written)
}

async fn load_ids(pool: &SqlitePool, query: &str) -> Result<Vec<Uuid>> {
    let rows = sqlx::query(query).fetch_all(pool).await?;
    rows.iter()
        .map(|row| parse_uuid(&row.get::<String, _>("guid")))
        .collect()
}
