//! Pattern seeder: cases, analytical pools, retaliation chains
//!
//! This is the step that makes the demo data tell a story. It builds two
//! quota-bounded pools (repeat-subject employees and hotspot managers), then
//! generates the case load, drawing subjects and involved managers from the
//! pools so the analytics dashboards have visible clusters. A slice of the
//! non-retaliation cases is picked as chain origins; each origin gets a
//! retaliation follow-up case opened after the chain's delay, and the chain
//! row records the link.
//!
//! Three independent seed streams keep the pools and the chain layout stable
//! against each other: changing the case count does not reshuffle pool
//! membership, and vice versa.

use chrono::Duration;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use cdg_common::chain::ChainSet;
use cdg_common::config::SeedConfig;
use cdg_common::db::models::{CaseRecord, PatternPoolRow, RetaliationChainRow};
use cdg_common::db::{upsert_cases, upsert_pattern_pools, upsert_retaliation_chains};
use cdg_common::pool::AssignmentPool;
use cdg_common::rng::offsets;
use cdg_common::template::pick_weighted;
use cdg_common::{Error, Result, SeedRng};

use crate::data::templates::{
    case_registry, narrative_placeholders, retaliation_registry, RETALIATION_CATEGORIES,
};
use crate::data::{CASE_CATEGORIES, CASE_STATUSES, PREFERRED_PATTERN_CATEGORIES};
use crate::seeders::{anchor, parse_uuid};

const CASE_COUNT: usize = 150;

const REPEAT_SUBJECT_POOL_SIZE: usize = 10;
const REPEAT_SUBJECT_QUOTA: (u32, u32) = (3, 6);
/// Chance a generated case's subject is drawn from the repeat-subject pool
/// rather than the general population.
const REPEAT_SUBJECT_DRAW: f64 = 0.5;
/// Chance a non-pool case names a random subject at all; the rest stay
/// anonymous.
const NAMED_SUBJECT_DRAW: f64 = 0.6;

const HOTSPOT_POOL_SIZE: usize = 6;
const HOTSPOT_QUOTA: (u32, u32) = (2, 4);
const HOTSPOT_DRAW: f64 = 0.35;

/// Fraction of generated cases that become retaliation chain origins.
const CHAIN_FRACTION: f64 = 0.12;
const CHAIN_DELAY_DAYS: (i64, i64) = (7, 45);

struct EmployeeRef {
    guid: Uuid,
    org_id: Uuid,
}

pub async fn run(pool: &SqlitePool, config: &SeedConfig) -> Result<usize> {
    let employees = load_employees(pool).await?;
    if employees.is_empty() {
        return Err(Error::InvalidInput(
            "no employees found; run the org seeder first".into(),
        ));
    }

    let anchor = anchor();
    let placeholders = narrative_placeholders(anchor);
    let registry = case_registry();

    let employee_ids: Vec<String> = employees.iter().map(|e| e.guid.to_string()).collect();
    let manager_ids = load_manager_ids(pool).await?;
    let org_of: std::collections::HashMap<String, Uuid> = employees
        .iter()
        .map(|e| (e.guid.to_string(), e.org_id))
        .collect();
    let category_keys: Vec<&str> = CASE_CATEGORIES.iter().map(|(k, _)| *k).collect();

    // Pool membership is drawn on its own streams so it stays put when the
    // case count changes.
    let mut subject_rng = SeedRng::with_offset(config.master_seed, offsets::REPEAT_SUBJECTS);
    let mut repeat_pool = AssignmentPool::build_with_affinities(
        &mut subject_rng,
        &employee_ids,
        REPEAT_SUBJECT_POOL_SIZE,
        REPEAT_SUBJECT_QUOTA,
        PREFERRED_PATTERN_CATEGORIES,
        &category_keys,
    )
    .strict(config.strict);

    let mut hotspot_rng = SeedRng::with_offset(config.master_seed, offsets::MANAGER_HOTSPOTS);
    let mut hotspot_pool = AssignmentPool::build(
        &mut hotspot_rng,
        &manager_ids,
        HOTSPOT_POOL_SIZE,
        HOTSPOT_QUOTA,
    )
    .strict(config.strict);

    let mut cases = Vec::with_capacity(CASE_COUNT);
    for _ in 0..CASE_COUNT {
        let category = pick_weighted(&mut subject_rng, CASE_CATEGORIES)
            .copied()
            .unwrap_or("policy_violation");
        let rendered = registry.render(category, &placeholders, &mut subject_rng);

        let subject_employee_id = if subject_rng.chance(REPEAT_SUBJECT_DRAW) {
            match repeat_pool.request_assignment(Some(rendered.category.as_str())) {
                Some(entry) => {
                    let id = entry.id.clone();
                    repeat_pool.mark_assigned(&id)?;
                    Some(parse_uuid(&id)?)
                }
                None => None,
            }
        } else if subject_rng.chance(NAMED_SUBJECT_DRAW) {
            subject_rng
                .pick(&employee_ids)
                .map(|id| parse_uuid(id))
                .transpose()?
        } else {
            None
        };

        let involved_manager_id = if subject_rng.chance(HOTSPOT_DRAW) {
            match hotspot_pool.request_assignment(None) {
                Some(entry) => {
                    let id = entry.id.clone();
                    hotspot_pool.mark_assigned(&id)?;
                    Some(parse_uuid(&id)?)
                }
                None => None,
            }
        } else {
            None
        };

        let org_id = subject_employee_id
            .or(involved_manager_id)
            .and_then(|id| org_of.get(&id.to_string()).copied())
            .or_else(|| subject_rng.pick(&employees).map(|e| e.org_id));
        let org_id = match org_id {
            Some(id) => id,
            None => continue,
        };

        let status = pick_weighted(&mut subject_rng, CASE_STATUSES)
            .copied()
            .unwrap_or("open");

        cases.push(CaseRecord {
            guid: subject_rng.uuid(),
            org_id,
            category: rendered.category,
            subject_employee_id,
            involved_manager_id,
            narrative: rendered.text,
            anonymity_rate: rendered.rate,
            status: status.to_string(),
            opened_at: anchor - Duration::days(subject_rng.random_int(1, 540)),
        });
    }

    // Chain origins come only from cases that are not already retaliation
    // reports.
    let mut chain_rng = SeedRng::with_offset(config.master_seed, offsets::RETALIATION);
    let origin_ids: Vec<String> = cases
        .iter()
        .filter(|c| c.category != "retaliation")
        .map(|c| c.guid.to_string())
        .collect();
    let target_chains = (cases.len() as f64 * CHAIN_FRACTION).round() as usize;
    let mut chains = ChainSet::build(
        &mut chain_rng,
        &origin_ids,
        target_chains,
        RETALIATION_CATEGORIES,
        &retaliation_registry(),
        &placeholders,
        CHAIN_DELAY_DAYS,
    )
    .strict(config.strict);

    let retaliation_rate = case_registry().resolve("retaliation").1.rate;
    let planned: Vec<(String, i64, String)> = chains
        .chains()
        .iter()
        .map(|c| (c.origin_id.clone(), c.delay_days, c.narrative.clone()))
        .collect();
    for (origin_id, delay_days, narrative) in planned {
        let origin = match cases.iter().find(|c| c.guid.to_string() == origin_id) {
            Some(case) => case,
            None => continue,
        };
        let follow_up = CaseRecord {
            guid: chain_rng.uuid(),
            org_id: origin.org_id,
            category: "retaliation".to_string(),
            subject_employee_id: origin.subject_employee_id,
            involved_manager_id: origin.involved_manager_id,
            narrative,
            anonymity_rate: retaliation_rate,
            status: pick_weighted(&mut chain_rng, CASE_STATUSES)
                .copied()
                .unwrap_or("open")
                .to_string(),
            opened_at: origin.opened_at + Duration::days(delay_days),
        };
        chains.fulfill(&origin_id, &follow_up.guid.to_string())?;
        cases.push(follow_up);
    }

    let mut pools = pool_rows("repeat_subject", &repeat_pool)?;
    pools.extend(pool_rows("manager_hotspot", &hotspot_pool)?);

    let chain_rows = chains
        .chains()
        .iter()
        .map(|c| {
            Ok(RetaliationChainRow {
                origin_case_id: parse_uuid(&c.origin_id)?,
                follow_up_case_id: c.follow_up_id.as_deref().map(parse_uuid).transpose()?,
                category: c.category.clone(),
                delay_days: c.delay_days,
                narrative: c.narrative.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut written = 0;
    written += upsert_cases(pool, &cases, config.chunk_size).await?;
    written += upsert_pattern_pools(pool, &pools, config.chunk_size).await?;
    written += upsert_retaliation_chains(pool, &chain_rows, config.chunk_size).await?;

    let stats = chains.stats();
    info!(
        cases = cases.len(),
        repeat_subjects = repeat_pool.len(),
        hotspot_managers = hotspot_pool.len(),
        chains = stats.total,
        chains_fulfilled = stats.fulfilled,
        average_delay_days = format!("{:.1}", stats.average_delay_days),
        "Seeded case patterns"
    );
    Ok(written)
}

fn pool_rows(kind: &str, pool: &AssignmentPool) -> Result<Vec<PatternPoolRow>> {
    pool.entries()
        .iter()
        .map(|entry| {
            Ok(PatternPoolRow {
                pool_kind: kind.to_string(),
                member_id: parse_uuid(&entry.id)?,
                target_quota: entry.target_quota as i64,
                assigned: entry.assigned as i64,
                affinities: serde_json::to_string(&entry.affinities)
                    .map_err(|e| Error::Internal(format!("affinity serialization: {e}")))?,
            })
        })
        .collect()
}

async fn load_employees(pool: &SqlitePool) -> Result<Vec<EmployeeRef>> {
    let rows = sqlx::query("SELECT guid, org_id FROM employees ORDER BY email")
        .fetch_all(pool)
        .await?;
    rows.iter()
        .map(|row| {
            Ok(EmployeeRef {
                guid: parse_uuid(&row.get::<String, _>("guid"))?,
                org_id: parse_uuid(&row.get::<String, _>("org_id"))?,
            })
        })
        .collect()
}

/// Hotspot candidates are employees who actually manage someone.
async fn load_manager_ids(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT DISTINCT manager_id FROM employees WHERE manager_id IS NOT NULL ORDER BY manager_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .iter()
        .map(|row| row.get::<String, _>("manager_id"))
        .collect())
}
