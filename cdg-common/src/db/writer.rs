//! Chunked, idempotent record writer
//!
//! All writes follow the same pattern: `INSERT OR IGNORE` to create the row,
//! then an `UPDATE` keyed on the natural unique constraint to refresh mutable
//! fields on re-runs. Records are written in fixed-size chunks, one
//! transaction per chunk, purely to bound single-call payload size; generation
//! itself never touches the database.

use sqlx::SqlitePool;
use tracing::debug;

use crate::db::models::*;
use crate::Result;

pub async fn upsert_organizations(
    pool: &SqlitePool,
    rows: &[Organization],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                "INSERT OR IGNORE INTO organizations (guid, slug, name, industry) VALUES (?, ?, ?, ?)",
            )
            .bind(row.guid.to_string())
            .bind(&row.slug)
            .bind(&row.name)
            .bind(&row.industry)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE organizations SET name = ?, industry = ? WHERE slug = ?")
                .bind(&row.name)
                .bind(&row.industry)
                .bind(&row.slug)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!(table = "organizations", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

pub async fn upsert_departments(
    pool: &SqlitePool,
    rows: &[Department],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query("INSERT OR IGNORE INTO departments (guid, org_id, name) VALUES (?, ?, ?)")
                .bind(row.guid.to_string())
                .bind(row.org_id.to_string())
                .bind(&row.name)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!(table = "departments", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

pub async fn upsert_employees(
    pool: &SqlitePool,
    rows: &[Employee],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO employees
                    (guid, org_id, department_id, email, full_name, title, manager_id, location, risk_tier, hired_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.guid.to_string())
            .bind(row.org_id.to_string())
            .bind(row.department_id.to_string())
            .bind(&row.email)
            .bind(&row.full_name)
            .bind(&row.title)
            .bind(row.manager_id.map(|id| id.to_string()))
            .bind(&row.location)
            .bind(&row.risk_tier)
            .bind(row.hired_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE employees SET title = ?, manager_id = ?, location = ?, risk_tier = ? WHERE email = ?",
            )
            .bind(&row.title)
            .bind(row.manager_id.map(|id| id.to_string()))
            .bind(&row.location)
            .bind(&row.risk_tier)
            .bind(&row.email)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!(table = "employees", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

pub async fn upsert_kb_articles(
    pool: &SqlitePool,
    rows: &[KbArticle],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO kb_articles
                    (guid, slug, title, category, body, tags, view_count, published_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.guid.to_string())
            .bind(&row.slug)
            .bind(&row.title)
            .bind(&row.category)
            .bind(&row.body)
            .bind(&row.tags)
            .bind(row.view_count)
            .bind(row.published_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                UPDATE kb_articles
                SET title = ?, category = ?, body = ?, tags = ?, view_count = ?,
                    updated_at = CURRENT_TIMESTAMP
                WHERE slug = ?
                "#,
            )
            .bind(&row.title)
            .bind(&row.category)
            .bind(&row.body)
            .bind(&row.tags)
            .bind(row.view_count)
            .bind(&row.slug)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!(table = "kb_articles", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

pub async fn upsert_policies(
    pool: &SqlitePool,
    rows: &[Policy],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO policies
                    (guid, org_id, slug, version, title, status, effective_at, body)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.guid.to_string())
            .bind(row.org_id.to_string())
            .bind(&row.slug)
            .bind(row.version)
            .bind(&row.title)
            .bind(&row.status)
            .bind(row.effective_at)
            .bind(&row.body)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                UPDATE policies SET title = ?, status = ?, effective_at = ?, body = ?
                WHERE org_id = ? AND slug = ? AND version = ?
                "#,
            )
            .bind(&row.title)
            .bind(&row.status)
            .bind(row.effective_at)
            .bind(&row.body)
            .bind(row.org_id.to_string())
            .bind(&row.slug)
            .bind(row.version)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!(table = "policies", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

pub async fn upsert_policy_translations(
    pool: &SqlitePool,
    rows: &[PolicyTranslation],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                "INSERT OR IGNORE INTO policy_translations (policy_id, language, title, body) VALUES (?, ?, ?, ?)",
            )
            .bind(row.policy_id.to_string())
            .bind(&row.language)
            .bind(&row.title)
            .bind(&row.body)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE policy_translations SET title = ?, body = ? WHERE policy_id = ? AND language = ?",
            )
            .bind(&row.title)
            .bind(&row.body)
            .bind(row.policy_id.to_string())
            .bind(&row.language)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!(table = "policy_translations", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

/// Audit events are append-only; re-runs with the same seed regenerate the
/// same guids, so `INSERT OR IGNORE` alone keeps them idempotent.
pub async fn insert_audit_events(
    pool: &SqlitePool,
    rows: &[AuditEvent],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO audit_events
                    (guid, actor_id, action, entity_type, entity_id, detail, occurred_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.guid.to_string())
            .bind(row.actor_id.to_string())
            .bind(&row.action)
            .bind(&row.entity_type)
            .bind(row.entity_id.to_string())
            .bind(&row.detail)
            .bind(row.occurred_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!(table = "audit_events", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

pub async fn upsert_disclosures(
    pool: &SqlitePool,
    rows: &[Disclosure],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO disclosures
                    (guid, employee_id, disclosure_type, status, description, amount, submitted_at, resolved_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.guid.to_string())
            .bind(row.employee_id.to_string())
            .bind(&row.disclosure_type)
            .bind(&row.status)
            .bind(&row.description)
            .bind(row.amount)
            .bind(row.submitted_at)
            .bind(row.resolved_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE disclosures SET status = ?, resolved_at = ? WHERE guid = ?")
                .bind(&row.status)
                .bind(row.resolved_at)
                .bind(row.guid.to_string())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!(table = "disclosures", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

pub async fn upsert_cases(
    pool: &SqlitePool,
    rows: &[CaseRecord],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO cases
                    (guid, org_id, category, subject_employee_id, involved_manager_id, narrative, anonymity_rate, status, opened_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.guid.to_string())
            .bind(row.org_id.to_string())
            .bind(&row.category)
            .bind(row.subject_employee_id.map(|id| id.to_string()))
            .bind(row.involved_manager_id.map(|id| id.to_string()))
            .bind(&row.narrative)
            .bind(row.anonymity_rate)
            .bind(&row.status)
            .bind(row.opened_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE cases SET status = ?, narrative = ? WHERE guid = ?")
                .bind(&row.status)
                .bind(&row.narrative)
                .bind(row.guid.to_string())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!(table = "cases", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

pub async fn upsert_pattern_pools(
    pool: &SqlitePool,
    rows: &[PatternPoolRow],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO pattern_pools (pool_kind, member_id, target_quota, assigned, affinities)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&row.pool_kind)
            .bind(row.member_id.to_string())
            .bind(row.target_quota)
            .bind(row.assigned)
            .bind(&row.affinities)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                UPDATE pattern_pools SET target_quota = ?, assigned = ?, affinities = ?
                WHERE pool_kind = ? AND member_id = ?
                "#,
            )
            .bind(row.target_quota)
            .bind(row.assigned)
            .bind(&row.affinities)
            .bind(&row.pool_kind)
            .bind(row.member_id.to_string())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!(table = "pattern_pools", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}

pub async fn upsert_retaliation_chains(
    pool: &SqlitePool,
    rows: &[RetaliationChainRow],
    chunk_size: usize,
) -> Result<usize> {
    for chunk in rows.chunks(chunk_size.max(1)) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO retaliation_chains
                    (origin_case_id, follow_up_case_id, category, delay_days, narrative)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.origin_case_id.to_string())
            .bind(row.follow_up_case_id.map(|id| id.to_string()))
            .bind(&row.category)
            .bind(row.delay_days)
            .bind(&row.narrative)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE retaliation_chains SET follow_up_case_id = ?, narrative = ? WHERE origin_case_id = ?",
            )
            .bind(row.follow_up_case_id.map(|id| id.to_string()))
            .bind(&row.narrative)
            .bind(row.origin_case_id.to_string())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!(table = "retaliation_chains", rows = chunk.len(), "wrote chunk");
    }
    Ok(rows.len())
}
