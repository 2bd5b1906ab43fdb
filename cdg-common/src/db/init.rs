//! Database initialization
//!
//! Creates the demo database on first run and opens it on later runs. Every
//! statement is idempotent (`CREATE TABLE IF NOT EXISTS`), so seeders can be
//! re-run from scratch after a failure without manual cleanup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new demo database: {}", db_path.display());
    } else {
        info!("Opened existing demo database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL keeps re-runs snappy even while a previous run's reader is open
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_organizations_table(&pool).await?;
    create_departments_table(&pool).await?;
    create_employees_table(&pool).await?;
    create_kb_articles_table(&pool).await?;
    create_policies_table(&pool).await?;
    create_policy_translations_table(&pool).await?;
    create_audit_events_table(&pool).await?;
    create_disclosures_table(&pool).await?;
    create_cases_table(&pool).await?;
    create_pattern_pools_table(&pool).await?;
    create_retaliation_chains_table(&pool).await?;

    Ok(pool)
}

async fn create_organizations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS organizations (
            guid TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            industry TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_departments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS departments (
            guid TEXT PRIMARY KEY,
            org_id TEXT NOT NULL REFERENCES organizations(guid) ON DELETE CASCADE,
            name TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (org_id, name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the employees table.
///
/// `manager_id` is self-referential; seeded top-level managers carry NULL.
async fn create_employees_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            guid TEXT PRIMARY KEY,
            org_id TEXT NOT NULL REFERENCES organizations(guid) ON DELETE CASCADE,
            department_id TEXT NOT NULL REFERENCES departments(guid) ON DELETE CASCADE,
            email TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            title TEXT NOT NULL,
            manager_id TEXT REFERENCES employees(guid),
            location TEXT NOT NULL,
            risk_tier TEXT NOT NULL CHECK (risk_tier IN ('low', 'medium', 'high')),
            hired_at TIMESTAMP NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_employees_org ON employees(org_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_employees_manager ON employees(manager_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_kb_articles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kb_articles (
            guid TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            body TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            view_count INTEGER NOT NULL DEFAULT 0,
            published_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (view_count >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_kb_articles_category ON kb_articles(category)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the policies table.
///
/// Natural key is (org, slug, version); upserts key on it so a re-run updates
/// in place instead of duplicating versions.
async fn create_policies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS policies (
            guid TEXT PRIMARY KEY,
            org_id TEXT NOT NULL REFERENCES organizations(guid) ON DELETE CASCADE,
            slug TEXT NOT NULL,
            version INTEGER NOT NULL,
            title TEXT NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('draft', 'published', 'archived')),
            effective_at TIMESTAMP NOT NULL,
            body TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (org_id, slug, version),
            CHECK (version >= 1)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_policy_translations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS policy_translations (
            policy_id TEXT NOT NULL REFERENCES policies(guid) ON DELETE CASCADE,
            language TEXT NOT NULL,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (policy_id, language)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_audit_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_events (
            guid TEXT PRIMARY KEY,
            actor_id TEXT NOT NULL,
            action TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            detail TEXT NOT NULL,
            occurred_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_events_occurred ON audit_events(occurred_at)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_events_entity ON audit_events(entity_type, entity_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_disclosures_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS disclosures (
            guid TEXT PRIMARY KEY,
            employee_id TEXT NOT NULL REFERENCES employees(guid) ON DELETE CASCADE,
            disclosure_type TEXT NOT NULL CHECK (disclosure_type IN ('conflict_of_interest', 'gift', 'outside_employment', 'financial_interest')),
            status TEXT NOT NULL CHECK (status IN ('submitted', 'under_review', 'approved', 'denied', 'expired')),
            description TEXT NOT NULL,
            amount REAL,
            submitted_at TIMESTAMP NOT NULL,
            resolved_at TIMESTAMP,
            CHECK (amount IS NULL OR amount >= 0.0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_disclosures_employee ON disclosures(employee_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_cases_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cases (
            guid TEXT PRIMARY KEY,
            org_id TEXT NOT NULL REFERENCES organizations(guid) ON DELETE CASCADE,
            category TEXT NOT NULL,
            subject_employee_id TEXT REFERENCES employees(guid),
            involved_manager_id TEXT REFERENCES employees(guid),
            narrative TEXT NOT NULL,
            anonymity_rate REAL NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('open', 'investigating', 'closed')),
            opened_at TIMESTAMP NOT NULL,
            CHECK (anonymity_rate >= 0.0 AND anonymity_rate <= 1.0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_cases_subject ON cases(subject_employee_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_pattern_pools_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pattern_pools (
            pool_kind TEXT NOT NULL CHECK (pool_kind IN ('repeat_subject', 'manager_hotspot')),
            member_id TEXT NOT NULL,
            target_quota INTEGER NOT NULL,
            assigned INTEGER NOT NULL DEFAULT 0,
            affinities TEXT NOT NULL DEFAULT '[]',
            PRIMARY KEY (pool_kind, member_id),
            CHECK (target_quota >= 0),
            CHECK (assigned >= 0 AND assigned <= target_quota)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_retaliation_chains_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS retaliation_chains (
            origin_case_id TEXT PRIMARY KEY REFERENCES cases(guid) ON DELETE CASCADE,
            follow_up_case_id TEXT REFERENCES cases(guid),
            category TEXT NOT NULL,
            delay_days INTEGER NOT NULL,
            narrative TEXT NOT NULL,
            CHECK (delay_days >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
