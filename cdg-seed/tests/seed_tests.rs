//! End-to-end seeding tests against a throwaway SQLite database.

use std::path::Path;

use sqlx::{Row, SqlitePool};
use tempfile::TempDir;

use cdg_common::config::SeedConfig;
use cdg_common::db::init_database;
use cdg_seed::seeders;

fn test_config(db_path: &Path) -> SeedConfig {
    SeedConfig {
        master_seed: 42,
        db_path: db_path.to_path_buf(),
        chunk_size: 100,
        strict: true,
    }
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

const TABLES: &[&str] = &[
    "organizations",
    "departments",
    "employees",
    "kb_articles",
    "policies",
    "policy_translations",
    "disclosures",
    "cases",
    "pattern_pools",
    "retaliation_chains",
    "audit_events",
];

#[tokio::test]
async fn run_all_populates_every_table() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("demo.db"));
    let pool = init_database(&config.db_path).await.unwrap();

    let written = seeders::run_all(&pool, &config).await.unwrap();
    assert!(written > 0);

    for table in TABLES {
        assert!(count(&pool, table).await > 0, "{table} is empty");
    }

    // Both pool kinds are present and no entry oversteps its quota.
    for kind in ["repeat_subject", "manager_hotspot"] {
        let rows = sqlx::query("SELECT target_quota, assigned FROM pattern_pools WHERE pool_kind = ?")
            .bind(kind)
            .fetch_all(&pool)
            .await
            .unwrap();
        assert!(!rows.is_empty(), "no {kind} pool rows");
        for row in rows {
            assert!(row.get::<i64, _>("assigned") <= row.get::<i64, _>("target_quota"));
        }
    }
}

#[tokio::test]
async fn hotspot_pool_members_manage_direct_reports() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("demo.db"));
    let pool = init_database(&config.db_path).await.unwrap();
    seeders::run_all(&pool, &config).await.unwrap();

    let members = sqlx::query_scalar::<_, String>(
        "SELECT member_id FROM pattern_pools WHERE pool_kind = 'manager_hotspot'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(!members.is_empty());

    for member in members {
        let reports: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE manager_id = ?")
                .bind(&member)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(reports > 0, "hotspot member {member} manages no one");
    }
}

#[tokio::test]
async fn every_chain_links_to_a_retaliation_case() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("demo.db"));
    let pool = init_database(&config.db_path).await.unwrap();
    seeders::run_all(&pool, &config).await.unwrap();

    let rows = sqlx::query(
        r#"
        SELECT c.origin_case_id, c.follow_up_case_id, c.delay_days,
               f.category AS follow_up_category,
               julianday(f.opened_at) - julianday(o.opened_at) AS actual_delay
        FROM retaliation_chains c
        JOIN cases o ON o.guid = c.origin_case_id
        LEFT JOIN cases f ON f.guid = c.follow_up_case_id
        "#,
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(!rows.is_empty());

    for row in rows {
        assert!(
            row.get::<Option<String>, _>("follow_up_case_id").is_some(),
            "unfulfilled chain persisted"
        );
        assert_eq!(row.get::<String, _>("follow_up_category"), "retaliation");
        let expected = row.get::<i64, _>("delay_days") as f64;
        let actual = row.get::<f64, _>("actual_delay");
        assert!((actual - expected).abs() < 0.01, "{actual} vs {expected}");
    }
}

#[tokio::test]
async fn rerun_with_same_seed_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("demo.db"));
    let pool = init_database(&config.db_path).await.unwrap();

    seeders::run_all(&pool, &config).await.unwrap();
    let before: Vec<i64> = {
        let mut counts = Vec::new();
        for table in TABLES {
            counts.push(count(&pool, table).await);
        }
        counts
    };

    seeders::run_all(&pool, &config).await.unwrap();
    for (table, expected) in TABLES.iter().zip(before) {
        assert_eq!(count(&pool, table).await, expected, "{table} grew on re-run");
    }
}

#[tokio::test]
async fn same_seed_reproduces_the_dataset_and_seeds_diverge() {
    let case_guids = |seed: u64| async move {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir.path().join("demo.db"));
        config.master_seed = seed;
        let pool = init_database(&config.db_path).await.unwrap();
        seeders::run_all(&pool, &config).await.unwrap();
        sqlx::query_scalar::<_, String>("SELECT guid FROM cases ORDER BY guid")
            .fetch_all(&pool)
            .await
            .unwrap()
    };

    let a = case_guids(42).await;
    let b = case_guids(42).await;
    let c = case_guids(43).await;
    assert_eq!(a, b);
    assert_ne!(a, c);
}
