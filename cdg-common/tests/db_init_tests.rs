//! Integration tests for database initialization and the chunked writer

use cdg_common::db::models::{KbArticle, Organization};
use cdg_common::db::{init_database, upsert_kb_articles, upsert_organizations};
use cdg_common::SeedRng;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

fn temp_db() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("demo.db");
    (dir, path)
}

#[tokio::test]
async fn creates_database_when_missing() {
    let (_dir, db_path) = temp_db();
    assert!(!db_path.exists());

    let pool = init_database(&db_path).await.expect("init");
    assert!(db_path.exists(), "database file was not created");

    let fk_enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(fk_enabled, 1, "foreign keys should be enabled");
}

#[tokio::test]
async fn all_tables_exist_after_init() {
    let (_dir, db_path) = temp_db();
    let pool = init_database(&db_path).await.unwrap();

    let tables = [
        "organizations",
        "departments",
        "employees",
        "kb_articles",
        "policies",
        "policy_translations",
        "audit_events",
        "disclosures",
        "cases",
        "pattern_pools",
        "retaliation_chains",
    ];

    for table in tables {
        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(exists, 1, "table '{table}' not created");
    }
}

#[tokio::test]
async fn init_is_idempotent() {
    let (_dir, db_path) = temp_db();
    let pool1 = init_database(&db_path).await.unwrap();
    drop(pool1);
    let pool2 = init_database(&db_path).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn upsert_is_idempotent_on_rerun() {
    let (_dir, db_path) = temp_db();
    let pool = init_database(&db_path).await.unwrap();

    let mut rng = SeedRng::new(42);
    let org = Organization {
        guid: rng.uuid(),
        slug: "acme-corp".to_string(),
        name: "Acme Corp".to_string(),
        industry: "manufacturing".to_string(),
    };

    upsert_organizations(&pool, &[org.clone()], 100).await.unwrap();
    upsert_organizations(&pool, &[org.clone()], 100).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1, "re-run duplicated an organization");
}

#[tokio::test]
async fn upsert_refreshes_mutable_fields() {
    let (_dir, db_path) = temp_db();
    let pool = init_database(&db_path).await.unwrap();

    let mut rng = SeedRng::new(42);
    let mut org = Organization {
        guid: rng.uuid(),
        slug: "acme-corp".to_string(),
        name: "Acme Corp".to_string(),
        industry: "manufacturing".to_string(),
    };
    upsert_organizations(&pool, &[org.clone()], 100).await.unwrap();

    org.name = "Acme Corporation".to_string();
    upsert_organizations(&pool, &[org], 100).await.unwrap();

    let name: String = sqlx::query_scalar("SELECT name FROM organizations WHERE slug = 'acme-corp'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(name, "Acme Corporation");
}

#[tokio::test]
async fn chunked_write_handles_more_rows_than_chunk_size() {
    let (_dir, db_path) = temp_db();
    let pool = init_database(&db_path).await.unwrap();

    let mut rng = SeedRng::new(42);
    let published_at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
    let rows: Vec<KbArticle> = (0..250i64)
        .map(|i| KbArticle {
            guid: rng.uuid(),
            slug: format!("article-{i}"),
            title: format!("Article {i}"),
            category: "policy_violation".to_string(),
            body: "Body text.".to_string(),
            tags: "[]".to_string(),
            view_count: i,
            published_at,
        })
        .collect();

    // Chunk size 100 over 250 rows: 3 transactions, all rows land.
    let written = upsert_kb_articles(&pool, &rows, 100).await.unwrap();
    assert_eq!(written, 250);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kb_articles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 250);
}
