//! Knowledge-base article seeder
//!
//! One article per entry in the static title table, with a templated body,
//! tag set, and view count. Articles are keyed by slug.

use chrono::Duration;
use sqlx::SqlitePool;
use tracing::info;

use cdg_common::config::SeedConfig;
use cdg_common::db::models::KbArticle;
use cdg_common::db::upsert_kb_articles;
use cdg_common::rng::offsets;
use cdg_common::{Error, Result, SeedRng};

use crate::data::templates::{narrative_placeholders, KB_BODY_TEMPLATES};
use crate::data::{slugify, KB_ARTICLES, KB_TAGS};
use crate::seeders::anchor;

pub async fn run(pool: &SqlitePool, config: &SeedConfig) -> Result<usize> {
    let mut rng = SeedRng::with_offset(config.master_seed, offsets::KNOWLEDGE_BASE);
    let anchor = anchor();
    let placeholders = narrative_placeholders(anchor);

    let mut articles = Vec::with_capacity(KB_ARTICLES.len());
    for (category, title) in KB_ARTICLES {
        let paragraph_count = rng.random_int(2, 3) as usize;
        let body = rng
            .sample_distinct(KB_BODY_TEMPLATES, paragraph_count)
            .iter()
            .map(|template| placeholders.expand(template, &mut rng))
            .collect::<Vec<_>>()
            .join("\n\n");

        let tag_count = rng.random_int(1, 3) as usize;
        let tags = serde_json::to_string(&rng.sample_distinct(KB_TAGS, tag_count))
            .map_err(|e| Error::Internal(format!("tag serialization: {e}")))?;

        articles.push(KbArticle {
            guid: rng.uuid(),
            slug: slugify(title),
            title: title.to_string(),
            category: category.to_string(),
            body,
            tags,
            view_count: rng.random_int(50, 5000),
            published_at: anchor - Duration::days(rng.random_int(30, 720)),
        });
    }

    let written = upsert_kb_articles(pool, &articles, config.chunk_size).await?;
    info!(articles = articles.len(), "Seeded knowledge base");
    Ok(written)
}
