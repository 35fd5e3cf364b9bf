//! Repository for the `ideas` catalog table.

use ideaforge_core::idea::{Category, IdeaRecord};
use sqlx::PgPool;

use crate::models::idea::Idea;

const COLUMNS: &str = "id, name, description, category, genre, viability, originality, \
                        market_appeal, scope, source, created_at, updated_at";

pub struct IdeaRepo;

impl IdeaRepo {
    /// Insert the record or overwrite the existing entry with the same name.
    pub async fn upsert(pool: &PgPool, record: &IdeaRecord) -> Result<Idea, sqlx::Error> {
        let query = format!(
            "INSERT INTO ideas
                (name, description, category, genre, viability, originality, market_appeal, scope, source)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT ON CONSTRAINT uq_ideas_name DO UPDATE SET
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                genre = EXCLUDED.genre,
                viability = EXCLUDED.viability,
                originality = EXCLUDED.originality,
                market_appeal = EXCLUDED.market_appeal,
                scope = EXCLUDED.scope,
                source = EXCLUDED.source
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(&record.name)
            .bind(&record.description)
            .bind(record.category.as_str())
            .bind(&record.genre)
            .bind(record.viability)
            .bind(record.viability_breakdown.originality)
            .bind(record.viability_breakdown.market_appeal)
            .bind(record.viability_breakdown.scope)
            .bind(&record.source)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas WHERE name = $1");
        sqlx::query_as::<_, Idea>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Page through the catalog, most recently updated first.
    pub async fn list(
        pool: &PgPool,
        category: Option<Category>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Idea>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ideas
             WHERE ($1::TEXT IS NULL OR category = $1)
             ORDER BY updated_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(category.map(Category::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
