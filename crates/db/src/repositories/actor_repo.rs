//! Repository for the `actors` table.

use clipdeck_core::types::CatalogId;
use sqlx::PgPool;

use crate::models::actor::{Actor, UpsertActor};

/// Column list for `actors` queries.
const COLUMNS: &str = "id, name, image_url, rating, created_at, updated_at";

/// Provides roster reads and upserts for actors.
pub struct ActorRepo;

impl ActorRepo {
    /// List all actors (generation cross-product input).
    pub async fn list(pool: &PgPool) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors ORDER BY name, id");
        sqlx::query_as::<_, Actor>(&query).fetch_all(pool).await
    }

    /// Find an actor by catalog performer id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = $1");
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create or update an actor keyed by its catalog performer id.
    pub async fn upsert(
        pool: &PgPool,
        id: &CatalogId,
        input: &UpsertActor,
    ) -> Result<Actor, sqlx::Error> {
        let query = format!(
            "INSERT INTO actors (id, name, image_url, rating) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 image_url = EXCLUDED.image_url, \
                 rating = EXCLUDED.rating, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.image_url)
            .bind(input.rating)
            .fetch_one(pool)
            .await
    }
}
