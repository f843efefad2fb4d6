//! Repository for the `playlists` table.

use clipdeck_core::conditions::ConditionSet;
use clipdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::playlist::{CreatePlaylist, Playlist, UpdatePlaylist, KIND_SMART};

/// Column list for `playlists` queries.
const COLUMNS: &str = "\
    id, name, kind, description, cover_image, performer_ids, \
    required_tag_ids, optional_tag_ids, tag_ids, min_rating, \
    created_at, updated_at";

/// Provides CRUD operations for playlists.
pub struct PlaylistRepo;

impl PlaylistRepo {
    /// Insert a new playlist.
    ///
    /// The condition set (if any) is normalized so the legacy flattened
    /// tag list is written in sync with the split lists.
    pub async fn create(pool: &PgPool, input: &CreatePlaylist) -> Result<Playlist, sqlx::Error> {
        let cond = input
            .condition
            .clone()
            .unwrap_or_default()
            .normalized();

        let query = format!(
            "INSERT INTO playlists \
                (name, kind, description, cover_image, performer_ids, \
                 required_tag_ids, optional_tag_ids, tag_ids, min_rating) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(&input.description)
            .bind(&input.cover_image)
            .bind(&cond.performer_ids)
            .bind(&cond.required_tag_ids)
            .bind(&cond.optional_tag_ids)
            .bind(&cond.tag_ids)
            .bind(cond.min_rating)
            .fetch_one(pool)
            .await
    }

    /// Insert a SMART playlist from a condition set (generation path).
    pub async fn create_smart(
        pool: &PgPool,
        name: &str,
        condition: &ConditionSet,
    ) -> Result<Playlist, sqlx::Error> {
        let input = CreatePlaylist {
            name: name.to_string(),
            kind: KIND_SMART.to_string(),
            description: None,
            cover_image: None,
            condition: Some(condition.clone()),
        };
        Self::create(pool, &input).await
    }

    /// Find a playlist by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM playlists WHERE id = $1");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all playlists.
    pub async fn list(pool: &PgPool) -> Result<Vec<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM playlists ORDER BY name, id");
        sqlx::query_as::<_, Playlist>(&query).fetch_all(pool).await
    }

    /// List all SMART playlists (refresh pass input).
    pub async fn list_smart(pool: &PgPool) -> Result<Vec<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM playlists WHERE kind = $1 ORDER BY id");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(KIND_SMART)
            .fetch_all(pool)
            .await
    }

    /// All playlist names, used to seed the generation dedup set.
    pub async fn list_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM playlists")
            .fetch_all(pool)
            .await
    }

    /// Update a playlist. Scalar fields apply only when non-`None`; a
    /// present condition set replaces all condition columns at once so the
    /// legacy list cannot drift.
    ///
    /// Returns `None` if no playlist with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlaylist,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        match &input.condition {
            Some(cond) => {
                let cond = cond.clone().normalized();
                let query = format!(
                    "UPDATE playlists SET \
                         name = COALESCE($2, name), \
                         description = COALESCE($3, description), \
                         cover_image = COALESCE($4, cover_image), \
                         performer_ids = $5, \
                         required_tag_ids = $6, \
                         optional_tag_ids = $7, \
                         tag_ids = $8, \
                         min_rating = $9, \
                         updated_at = NOW() \
                     WHERE id = $1 \
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, Playlist>(&query)
                    .bind(id)
                    .bind(&input.name)
                    .bind(&input.description)
                    .bind(&input.cover_image)
                    .bind(&cond.performer_ids)
                    .bind(&cond.required_tag_ids)
                    .bind(&cond.optional_tag_ids)
                    .bind(&cond.tag_ids)
                    .bind(cond.min_rating)
                    .fetch_optional(pool)
                    .await
            }
            None => {
                let query = format!(
                    "UPDATE playlists SET \
                         name = COALESCE($2, name), \
                         description = COALESCE($3, description), \
                         cover_image = COALESCE($4, cover_image), \
                         updated_at = NOW() \
                     WHERE id = $1 \
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, Playlist>(&query)
                    .bind(id)
                    .bind(&input.name)
                    .bind(&input.description)
                    .bind(&input.cover_image)
                    .fetch_optional(pool)
                    .await
            }
        }
    }

    /// Delete a playlist by ID. Cascade deletes its links.
    ///
    /// Returns `true` if a playlist was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
