//! Repository for the `items` table.
//!
//! Reconciliation writes go through the bulk partitioned methods
//! ([`ItemRepo::insert_bulk`] / [`ItemRepo::update_bulk`]) inside the
//! caller's transaction; per-item loops are deliberately absent.

use clipdeck_core::types::CatalogId;
use sqlx::PgPool;

use crate::models::item::{CandidateItem, Item};
use crate::repositories::Tx;

/// Column list for `items` queries.
const COLUMNS: &str = "\
    id, title, start_seconds, end_seconds, screenshot_url, stream_url, \
    preview_url, scene_id, rating, is_orphan, created_at, updated_at";

/// Provides read and bulk-write operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Fetch items by ID.
    pub async fn find_by_ids(pool: &PgPool, ids: &[CatalogId]) -> Result<Vec<Item>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = ANY($1)");
        sqlx::query_as::<_, Item>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Of the given ids, those that already have an Item row. Runs inside
    /// the reconcile transaction so the new/existing partition cannot race
    /// the subsequent writes.
    pub async fn existing_ids(
        tx: &mut Tx<'_>,
        ids: &[CatalogId],
    ) -> Result<Vec<CatalogId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        sqlx::query_scalar("SELECT id FROM items WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Persisted ratings for the given ids, as `(id, rating)` pairs.
    ///
    /// The minimum-rating filter runs against these, not against anything
    /// in the catalog.
    pub async fn ratings_for(
        pool: &PgPool,
        ids: &[CatalogId],
    ) -> Result<Vec<(CatalogId, Option<i32>)>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        sqlx::query_as("SELECT id, rating FROM items WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Bulk-insert new items via a single multi-row `UNNEST` statement.
    ///
    /// Patch fields flatten to NULL (there is no prior value to leave
    /// untouched). `ON CONFLICT DO NOTHING` keeps the insert idempotent if
    /// a concurrent sync created the row first.
    pub async fn insert_bulk(
        tx: &mut Tx<'_>,
        items: &[CandidateItem],
    ) -> Result<(), sqlx::Error> {
        if items.is_empty() {
            return Ok(());
        }

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        let starts: Vec<f64> = items.iter().map(|i| i.start_seconds).collect();
        let ends: Vec<f64> = items.iter().map(|i| i.end_seconds).collect();
        let screenshots: Vec<Option<String>> = items
            .iter()
            .map(|i| CandidateItem::insert_value(&i.screenshot_url))
            .collect();
        let streams: Vec<Option<String>> = items
            .iter()
            .map(|i| CandidateItem::insert_value(&i.stream_url))
            .collect();
        let previews: Vec<Option<String>> = items
            .iter()
            .map(|i| CandidateItem::insert_value(&i.preview_url))
            .collect();
        let scenes: Vec<Option<String>> = items
            .iter()
            .map(|i| CandidateItem::insert_value(&i.scene_id))
            .collect();
        let ratings: Vec<Option<i32>> = items
            .iter()
            .map(|i| CandidateItem::insert_value(&i.rating))
            .collect();

        sqlx::query(
            "INSERT INTO items \
                (id, title, start_seconds, end_seconds, screenshot_url, \
                 stream_url, preview_url, scene_id, rating) \
             SELECT * FROM UNNEST($1::TEXT[], $2::TEXT[], $3::FLOAT8[], $4::FLOAT8[], \
                 $5::TEXT[], $6::TEXT[], $7::TEXT[], $8::TEXT[], $9::INT[]) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&ids)
        .bind(&titles)
        .bind(&starts)
        .bind(&ends)
        .bind(&screenshots)
        .bind(&streams)
        .bind(&previews)
        .bind(&scenes)
        .bind(&ratings)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Bulk-update existing items via a single `UNNEST` join.
    ///
    /// With `preserve_timings`, stored start/end offsets win over candidate
    /// values (refresh semantics: never clobber user-adjusted clip
    /// boundaries). Each patch field carries an apply flag so an omitted
    /// field leaves the column untouched while an explicit null clears it.
    pub async fn update_bulk(
        tx: &mut Tx<'_>,
        items: &[CandidateItem],
        preserve_timings: bool,
    ) -> Result<(), sqlx::Error> {
        if items.is_empty() {
            return Ok(());
        }

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        let starts: Vec<f64> = items.iter().map(|i| i.start_seconds).collect();
        let ends: Vec<f64> = items.iter().map(|i| i.end_seconds).collect();

        let screenshot_apply: Vec<bool> =
            items.iter().map(|i| i.screenshot_url.is_some()).collect();
        let screenshot_value: Vec<Option<String>> = items
            .iter()
            .map(|i| i.screenshot_url.clone().flatten())
            .collect();
        let stream_apply: Vec<bool> = items.iter().map(|i| i.stream_url.is_some()).collect();
        let stream_value: Vec<Option<String>> =
            items.iter().map(|i| i.stream_url.clone().flatten()).collect();
        let preview_apply: Vec<bool> = items.iter().map(|i| i.preview_url.is_some()).collect();
        let preview_value: Vec<Option<String>> = items
            .iter()
            .map(|i| i.preview_url.clone().flatten())
            .collect();
        let scene_apply: Vec<bool> = items.iter().map(|i| i.scene_id.is_some()).collect();
        let scene_value: Vec<Option<String>> =
            items.iter().map(|i| i.scene_id.clone().flatten()).collect();
        let rating_apply: Vec<bool> = items.iter().map(|i| i.rating.is_some()).collect();
        let rating_value: Vec<Option<i32>> =
            items.iter().map(|i| i.rating.flatten()).collect();

        sqlx::query(
            "UPDATE items AS i SET \
                 title = u.title, \
                 start_seconds = CASE WHEN $1 THEN i.start_seconds ELSE u.start_seconds END, \
                 end_seconds = CASE WHEN $1 THEN i.end_seconds ELSE u.end_seconds END, \
                 screenshot_url = CASE WHEN u.screenshot_apply THEN u.screenshot_value ELSE i.screenshot_url END, \
                 stream_url = CASE WHEN u.stream_apply THEN u.stream_value ELSE i.stream_url END, \
                 preview_url = CASE WHEN u.preview_apply THEN u.preview_value ELSE i.preview_url END, \
                 scene_id = CASE WHEN u.scene_apply THEN u.scene_value ELSE i.scene_id END, \
                 rating = CASE WHEN u.rating_apply THEN u.rating_value ELSE i.rating END, \
                 updated_at = NOW() \
             FROM (SELECT \
                 UNNEST($2::TEXT[]) AS id, \
                 UNNEST($3::TEXT[]) AS title, \
                 UNNEST($4::FLOAT8[]) AS start_seconds, \
                 UNNEST($5::FLOAT8[]) AS end_seconds, \
                 UNNEST($6::BOOL[]) AS screenshot_apply, \
                 UNNEST($7::TEXT[]) AS screenshot_value, \
                 UNNEST($8::BOOL[]) AS stream_apply, \
                 UNNEST($9::TEXT[]) AS stream_value, \
                 UNNEST($10::BOOL[]) AS preview_apply, \
                 UNNEST($11::TEXT[]) AS preview_value, \
                 UNNEST($12::BOOL[]) AS scene_apply, \
                 UNNEST($13::TEXT[]) AS scene_value, \
                 UNNEST($14::BOOL[]) AS rating_apply, \
                 UNNEST($15::INT[]) AS rating_value) AS u \
             WHERE i.id = u.id",
        )
        .bind(preserve_timings)
        .bind(&ids)
        .bind(&titles)
        .bind(&starts)
        .bind(&ends)
        .bind(&screenshot_apply)
        .bind(&screenshot_value)
        .bind(&stream_apply)
        .bind(&stream_value)
        .bind(&preview_apply)
        .bind(&preview_value)
        .bind(&scene_apply)
        .bind(&scene_value)
        .bind(&rating_apply)
        .bind(&rating_value)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// List every item (snapshot backup input).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items ORDER BY id");
        sqlx::query_as::<_, Item>(&query).fetch_all(pool).await
    }

    /// `(item_id, scene_id)` pairs for all non-orphaned items that carry a
    /// scene back-reference (maintenance sweep input).
    pub async fn scene_refs(pool: &PgPool) -> Result<Vec<(CatalogId, CatalogId)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, scene_id FROM items \
             WHERE is_orphan = false AND scene_id IS NOT NULL \
             ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// Delete items and their playlist links, links first so no dangling
    /// references can be observed.
    ///
    /// Returns the number of items deleted.
    pub async fn delete_with_links(
        tx: &mut Tx<'_>,
        ids: &[CatalogId],
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        sqlx::query("DELETE FROM playlist_items WHERE item_id = ANY($1)")
            .bind(ids)
            .execute(&mut **tx)
            .await?;

        let result = sqlx::query("DELETE FROM items WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}
