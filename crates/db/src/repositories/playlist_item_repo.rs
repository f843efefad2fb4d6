//! Repository for the `playlist_items` junction table.

use clipdeck_core::types::{CatalogId, DbId};
use sqlx::PgPool;

use crate::models::item::Item;
use crate::models::playlist_item::PlaylistItem;
use crate::repositories::Tx;

/// Column list for `playlist_items` queries.
const COLUMNS: &str = "playlist_id, item_id, item_order, created_at";

/// Column list for `items` rows fetched through the junction.
const ITEM_COLUMNS: &str = "\
    i.id, i.title, i.start_seconds, i.end_seconds, i.screenshot_url, \
    i.stream_url, i.preview_url, i.scene_id, i.rating, i.is_orphan, \
    i.created_at, i.updated_at";

/// Provides link reads and the bulk link mutations used by reconciliation.
pub struct PlaylistItemRepo;

impl PlaylistItemRepo {
    /// All links for a playlist in playback order, read inside the
    /// reconcile transaction.
    pub async fn links_for(
        tx: &mut Tx<'_>,
        playlist_id: DbId,
    ) -> Result<Vec<PlaylistItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM playlist_items \
             WHERE playlist_id = $1 \
             ORDER BY item_order"
        );
        sqlx::query_as::<_, PlaylistItem>(&query)
            .bind(playlist_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Every link in the store (snapshot backup input).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<PlaylistItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM playlist_items ORDER BY playlist_id, item_order"
        );
        sqlx::query_as::<_, PlaylistItem>(&query).fetch_all(pool).await
    }

    /// Number of links in a playlist.
    pub async fn count_for(pool: &PgPool, playlist_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM playlist_items WHERE playlist_id = $1")
            .bind(playlist_id)
            .fetch_one(pool)
            .await
    }

    /// The playlist's items in playback order (route-layer listing).
    pub async fn list_items(pool: &PgPool, playlist_id: DbId) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM playlist_items pi \
             JOIN items i ON i.id = pi.item_id \
             WHERE pi.playlist_id = $1 \
             ORDER BY pi.item_order"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(playlist_id)
            .fetch_all(pool)
            .await
    }

    /// Bulk-create links at the given orders.
    pub async fn insert_links(
        tx: &mut Tx<'_>,
        playlist_id: DbId,
        links: &[(CatalogId, i32)],
    ) -> Result<(), sqlx::Error> {
        if links.is_empty() {
            return Ok(());
        }
        let ids: Vec<&str> = links.iter().map(|(id, _)| id.as_str()).collect();
        let orders: Vec<i32> = links.iter().map(|(_, order)| *order).collect();

        sqlx::query(
            "INSERT INTO playlist_items (playlist_id, item_id, item_order) \
             SELECT $1, UNNEST($2::TEXT[]), UNNEST($3::INT[])",
        )
        .bind(playlist_id)
        .bind(&ids)
        .bind(&orders)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Bulk-correct the order of existing links.
    pub async fn move_links(
        tx: &mut Tx<'_>,
        playlist_id: DbId,
        moves: &[(CatalogId, i32)],
    ) -> Result<(), sqlx::Error> {
        if moves.is_empty() {
            return Ok(());
        }
        let ids: Vec<&str> = moves.iter().map(|(id, _)| id.as_str()).collect();
        let orders: Vec<i32> = moves.iter().map(|(_, order)| *order).collect();

        sqlx::query(
            "UPDATE playlist_items AS pi SET item_order = u.item_order \
             FROM (SELECT UNNEST($2::TEXT[]) AS item_id, UNNEST($3::INT[]) AS item_order) AS u \
             WHERE pi.playlist_id = $1 AND pi.item_id = u.item_id",
        )
        .bind(playlist_id)
        .bind(&ids)
        .bind(&orders)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Bulk-remove links whose item left the candidate set.
    pub async fn delete_links(
        tx: &mut Tx<'_>,
        playlist_id: DbId,
        item_ids: &[CatalogId],
    ) -> Result<(), sqlx::Error> {
        if item_ids.is_empty() {
            return Ok(());
        }
        sqlx::query("DELETE FROM playlist_items WHERE playlist_id = $1 AND item_id = ANY($2)")
            .bind(playlist_id)
            .bind(item_ids)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
