//! Playlist-item link model.

use clipdeck_core::types::{CatalogId, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `playlist_items` junction table.
///
/// `(playlist_id, item_id)` is unique; `item_order` is dense from 0 within
/// a playlist after any successful reconcile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaylistItem {
    pub playlist_id: DbId,
    pub item_id: CatalogId,
    pub item_order: i32,
    pub created_at: Timestamp,
}
