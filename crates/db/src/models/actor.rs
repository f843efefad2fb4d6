//! Actor model and DTOs.

use clipdeck_core::types::{CatalogId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `actors` table: a catalog performer mirrored locally.
/// Drives per-actor SMART playlist generation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Actor {
    pub id: CatalogId,
    pub name: String,
    pub image_url: Option<String>,
    pub rating: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting an actor (roster upkeep from the route layer).
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertActor {
    pub name: String,
    pub image_url: Option<String>,
    pub rating: Option<i32>,
}
