//! Item model (denormalized catalog marker cache) and the reconciliation
//! candidate DTO.

use clipdeck_core::types::{CatalogId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `items` table.
///
/// The primary key is the catalog-assigned marker id. Ratings are local
/// user data and are never written by catalog-driven refreshes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: CatalogId,
    pub title: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub screenshot_url: Option<String>,
    pub stream_url: Option<String>,
    pub preview_url: Option<String>,
    pub scene_id: Option<CatalogId>,
    pub rating: Option<i32>,
    pub is_orphan: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One candidate row for playlist reconciliation.
///
/// Optional fields use the double-`Option` convention of the manual sync
/// API: an omitted field (`None`) leaves the stored column untouched, an
/// explicit `null` (`Some(None)`) clears it, and a value (`Some(Some(v))`)
/// writes it. This distinction must survive normalization all the way into
/// the update statement.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateItem {
    pub id: CatalogId,
    pub title: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    #[serde(default, deserialize_with = "patch_field")]
    pub screenshot_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub stream_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub preview_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub scene_id: Option<Option<CatalogId>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub rating: Option<Option<i32>>,
}

/// Deserialize a patch field: a present value (including explicit `null`)
/// becomes `Some(inner)`, while an omitted field falls back to the `None`
/// default. Plain `Option<Option<T>>` would collapse `null` into the
/// outer `None` and lose the distinction.
fn patch_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

impl CandidateItem {
    /// Flatten a patch field for inserts, where "untouched" means NULL.
    pub fn insert_value<T: Clone>(field: &Option<Option<T>>) -> Option<T> {
        field.clone().flatten()
    }
}
