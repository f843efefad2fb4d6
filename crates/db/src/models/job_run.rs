//! Run history models.

use clipdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the append-only `job_runs` table.
///
/// `work_done` is family-specific: playlists refreshed, playlists created,
/// orphans removed, or snapshots written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobRun {
    pub id: DbId,
    pub family: String,
    pub success: bool,
    pub work_done: i32,
    pub errors: Vec<String>,
    pub duration_ms: i64,
    pub created_at: Timestamp,
}

/// DTO for appending one run history entry.
#[derive(Debug, Clone)]
pub struct CreateJobRun {
    pub family: String,
    pub success: bool,
    pub work_done: i32,
    pub errors: Vec<String>,
    pub duration_ms: i64,
}

/// Query parameters for listing run history.
#[derive(Debug, Deserialize)]
pub struct JobRunListQuery {
    /// Family prefix filter (e.g. "maintenance" matches both
    /// "maintenance-scheduled" and "maintenance-manual").
    pub family: Option<String>,
    /// Maximum number of results. Defaults to 20, capped at 100.
    pub limit: Option<i64>,
}
