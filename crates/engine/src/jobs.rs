//! Job bodies behind the scheduler's [`JobRunner`] abstraction.
//!
//! The coordinator only sees outcomes, which keeps its guard and timer
//! behavior testable with stub runners; the concrete runners here wire the
//! engine's batch operations to the pool and catalog client.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clipdeck_catalog::CatalogClient;
use clipdeck_db::repositories::SettingsRepo;
use clipdeck_db::DbPool;
use serde::Serialize;

use crate::{backup, generation, maintenance, refresh};

/// Result of one job body execution.
///
/// `work_done` is family-specific (playlists created, orphans removed,
/// playlists refreshed, snapshots written); `detail` carries the full
/// report for synchronous manual triggers.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub success: bool,
    pub work_done: i32,
    pub errors: Vec<String>,
    pub detail: serde_json::Value,
}

impl JobOutcome {
    /// Outcome for a whole-job setup failure.
    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            work_done: 0,
            errors: vec![error],
            detail: serde_json::Value::Null,
        }
    }

    fn from_report<T: Serialize>(report: &T, work_done: i32, errors: &[String]) -> Self {
        Self {
            success: errors.is_empty(),
            work_done,
            errors: errors.to_vec(),
            detail: serde_json::to_value(report).unwrap_or_default(),
        }
    }
}

/// One job family's body.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Execute the job and report its outcome. Implementations catch
    /// their own failures; the scheduler records whatever comes back.
    async fn run(&self) -> JobOutcome;
}

// ---------------------------------------------------------------------------
// Concrete runners
// ---------------------------------------------------------------------------

/// Actor x template playlist generation.
pub struct GenerationJob {
    pub pool: DbPool,
    pub catalog: Arc<CatalogClient>,
}

#[async_trait]
impl JobRunner for GenerationJob {
    async fn run(&self) -> JobOutcome {
        match generation::run_generation(&self.pool, &self.catalog).await {
            Ok(report) => JobOutcome::from_report(
                &report,
                report.playlists_created as i32,
                &report.errors,
            ),
            Err(e) => JobOutcome::failed(e.to_string()),
        }
    }
}

/// Orphaned-item maintenance sweep.
pub struct MaintenanceJob {
    pub pool: DbPool,
    pub catalog: Arc<CatalogClient>,
}

#[async_trait]
impl JobRunner for MaintenanceJob {
    async fn run(&self) -> JobOutcome {
        match maintenance::run_maintenance_check(&self.pool, &self.catalog).await {
            Ok(report) => JobOutcome::from_report(
                &report,
                report.orphans_removed as i32,
                &report.errors,
            ),
            Err(e) => JobOutcome::failed(e.to_string()),
        }
    }
}

/// SMART playlist refresh pass.
pub struct RefreshJob {
    pub pool: DbPool,
    pub catalog: Arc<CatalogClient>,
}

#[async_trait]
impl JobRunner for RefreshJob {
    async fn run(&self) -> JobOutcome {
        match refresh::refresh_smart_playlists(&self.pool, &self.catalog).await {
            Ok(report) => JobOutcome::from_report(
                &report,
                report.playlists_refreshed as i32,
                &report.errors,
            ),
            Err(e) => JobOutcome::failed(e.to_string()),
        }
    }
}

/// Snapshot backup with rotation.
pub struct BackupJob {
    pub pool: DbPool,
    pub backup_dir: PathBuf,
}

impl BackupJob {
    /// Retention count from settings, falling back to the default.
    async fn retain(&self) -> usize {
        match SettingsRepo::get(&self.pool, "backup.retain").await {
            Ok(Some(value)) => value.parse().unwrap_or(backup::DEFAULT_RETAIN),
            _ => backup::DEFAULT_RETAIN,
        }
    }
}

#[async_trait]
impl JobRunner for BackupJob {
    async fn run(&self) -> JobOutcome {
        let retain = self.retain().await;
        match backup::run_backup(&self.pool, &self.backup_dir, retain).await {
            Ok(report) => JobOutcome::from_report(
                &report,
                report.snapshots_written as i32,
                &report.errors,
            ),
            Err(e) => JobOutcome::failed(e.to_string()),
        }
    }
}
