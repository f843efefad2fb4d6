//! Snapshot backup and rotation.
//!
//! Serializes playlists, links, items, templates, actors, and settings to
//! a timestamped JSON file, then prunes old snapshots beyond the retention
//! count. Restore is external tooling's concern.

use std::path::Path;

use chrono::Utc;
use clipdeck_core::types::Timestamp;
use clipdeck_db::models::actor::Actor;
use clipdeck_db::models::item::Item;
use clipdeck_db::models::playlist::Playlist;
use clipdeck_db::models::playlist_item::PlaylistItem;
use clipdeck_db::models::setting::Setting;
use clipdeck_db::models::template::Template;
use clipdeck_db::repositories::{
    ActorRepo, ItemRepo, PlaylistItemRepo, PlaylistRepo, SettingsRepo, TemplateRepo,
};
use clipdeck_db::DbPool;
use serde::Serialize;

use crate::error::EngineError;

/// Snapshot file name prefix; rotation only considers matching files.
pub const BACKUP_PREFIX: &str = "clipdeck-backup-";

/// Default number of snapshots retained (settings key `backup.retain`).
pub const DEFAULT_RETAIN: usize = 7;

/// Aggregate result of one backup run.
#[derive(Debug, Default, Serialize)]
pub struct BackupReport {
    pub snapshots_written: usize,
    pub bytes_written: u64,
    pub files_pruned: usize,
    pub errors: Vec<String>,
    pub duration_ms: i64,
}

/// Full-store snapshot payload.
#[derive(Debug, Serialize)]
struct Snapshot {
    created_at: Timestamp,
    playlists: Vec<Playlist>,
    playlist_items: Vec<PlaylistItem>,
    items: Vec<Item>,
    templates: Vec<Template>,
    actors: Vec<Actor>,
    settings: Vec<Setting>,
}

/// Write one snapshot and rotate old ones.
///
/// Read or serialization failures abort the run; a rotation failure after
/// a successful write is recorded as an error on an otherwise successful
/// report.
pub async fn run_backup(
    pool: &DbPool,
    backup_dir: &Path,
    retain: usize,
) -> Result<BackupReport, EngineError> {
    let started = std::time::Instant::now();
    let mut report = BackupReport::default();

    let snapshot = Snapshot {
        created_at: Utc::now(),
        playlists: PlaylistRepo::list(pool).await?,
        playlist_items: PlaylistItemRepo::list_all(pool).await?,
        items: ItemRepo::list_all(pool).await?,
        templates: TemplateRepo::list(pool).await?,
        actors: ActorRepo::list(pool).await?,
        settings: SettingsRepo::list(pool).await?,
    };

    let payload = serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| clipdeck_core::error::CoreError::Internal(e.to_string()))?;

    tokio::fs::create_dir_all(backup_dir).await?;
    let file_name = format!(
        "{BACKUP_PREFIX}{}.json",
        snapshot.created_at.format("%Y%m%dT%H%M%SZ")
    );
    let path = backup_dir.join(&file_name);
    tokio::fs::write(&path, &payload).await?;

    report.snapshots_written = 1;
    report.bytes_written = payload.len() as u64;

    match rotate(backup_dir, retain).await {
        Ok(pruned) => report.files_pruned = pruned,
        Err(e) => report.errors.push(format!("rotation failed: {e}")),
    }

    report.duration_ms = started.elapsed().as_millis() as i64;
    tracing::info!(
        file = %path.display(),
        bytes = report.bytes_written,
        pruned = report.files_pruned,
        duration_ms = report.duration_ms,
        "Backup finished"
    );
    Ok(report)
}

/// Delete snapshots beyond the newest `retain`.
async fn rotate(backup_dir: &Path, retain: usize) -> Result<usize, EngineError> {
    let mut names: Vec<String> = Vec::new();
    let mut entries = tokio::fs::read_dir(backup_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    let stale = files_to_prune(names, retain);
    let pruned = stale.len();
    for name in stale {
        tokio::fs::remove_file(backup_dir.join(name)).await?;
    }
    Ok(pruned)
}

/// Snapshot file names to delete, keeping the newest `retain`.
///
/// Snapshot names embed a UTC timestamp, so lexicographic order is
/// chronological order.
pub fn files_to_prune(names: Vec<String>, retain: usize) -> Vec<String> {
    let mut snapshots: Vec<String> = names
        .into_iter()
        .filter(|n| n.starts_with(BACKUP_PREFIX) && n.ends_with(".json"))
        .collect();
    snapshots.sort();
    snapshots.reverse();
    snapshots.split_off(retain.min(snapshots.len()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn name(ts: &str) -> String {
        format!("{BACKUP_PREFIX}{ts}.json")
    }

    #[test]
    fn prunes_oldest_beyond_retention() {
        let names = vec![
            name("20250101T000000Z"),
            name("20250103T000000Z"),
            name("20250102T000000Z"),
        ];
        let stale = files_to_prune(names, 2);
        assert_eq!(stale, vec![name("20250101T000000Z")]);
    }

    #[test]
    fn keeps_everything_within_retention() {
        let names = vec![name("20250101T000000Z")];
        assert!(files_to_prune(names, 7).is_empty());
    }

    #[test]
    fn ignores_foreign_files() {
        let names = vec![
            "notes.txt".to_string(),
            name("20250101T000000Z"),
            name("20250102T000000Z"),
        ];
        let stale = files_to_prune(names, 1);
        assert_eq!(stale, vec![name("20250101T000000Z")]);
    }

    #[tokio::test]
    async fn rotate_removes_stale_snapshots_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        for ts in ["20250101T000000Z", "20250102T000000Z", "20250103T000000Z"] {
            std::fs::write(dir.path().join(name(ts)), b"{}").unwrap();
        }
        std::fs::write(dir.path().join("unrelated.log"), b"x").unwrap();

        let pruned = rotate(dir.path(), 1).await.unwrap();
        assert_eq!(pruned, 2);
        assert!(dir.path().join(name("20250103T000000Z")).exists());
        assert!(!dir.path().join(name("20250101T000000Z")).exists());
        assert!(dir.path().join("unrelated.log").exists());
    }
}
