//! SMART playlist refresh: re-resolve every rule-driven playlist and
//! reconcile it without clobbering user-adjusted clip boundaries.

use clipdeck_catalog::CatalogClient;
use clipdeck_core::error::CoreError;
use clipdeck_core::types::DbId;
use clipdeck_db::models::sync::SyncCounts;
use clipdeck_db::repositories::PlaylistRepo;
use clipdeck_db::DbPool;
use serde::Serialize;

use crate::error::EngineError;
use crate::{reconcile, resolver};

/// Aggregate result of one refresh pass.
#[derive(Debug, Default, Serialize)]
pub struct RefreshReport {
    pub playlists_processed: usize,
    pub playlists_refreshed: usize,
    /// Playlists left untouched by the empty-result rating guard.
    pub playlists_skipped: usize,
    pub errors: Vec<String>,
    pub duration_ms: i64,
}

/// Refresh all SMART playlists with `preserve_timings` semantics.
///
/// Per-playlist failures (catalog or transaction) accumulate without
/// aborting the batch; only the initial playlist listing aborts the run.
pub async fn refresh_smart_playlists(
    pool: &DbPool,
    catalog: &CatalogClient,
) -> Result<RefreshReport, EngineError> {
    let started = std::time::Instant::now();

    let playlists = PlaylistRepo::list_smart(pool).await?;
    let mut report = RefreshReport {
        playlists_processed: playlists.len(),
        ..Default::default()
    };

    for playlist in &playlists {
        let condition = playlist.condition();
        let markers = match resolver::resolve_membership(pool, catalog, &condition).await {
            Ok(markers) => markers,
            Err(e) => {
                report
                    .errors
                    .push(format!("resolve '{}' failed: {e}", playlist.name));
                continue;
            }
        };

        if resolver::skip_clear_on_empty(&condition, &markers) {
            tracing::debug!(
                playlist_id = playlist.id,
                "Refresh skipped: empty result under rating filter"
            );
            report.playlists_skipped += 1;
            continue;
        }

        let candidates = resolver::to_candidates(&markers);
        match reconcile::sync(pool, playlist.id, &candidates, true).await {
            Ok(_) => report.playlists_refreshed += 1,
            Err(e) => report
                .errors
                .push(format!("sync '{}' failed: {e}", playlist.name)),
        }
    }

    report.duration_ms = started.elapsed().as_millis() as i64;
    tracing::info!(
        refreshed = report.playlists_refreshed,
        skipped = report.playlists_skipped,
        errors = report.errors.len(),
        duration_ms = report.duration_ms,
        "Refresh pass finished"
    );
    Ok(report)
}

/// Regenerate a single SMART playlist, overwriting timings.
///
/// Returns `None` when the empty-result rating guard applies and the
/// playlist's links were deliberately left untouched.
pub async fn regenerate(
    pool: &DbPool,
    catalog: &CatalogClient,
    playlist_id: DbId,
) -> Result<Option<SyncCounts>, EngineError> {
    let playlist = PlaylistRepo::find_by_id(pool, playlist_id)
        .await?
        .ok_or_else(|| CoreError::not_found("playlist", playlist_id))?;

    if !playlist.is_smart() {
        return Err(CoreError::Validation(format!(
            "Playlist '{}' is not a SMART playlist",
            playlist.name
        ))
        .into());
    }

    let condition = playlist.condition();
    let markers = resolver::resolve_membership(pool, catalog, &condition).await?;

    if resolver::skip_clear_on_empty(&condition, &markers) {
        return Ok(None);
    }

    let candidates = resolver::to_candidates(&markers);
    let counts = reconcile::sync(pool, playlist_id, &candidates, false).await?;
    Ok(Some(counts))
}
