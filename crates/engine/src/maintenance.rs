//! Maintenance sweeper: remove items whose backing catalog scene no
//! longer exists.
//!
//! Scene validity is fetched in one bulk query, never per item, so the
//! sweep issues a bounded number of catalog requests. A catalog outage is
//! reported as an error with zero orphans — it must never look like mass
//! orphanhood.

use std::collections::HashSet;

use clipdeck_catalog::CatalogClient;
use clipdeck_core::types::CatalogId;
use clipdeck_db::repositories::ItemRepo;
use clipdeck_db::DbPool;
use serde::Serialize;

use crate::error::EngineError;

/// Aggregate result of one maintenance sweep.
#[derive(Debug, Default, Serialize)]
pub struct MaintenanceReport {
    pub items_checked: usize,
    pub orphans_found: usize,
    pub orphans_removed: usize,
    pub errors: Vec<String>,
    pub duration_ms: i64,
}

/// Run one sweep.
///
/// Database setup failures abort the run; the catalog fetch failure path
/// produces a zero-orphan report carrying the error instead.
pub async fn run_maintenance_check(
    pool: &DbPool,
    catalog: &CatalogClient,
) -> Result<MaintenanceReport, EngineError> {
    let started = std::time::Instant::now();
    let mut report = MaintenanceReport::default();

    let refs = ItemRepo::scene_refs(pool).await?;
    report.items_checked = refs.len();
    if refs.is_empty() {
        report.duration_ms = started.elapsed().as_millis() as i64;
        return Ok(report);
    }

    let mut scene_ids: Vec<CatalogId> = refs.iter().map(|(_, scene)| scene.clone()).collect();
    scene_ids.sort();
    scene_ids.dedup();

    let valid = match catalog.valid_scene_ids(&scene_ids).await {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "Maintenance sweep: catalog fetch failed, treating as zero orphans");
            report.errors.push(format!("scene fetch failed: {e}"));
            report.duration_ms = started.elapsed().as_millis() as i64;
            return Ok(report);
        }
    };

    let orphans = orphaned_items(&refs, &valid);
    report.orphans_found = orphans.len();

    if !orphans.is_empty() {
        // Links first, then the items, in one transaction.
        let mut tx = pool.begin().await?;
        let removed = ItemRepo::delete_with_links(&mut tx, &orphans).await?;
        tx.commit().await?;
        report.orphans_removed = removed as usize;
    }

    report.duration_ms = started.elapsed().as_millis() as i64;
    tracing::info!(
        checked = report.items_checked,
        found = report.orphans_found,
        removed = report.orphans_removed,
        duration_ms = report.duration_ms,
        "Maintenance sweep finished"
    );
    Ok(report)
}

/// Item ids whose scene is absent from the valid set.
pub fn orphaned_items(
    refs: &[(CatalogId, CatalogId)],
    valid_scenes: &HashSet<CatalogId>,
) -> Vec<CatalogId> {
    refs.iter()
        .filter(|(_, scene)| !valid_scenes.contains(scene))
        .map(|(item, _)| item.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(pairs: &[(&str, &str)]) -> Vec<(CatalogId, CatalogId)> {
        pairs
            .iter()
            .map(|(item, scene)| (item.to_string(), scene.to_string()))
            .collect()
    }

    #[test]
    fn items_with_missing_scenes_are_orphans() {
        let refs = refs(&[("i1", "s1"), ("i2", "s2"), ("i3", "s1")]);
        let valid: HashSet<CatalogId> = ["s1".to_string()].into();
        assert_eq!(orphaned_items(&refs, &valid), vec!["i2".to_string()]);
    }

    #[test]
    fn all_valid_scenes_yield_no_orphans() {
        let refs = refs(&[("i1", "s1")]);
        let valid: HashSet<CatalogId> = ["s1".to_string()].into();
        assert!(orphaned_items(&refs, &valid).is_empty());
    }

    #[test]
    fn empty_valid_set_orphans_everything() {
        // This is why a failed catalog fetch must short-circuit before the
        // difference is computed: an outage is not an empty catalog.
        let refs = refs(&[("i1", "s1"), ("i2", "s2")]);
        let orphans = orphaned_items(&refs, &HashSet::new());
        assert_eq!(orphans.len(), 2);
    }
}
