//! Reconciliation engine: diff a candidate list against persisted links
//! and apply the minimal set of operations in one transaction.
//!
//! The plan is computed purely from two bulk reads taken inside the same
//! transaction that applies it, so no other writer can observe a
//! partially-applied link set for the playlist.

use std::collections::{HashMap, HashSet};

use clipdeck_core::types::{CatalogId, DbId};
use clipdeck_db::models::item::CandidateItem;
use clipdeck_db::models::sync::{SyncCounts, SyncPlan};
use clipdeck_db::repositories::{ItemRepo, PlaylistItemRepo};
use clipdeck_db::DbPool;

use crate::error::EngineError;

/// Make a playlist's links exactly equal the candidate list, in candidate
/// order, with dense zero-based ordering.
///
/// With `preserve_timings`, existing items keep their stored start/end
/// offsets (refresh semantics); without it, timings are overwritten
/// (regenerate and manual-editor semantics).
///
/// Callers are responsible for not invoking this concurrently for the
/// same playlist; cross-playlist concurrency is unconstrained.
pub async fn sync(
    pool: &DbPool,
    playlist_id: DbId,
    candidates: &[CandidateItem],
    preserve_timings: bool,
) -> Result<SyncCounts, EngineError> {
    let mut tx = pool.begin().await?;

    let links = PlaylistItemRepo::links_for(&mut tx, playlist_id).await?;
    let link_pairs: Vec<(CatalogId, i32)> = links
        .into_iter()
        .map(|l| (l.item_id, l.item_order))
        .collect();

    let candidate_ids: Vec<CatalogId> = candidates.iter().map(|c| c.id.clone()).collect();
    let existing: HashSet<CatalogId> = ItemRepo::existing_ids(&mut tx, &candidate_ids)
        .await?
        .into_iter()
        .collect();

    let plan = compute_sync_plan(&link_pairs, &existing, candidates);

    ItemRepo::insert_bulk(&mut tx, &plan.new_items).await?;
    ItemRepo::update_bulk(&mut tx, &plan.update_items, preserve_timings).await?;
    PlaylistItemRepo::insert_links(&mut tx, playlist_id, &plan.link_creates).await?;
    PlaylistItemRepo::move_links(&mut tx, playlist_id, &plan.link_moves).await?;
    PlaylistItemRepo::delete_links(&mut tx, playlist_id, &plan.link_prunes).await?;

    tx.commit().await?;

    let counts = plan.counts();
    tracing::debug!(
        playlist_id,
        upserted = counts.upserted,
        linked = counts.linked,
        relinked = counts.relinked,
        unlinked = counts.unlinked,
        "Playlist reconciled"
    );
    Ok(counts)
}

/// Compute the minimal operation set.
///
/// Duplicate candidate ids keep their first occurrence (later duplicates
/// are dropped before positions are assigned), so link orders stay dense.
pub fn compute_sync_plan(
    existing_links: &[(CatalogId, i32)],
    existing_item_ids: &HashSet<CatalogId>,
    candidates: &[CandidateItem],
) -> SyncPlan {
    let mut plan = SyncPlan::default();

    let link_orders: HashMap<&str, i32> = existing_links
        .iter()
        .map(|(id, order)| (id.as_str(), *order))
        .collect();

    let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
    let mut position: i32 = 0;

    for candidate in candidates {
        if !seen.insert(candidate.id.as_str()) {
            continue;
        }

        if existing_item_ids.contains(&candidate.id) {
            plan.update_items.push(candidate.clone());
        } else {
            plan.new_items.push(candidate.clone());
        }

        match link_orders.get(candidate.id.as_str()) {
            Some(&order) if order != position => {
                plan.link_moves.push((candidate.id.clone(), position));
            }
            Some(_) => {}
            None => {
                plan.link_creates.push((candidate.id.clone(), position));
            }
        }

        position += 1;
    }

    for (id, _) in existing_links {
        if !seen.contains(id.as_str()) {
            plan.link_prunes.push(id.clone());
        }
    }

    plan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str) -> CandidateItem {
        CandidateItem {
            id: id.to_string(),
            title: format!("item {id}"),
            start_seconds: 1.0,
            end_seconds: 2.0,
            screenshot_url: None,
            stream_url: None,
            preview_url: None,
            scene_id: None,
            rating: None,
        }
    }

    fn links(pairs: &[(&str, i32)]) -> Vec<(CatalogId, i32)> {
        pairs.iter().map(|(id, o)| (id.to_string(), *o)).collect()
    }

    fn item_set(ids: &[&str]) -> HashSet<CatalogId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    /// Apply a plan's link operations to an in-memory link state.
    fn apply_links(
        state: &[(CatalogId, i32)],
        plan: &SyncPlan,
    ) -> Vec<(CatalogId, i32)> {
        let mut out: Vec<(CatalogId, i32)> = state
            .iter()
            .filter(|(id, _)| !plan.link_prunes.contains(id))
            .cloned()
            .collect();
        for (id, order) in &plan.link_moves {
            if let Some(entry) = out.iter_mut().find(|(i, _)| i == id) {
                entry.1 = *order;
            }
        }
        out.extend(plan.link_creates.iter().cloned());
        out.sort_by_key(|(_, order)| *order);
        out
    }

    // -- Basic diffing --------------------------------------------------------

    #[test]
    fn fresh_playlist_links_all_candidates_in_order() {
        let candidates = vec![candidate("a"), candidate("b"), candidate("c")];
        let plan = compute_sync_plan(&[], &HashSet::new(), &candidates);

        assert_eq!(plan.new_items.len(), 3);
        assert!(plan.update_items.is_empty());
        assert_eq!(
            plan.link_creates,
            links(&[("a", 0), ("b", 1), ("c", 2)])
        );
        assert!(plan.link_moves.is_empty());
        assert!(plan.link_prunes.is_empty());
    }

    #[test]
    fn new_vs_existing_partition() {
        let candidates = vec![candidate("a"), candidate("b")];
        let plan = compute_sync_plan(&[], &item_set(&["a"]), &candidates);

        assert_eq!(plan.update_items.len(), 1);
        assert_eq!(plan.update_items[0].id, "a");
        assert_eq!(plan.new_items.len(), 1);
        assert_eq!(plan.new_items[0].id, "b");
    }

    #[test]
    fn unchanged_links_produce_no_operations() {
        let candidates = vec![candidate("a"), candidate("b")];
        let state = links(&[("a", 0), ("b", 1)]);
        let plan = compute_sync_plan(&state, &item_set(&["a", "b"]), &candidates);

        assert!(plan.link_creates.is_empty());
        assert!(plan.link_moves.is_empty());
        assert!(plan.link_prunes.is_empty());
    }

    #[test]
    fn reorder_moves_only_displaced_links() {
        let candidates = vec![candidate("b"), candidate("a"), candidate("c")];
        let state = links(&[("a", 0), ("b", 1), ("c", 2)]);
        let plan = compute_sync_plan(&state, &item_set(&["a", "b", "c"]), &candidates);

        assert_eq!(plan.link_moves, links(&[("b", 0), ("a", 1)]));
        assert!(plan.link_creates.is_empty());
        assert!(plan.link_prunes.is_empty());
    }

    #[test]
    fn departed_items_are_pruned() {
        let candidates = vec![candidate("a")];
        let state = links(&[("a", 0), ("gone", 1)]);
        let plan = compute_sync_plan(&state, &item_set(&["a", "gone"]), &candidates);

        assert_eq!(plan.link_prunes, vec!["gone".to_string()]);
        // The departed item row itself is not deleted: items outlive
        // playlist membership.
        assert_eq!(plan.update_items.len(), 1);
    }

    #[test]
    fn empty_candidates_prune_everything() {
        let state = links(&[("a", 0), ("b", 1)]);
        let plan = compute_sync_plan(&state, &item_set(&["a", "b"]), &[]);

        assert_eq!(plan.link_prunes.len(), 2);
        assert!(plan.new_items.is_empty());
        assert!(plan.update_items.is_empty());
    }

    // -- Invariants -----------------------------------------------------------

    #[test]
    fn idempotence_second_pass_is_noop() {
        let candidates = vec![candidate("c"), candidate("a"), candidate("b")];
        let state = links(&[("a", 0), ("x", 1)]);
        let first = compute_sync_plan(&state, &item_set(&["a", "x"]), &candidates);

        let state_after = apply_links(&state, &first);
        let existing_after = item_set(&["a", "b", "c", "x"]);
        let second = compute_sync_plan(&state_after, &existing_after, &candidates);

        assert!(second.link_creates.is_empty());
        assert!(second.link_moves.is_empty());
        assert!(second.link_prunes.is_empty());
    }

    #[test]
    fn order_density_after_arbitrary_diff() {
        let candidates = vec![
            candidate("d"),
            candidate("a"),
            candidate("e"),
            candidate("b"),
        ];
        let state = links(&[("a", 0), ("b", 1), ("c", 2)]);
        let plan = compute_sync_plan(&state, &item_set(&["a", "b", "c"]), &candidates);

        let after = apply_links(&state, &plan);
        let orders: Vec<i32> = after.iter().map(|(_, o)| *o).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        let ids: Vec<&str> = after.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "e", "b"]);
    }

    #[test]
    fn duplicate_candidates_keep_first_occurrence() {
        let candidates = vec![candidate("a"), candidate("b"), candidate("a")];
        let plan = compute_sync_plan(&[], &HashSet::new(), &candidates);

        assert_eq!(plan.link_creates, links(&[("a", 0), ("b", 1)]));
        assert_eq!(plan.new_items.len(), 2);
    }

    #[test]
    fn counts_reflect_operation_categories() {
        let candidates = vec![candidate("a"), candidate("b"), candidate("c")];
        let state = links(&[("a", 1), ("gone", 0)]);
        let plan = compute_sync_plan(&state, &item_set(&["a", "gone"]), &candidates);
        let counts = plan.counts();

        assert_eq!(counts.upserted, 3); // a updated, b + c created
        assert_eq!(counts.linked, 2); // b, c
        assert_eq!(counts.relinked, 1); // a: 1 -> 0
        assert_eq!(counts.unlinked, 1); // gone
    }

    #[test]
    fn noop_plan_detected() {
        let plan = compute_sync_plan(&[], &HashSet::new(), &[]);
        assert!(plan.is_noop());
    }
}
