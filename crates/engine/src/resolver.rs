//! Membership resolver: condition set -> ordered candidate list.
//!
//! Resolution queries the catalog once (performer filter + tag union),
//! then applies the required/optional tag semantics and the persisted
//! rating filter locally. Catalog order is preserved throughout so
//! regeneration assigns deterministic item orders.

use std::collections::HashMap;

use clipdeck_catalog::{CatalogClient, Marker};
use clipdeck_core::conditions::ConditionSet;
use clipdeck_core::types::CatalogId;
use clipdeck_db::models::item::CandidateItem;
use clipdeck_db::repositories::ItemRepo;
use clipdeck_db::DbPool;

use crate::error::EngineError;

/// Resolve a condition set into the ordered candidate marker list.
///
/// Validation failures reject before any catalog or database call. A
/// catalog failure surfaces as an error; an empty list is only ever
/// returned for a correctly-executed query with no matches.
pub async fn resolve_membership(
    pool: &DbPool,
    catalog: &CatalogClient,
    condition: &ConditionSet,
) -> Result<Vec<Marker>, EngineError> {
    condition.validate()?;
    let condition = condition.clone().normalized();

    let markers = catalog
        .find_markers(&condition.performer_ids, &condition.all_tag_ids())
        .await?;
    let markers = filter_markers(&condition, markers);

    if condition.min_rating.is_none() {
        return Ok(markers);
    }

    // Ratings live only in local persistence, never in the catalog.
    let ids: Vec<CatalogId> = markers.iter().map(|m| m.id.clone()).collect();
    let ratings: HashMap<CatalogId, i32> = ItemRepo::ratings_for(pool, &ids)
        .await?
        .into_iter()
        .filter_map(|(id, rating)| rating.map(|r| (id, r)))
        .collect();

    Ok(apply_rating_filter(&condition, markers, &ratings))
}

/// Apply tag and performer semantics locally, preserving input order.
pub fn filter_markers(condition: &ConditionSet, markers: Vec<Marker>) -> Vec<Marker> {
    markers
        .into_iter()
        .filter(|m| {
            condition.matches_tags(&m.tag_ids)
                && condition.matches_performers(m.scene_performer_ids())
        })
        .collect()
}

/// Keep markers whose persisted rating passes the minimum-rating filter.
/// Items with no persisted rating yet are excluded by a positive threshold.
pub fn apply_rating_filter(
    condition: &ConditionSet,
    markers: Vec<Marker>,
    ratings: &HashMap<CatalogId, i32>,
) -> Vec<Marker> {
    markers
        .into_iter()
        .filter(|m| condition.rating_passes(ratings.get(&m.id).copied()))
        .collect()
}

/// Skip-clearing policy: an empty resolution under a minimum-rating filter
/// may only mean "nothing has been rated yet", not "nothing matches", so
/// the reconcile must not be invoked and existing links stay untouched.
///
/// This is a deliberate business rule, not an ignore-empty-results bug.
pub fn skip_clear_on_empty(condition: &ConditionSet, resolved: &[Marker]) -> bool {
    resolved.is_empty() && condition.min_rating.is_some()
}

/// Convert resolved markers into reconcile candidates.
///
/// Metadata fields are written explicitly (a URL the catalog dropped is
/// cleared); the rating field is left untouched because ratings are local
/// user data the catalog knows nothing about.
pub fn to_candidates(markers: &[Marker]) -> Vec<CandidateItem> {
    markers
        .iter()
        .map(|m| CandidateItem {
            id: m.id.clone(),
            title: m.title.clone(),
            start_seconds: m.start_seconds,
            end_seconds: m.end_seconds,
            screenshot_url: Some(m.screenshot_url.clone()),
            stream_url: Some(m.stream_url.clone()),
            preview_url: Some(m.preview_url.clone()),
            scene_id: Some(m.scene.as_ref().map(|s| s.id.clone())),
            rating: None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clipdeck_catalog::MarkerScene;

    fn strs(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn marker(id: &str, tag_ids: &[&str], performers: &[&str]) -> Marker {
        Marker {
            id: id.to_string(),
            title: format!("marker {id}"),
            start_seconds: 1.0,
            end_seconds: 2.0,
            screenshot_url: None,
            stream_url: None,
            preview_url: None,
            scene: Some(MarkerScene {
                id: format!("scene-{id}"),
                performer_ids: strs(performers),
            }),
            tag_ids: strs(tag_ids),
        }
    }

    fn ids(markers: &[Marker]) -> Vec<&str> {
        markers.iter().map(|m| m.id.as_str()).collect()
    }

    // -- Required/optional semantics ------------------------------------------

    #[test]
    fn required_and_optional_semantics() {
        let cond = ConditionSet {
            required_tag_ids: strs(&["a", "b"]),
            optional_tag_ids: strs(&["c", "d"]),
            ..Default::default()
        };
        let markers = vec![
            marker("m1", &["a", "b", "c"], &[]), // both required + optional c
            marker("m2", &["a", "b", "d"], &[]), // both required + optional d
            marker("m3", &["a", "b"], &[]),      // required only: excluded
            marker("m4", &["a", "c"], &[]),      // missing required b
        ];
        let kept = filter_markers(&cond, markers);
        assert_eq!(ids(&kept), vec!["m1", "m2"]);
    }

    #[test]
    fn filter_preserves_catalog_order() {
        let cond = ConditionSet {
            required_tag_ids: strs(&["x"]),
            ..Default::default()
        };
        let markers = vec![
            marker("m9", &["x"], &[]),
            marker("m1", &["x"], &[]),
            marker("m5", &["x"], &[]),
        ];
        let kept = filter_markers(&cond, markers);
        assert_eq!(ids(&kept), vec!["m9", "m1", "m5"]);
    }

    #[test]
    fn performer_filter_applies_to_scene_performers() {
        let cond = ConditionSet {
            performer_ids: strs(&["p1"]),
            ..Default::default()
        };
        let markers = vec![
            marker("m1", &[], &["p1", "p2"]),
            marker("m2", &[], &["p3"]),
        ];
        let kept = filter_markers(&cond, markers);
        assert_eq!(ids(&kept), vec!["m1"]);
    }

    #[test]
    fn marker_without_scene_fails_performer_filter() {
        let cond = ConditionSet {
            performer_ids: strs(&["p1"]),
            ..Default::default()
        };
        let mut m = marker("m1", &[], &[]);
        m.scene = None;
        let kept = filter_markers(&cond, vec![m]);
        assert!(kept.is_empty());
    }

    // -- Rating filter --------------------------------------------------------

    #[test]
    fn rating_filter_uses_persisted_ratings() {
        let cond = ConditionSet {
            min_rating: Some(3),
            ..Default::default()
        };
        let markers = vec![
            marker("m1", &[], &[]),
            marker("m2", &[], &[]),
            marker("m3", &[], &[]),
        ];
        let ratings: HashMap<String, i32> =
            [("m1".to_string(), 4), ("m2".to_string(), 2)].into();
        // m3 has no persisted rating yet: excluded by a positive threshold.
        let kept = apply_rating_filter(&cond, markers, &ratings);
        assert_eq!(ids(&kept), vec!["m1"]);
    }

    // -- Skip-clearing policy -------------------------------------------------

    #[test]
    fn empty_result_with_rating_filter_skips_clearing() {
        let cond = ConditionSet {
            min_rating: Some(3),
            ..Default::default()
        };
        assert!(skip_clear_on_empty(&cond, &[]));
    }

    #[test]
    fn empty_result_without_rating_filter_clears() {
        let cond = ConditionSet::default();
        assert!(!skip_clear_on_empty(&cond, &[]));
    }

    #[test]
    fn non_empty_result_never_skips() {
        let cond = ConditionSet {
            min_rating: Some(3),
            ..Default::default()
        };
        let markers = vec![marker("m1", &[], &[])];
        assert!(!skip_clear_on_empty(&cond, &markers));
    }

    // -- Candidate conversion -------------------------------------------------

    #[test]
    fn candidates_never_touch_ratings() {
        let markers = vec![marker("m1", &["a"], &[])];
        let candidates = to_candidates(&markers);
        assert_eq!(candidates[0].rating, None);
        // Metadata is written explicitly, even when absent upstream.
        assert_eq!(candidates[0].screenshot_url, Some(None));
        assert_eq!(
            candidates[0].scene_id,
            Some(Some("scene-m1".to_string()))
        );
    }
}
