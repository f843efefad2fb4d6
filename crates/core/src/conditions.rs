//! SMART playlist condition sets and marker matching semantics.
//!
//! A condition set is the declarative rule defining a SMART playlist's
//! membership: performer filter, required tags (AND), optional tags (OR),
//! and a minimum persisted rating. The flattened `tag_ids` list is a
//! legacy compatibility field derived from the split lists and recomputed
//! on every write so the two representations cannot drift.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lowest accepted value for `min_rating`.
pub const MIN_RATING_FLOOR: i32 = 1;

/// Highest accepted value for `min_rating`.
pub const MIN_RATING_CEIL: i32 = 5;

// ---------------------------------------------------------------------------
// ConditionSet
// ---------------------------------------------------------------------------

/// Declarative membership rule for a SMART playlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionSet {
    /// Catalog performer ids; empty means no performer filter.
    #[serde(default)]
    pub performer_ids: Vec<String>,
    /// A marker must carry every one of these tags.
    #[serde(default)]
    pub required_tag_ids: Vec<String>,
    /// When non-empty, a marker must carry at least one of these tags.
    #[serde(default)]
    pub optional_tag_ids: Vec<String>,
    /// Legacy flattened union of required + optional. Derived, never
    /// independently settable once normalized.
    #[serde(default)]
    pub tag_ids: Vec<String>,
    /// Minimum persisted item rating (1-5); `None` disables the filter.
    pub min_rating: Option<i32>,
}

impl ConditionSet {
    /// Canonicalize the tag lists.
    ///
    /// Rows written before the required/optional split carry only the
    /// flattened `tag_ids`; those are treated as required tags. In all
    /// cases the flattened list is recomputed as the de-duplicated union
    /// (required first), so it is safe to persist the result as-is.
    pub fn normalized(mut self) -> Self {
        if self.required_tag_ids.is_empty()
            && self.optional_tag_ids.is_empty()
            && !self.tag_ids.is_empty()
        {
            self.required_tag_ids = std::mem::take(&mut self.tag_ids);
        }
        self.tag_ids = legacy_union(&self.required_tag_ids, &self.optional_tag_ids);
        self
    }

    /// Reject malformed condition sets before any catalog or database call.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(min) = self.min_rating {
            if !(MIN_RATING_FLOOR..=MIN_RATING_CEIL).contains(&min) {
                return Err(CoreError::Validation(format!(
                    "min_rating must be between {MIN_RATING_FLOOR} and {MIN_RATING_CEIL}, got {min}"
                )));
            }
        }
        Ok(())
    }

    /// Union of required + optional tags, used as the catalog query filter.
    pub fn all_tag_ids(&self) -> Vec<String> {
        legacy_union(&self.required_tag_ids, &self.optional_tag_ids)
    }

    /// Whether a marker's tag set satisfies this rule.
    ///
    /// Required tags use AND semantics; optional tags, when present, act as
    /// alternative matches (at least one must appear), not as filters.
    pub fn matches_tags(&self, marker_tags: &[String]) -> bool {
        let required_ok = self
            .required_tag_ids
            .iter()
            .all(|t| marker_tags.contains(t));
        let optional_ok = self.optional_tag_ids.is_empty()
            || self.optional_tag_ids.iter().any(|t| marker_tags.contains(t));
        required_ok && optional_ok
    }

    /// Whether a marker's scene performers intersect the performer filter.
    /// An empty filter matches everything.
    pub fn matches_performers(&self, scene_performers: &[String]) -> bool {
        self.performer_ids.is_empty()
            || scene_performers
                .iter()
                .any(|p| self.performer_ids.contains(p))
    }

    /// Whether a persisted rating passes the minimum-rating filter.
    ///
    /// Ratings live only in local persistence, never in the catalog, so a
    /// positive threshold excludes items that have no rating yet.
    pub fn rating_passes(&self, rating: Option<i32>) -> bool {
        match self.min_rating {
            None => true,
            Some(min) => rating.is_some_and(|r| r >= min),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// De-duplicated union of two tag lists, preserving order (first list first).
pub fn legacy_union(required: &[String], optional: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(required.len() + optional.len());
    for tag in required.iter().chain(optional.iter()) {
        if !out.contains(tag) {
            out.push(tag.clone());
        }
    }
    out
}

/// Canonical required/optional lists for a rule that may predate the split.
///
/// When both split lists are empty and the legacy list is not, the legacy
/// list is treated as required tags.
pub fn effective_tag_lists(
    required: &[String],
    optional: &[String],
    legacy: &[String],
) -> (Vec<String>, Vec<String>) {
    if required.is_empty() && optional.is_empty() && !legacy.is_empty() {
        (legacy.to_vec(), Vec::new())
    } else {
        (required.to_vec(), optional.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
