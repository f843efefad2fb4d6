//! Reconciliation plan and result types.
//!
//! The plan is computed purely (see the engine crate) from two bulk reads
//! and applied inside one transaction, so no other writer can observe a
//! partially-applied link set.

use clipdeck_core::types::CatalogId;
use serde::Serialize;

use super::item::CandidateItem;

/// The minimal set of operations that makes a playlist's links equal a
/// candidate list.
#[derive(Debug, Default)]
pub struct SyncPlan {
    /// Candidates with no Item row yet; bulk-inserted.
    pub new_items: Vec<CandidateItem>,
    /// Candidates whose Item row exists; bulk-updated (timings optionally
    /// preserved).
    pub update_items: Vec<CandidateItem>,
    /// `(item_id, item_order)` links to create.
    pub link_creates: Vec<(CatalogId, i32)>,
    /// Existing links whose order differs from the candidate position.
    pub link_moves: Vec<(CatalogId, i32)>,
    /// Existing links whose item is absent from the candidate set.
    pub link_prunes: Vec<CatalogId>,
}

impl SyncPlan {
    /// Operation counts for observability.
    pub fn counts(&self) -> SyncCounts {
        SyncCounts {
            upserted: self.new_items.len() + self.update_items.len(),
            linked: self.link_creates.len(),
            relinked: self.link_moves.len(),
            unlinked: self.link_prunes.len(),
        }
    }

    /// True when applying the plan would write nothing.
    pub fn is_noop(&self) -> bool {
        self.new_items.is_empty()
            && self.update_items.is_empty()
            && self.link_creates.is_empty()
            && self.link_moves.is_empty()
            && self.link_prunes.is_empty()
    }
}

/// Per-category operation counts returned by a reconcile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    /// Item rows created or refreshed.
    pub upserted: usize,
    /// Links created.
    pub linked: usize,
    /// Links whose order was corrected.
    pub relinked: usize,
    /// Links removed.
    pub unlinked: usize,
}
