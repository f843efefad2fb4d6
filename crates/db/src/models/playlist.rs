//! Playlist model and DTOs.

use clipdeck_core::conditions::ConditionSet;
use clipdeck_core::error::CoreError;
use clipdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored value for manually curated playlists.
pub const KIND_MANUAL: &str = "manual";
/// Stored value for rule-driven playlists.
pub const KIND_SMART: &str = "smart";

/// Playlist kind with string conversion for the `kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    Manual,
    Smart,
}

impl PlaylistKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => KIND_MANUAL,
            Self::Smart => KIND_SMART,
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            KIND_MANUAL => Ok(Self::Manual),
            KIND_SMART => Ok(Self::Smart),
            other => Err(CoreError::Validation(format!(
                "Unknown playlist kind: '{other}'"
            ))),
        }
    }
}

/// A row from the `playlists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub performer_ids: Vec<String>,
    pub required_tag_ids: Vec<String>,
    pub optional_tag_ids: Vec<String>,
    pub tag_ids: Vec<String>,
    pub min_rating: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Playlist {
    /// Whether this playlist's membership is rule-driven.
    pub fn is_smart(&self) -> bool {
        self.kind == KIND_SMART
    }

    /// The playlist's condition set, canonicalized.
    ///
    /// Rows written before the required/optional split are normalized on
    /// read (legacy `tag_ids` promoted to required).
    pub fn condition(&self) -> ConditionSet {
        ConditionSet {
            performer_ids: self.performer_ids.clone(),
            required_tag_ids: self.required_tag_ids.clone(),
            optional_tag_ids: self.optional_tag_ids.clone(),
            tag_ids: self.tag_ids.clone(),
            min_rating: self.min_rating,
        }
        .normalized()
    }
}

/// DTO for creating a playlist.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    /// Condition set for SMART playlists; ignored for manual ones.
    pub condition: Option<ConditionSet>,
}

/// DTO for updating a playlist. `condition`, when present, replaces the
/// whole condition set so the legacy flattened list is recomputed in the
/// same write.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub condition: Option<ConditionSet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips() {
        assert_eq!(PlaylistKind::from_str("manual").unwrap(), PlaylistKind::Manual);
        assert_eq!(PlaylistKind::from_str("smart").unwrap(), PlaylistKind::Smart);
        assert_eq!(PlaylistKind::Smart.as_str(), "smart");
    }

    #[test]
    fn unknown_kind_rejected() {
        assert!(PlaylistKind::from_str("dynamic").is_err());
    }

    #[test]
    fn condition_normalizes_legacy_rows() {
        let playlist = Playlist {
            id: 1,
            name: "legacy".into(),
            kind: KIND_SMART.into(),
            description: None,
            cover_image: None,
            performer_ids: vec![],
            required_tag_ids: vec![],
            optional_tag_ids: vec![],
            tag_ids: vec!["x".into()],
            min_rating: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let cond = playlist.condition();
        assert_eq!(cond.required_tag_ids, vec!["x".to_string()]);
    }
}
