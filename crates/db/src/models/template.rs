//! Template model and DTOs.

use clipdeck_core::conditions;
use clipdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `templates` table: a reusable named rule fragment
/// consumed by per-actor playlist generation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub name: String,
    pub required_tag_ids: Vec<String>,
    pub optional_tag_ids: Vec<String>,
    /// Legacy flattened list, kept in sync on every write.
    pub tag_ids: Vec<String>,
    pub exclude_from_generation: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Template {
    /// Canonical `(required, optional)` tag lists, honoring the legacy
    /// flattened fallback for rows written before the split.
    pub fn effective_tag_lists(&self) -> (Vec<String>, Vec<String>) {
        conditions::effective_tag_lists(
            &self.required_tag_ids,
            &self.optional_tag_ids,
            &self.tag_ids,
        )
    }
}

/// DTO for creating a template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    #[serde(default)]
    pub required_tag_ids: Vec<String>,
    #[serde(default)]
    pub optional_tag_ids: Vec<String>,
    /// Legacy clients may still send only the flattened list.
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub exclude_from_generation: bool,
}

/// DTO for updating a template. Tag lists, when present, replace both the
/// split lists and the derived flattened one.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub required_tag_ids: Option<Vec<String>>,
    pub optional_tag_ids: Option<Vec<String>>,
    pub exclude_from_generation: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_lists_fall_back_to_legacy() {
        let t = Template {
            id: 1,
            name: "t".into(),
            required_tag_ids: vec![],
            optional_tag_ids: vec![],
            tag_ids: vec!["x".into()],
            exclude_from_generation: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let (req, opt) = t.effective_tag_lists();
        assert_eq!(req, vec!["x".to_string()]);
        assert!(opt.is_empty());
    }
}
