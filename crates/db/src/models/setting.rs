//! Flat key/value settings model.

use clipdeck_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: Timestamp,
}

/// DTO for writing a setting value.
#[derive(Debug, Clone, Deserialize)]
pub struct PutSetting {
    pub value: String,
}
