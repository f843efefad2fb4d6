//! Shared primitive type aliases.

/// Locally-assigned primary keys (playlists, templates, job runs) are
/// PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Identifiers assigned by the external catalog (markers, scenes, tags,
/// performers) are opaque strings and never parsed.
pub type CatalogId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
