//! Engine error type.

use clipdeck_catalog::CatalogError;
use clipdeck_core::error::CoreError;
use clipdeck_core::family::JobFamily;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error (validation, not-found, conflict).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An upstream catalog failure. Never treated as "no matches".
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A persistence failure; aborts the enclosing unit of work.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure during snapshot backup.
    #[error("Backup I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Single-flight guard violation: the family already has a run in
    /// flight. Reported to the caller, never retried or queued.
    #[error("Job family '{}' is already running", .family.as_str())]
    AlreadyRunning { family: JobFamily },
}
