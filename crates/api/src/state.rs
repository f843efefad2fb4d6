use std::sync::Arc;

use clipdeck_catalog::CatalogClient;
use clipdeck_engine::SchedulerCoordinator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: clipdeck_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Catalog query client.
    pub catalog: Arc<CatalogClient>,
    /// Scheduler coordinator owning the per-family timers and guards.
    pub scheduler: Arc<SchedulerCoordinator>,
}
