//! Route definitions for manual job triggers.

use axum::routing::post;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{family}/run", post(jobs::run_job))
}
