//! Route definitions for scheduler status and lifecycle.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::schedules;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(schedules::list_schedules))
        .route("/{family}", get(schedules::get_schedule))
        .route("/{family}/start", post(schedules::start_schedule))
        .route("/{family}/stop", post(schedules::stop_schedule))
        .route("/{family}/restart", post(schedules::restart_schedule))
}
