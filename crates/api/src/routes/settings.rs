//! Route definitions for the settings store.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::list_settings))
        .route("/{key}", put(settings::put_setting))
}
