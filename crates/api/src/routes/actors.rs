//! Route definitions for the actor roster.

use axum::routing::get;
use axum::Router;

use crate::handlers::actors;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(actors::list_actors))
        .route("/{id}", get(actors::get_actor).put(actors::upsert_actor))
}
