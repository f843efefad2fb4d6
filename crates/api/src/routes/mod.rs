//! Route definitions, one module per resource.

pub mod actors;
pub mod health;
pub mod history;
pub mod jobs;
pub mod playlists;
pub mod schedules;
pub mod settings;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /playlists                          list, create
/// /playlists/{id}                     get, update, delete
/// /playlists/{id}/items               ordered item listing
/// /playlists/{id}/sync                manual editor sync (POST)
/// /playlists/{id}/regenerate          resolve + reconcile (POST)
///
/// /templates                          list, create
/// /templates/{id}                     get, update, delete
///
/// /actors                             list
/// /actors/{id}                        get, upsert (PUT)
///
/// /jobs/{family}/run                  manual trigger (POST)
///
/// /schedules                          all family statuses
/// /schedules/{family}                 one family status
/// /schedules/{family}/start|stop|restart
///
/// /history                            recent runs (?family, limit)
///
/// /settings                           list
/// /settings/{key}                     write (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/playlists", playlists::router())
        .nest("/templates", templates::router())
        .nest("/actors", actors::router())
        .nest("/jobs", jobs::router())
        .nest("/schedules", schedules::router())
        .nest("/history", history::router())
        .nest("/settings", settings::router())
}
