//! Route definitions for playlists.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::playlists;
use crate::state::AppState;

/// Playlist routes.
///
/// ```text
/// GET    /                  -> list_playlists
/// POST   /                  -> create_playlist
/// GET    /{id}              -> get_playlist
/// PUT    /{id}              -> update_playlist
/// DELETE /{id}              -> delete_playlist
/// GET    /{id}/items        -> list_playlist_items
/// POST   /{id}/sync         -> sync_playlist
/// POST   /{id}/regenerate   -> regenerate_playlist
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route(
            "/{id}",
            get(playlists::get_playlist)
                .put(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route("/{id}/items", get(playlists::list_playlist_items))
        .route("/{id}/sync", post(playlists::sync_playlist))
        .route("/{id}/regenerate", post(playlists::regenerate_playlist))
}
