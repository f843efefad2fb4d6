//! Handlers for playlist CRUD, the manual editor sync, and single-playlist
//! regeneration.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use clipdeck_core::error::CoreError;
use clipdeck_core::types::DbId;
use clipdeck_db::models::item::CandidateItem;
use clipdeck_db::models::playlist::{CreatePlaylist, PlaylistKind, UpdatePlaylist};
use clipdeck_db::repositories::{PlaylistItemRepo, PlaylistRepo};
use clipdeck_engine::{reconcile, refresh};
use serde::Serialize;
use serde_json::json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for a regenerate action: either the reconcile counts or an
/// explicit skip under the empty-result rating guard.
#[derive(Debug, Serialize)]
pub struct RegenerateResponse {
    pub skipped: bool,
    pub counts: Option<clipdeck_db::models::sync::SyncCounts>,
}

/// GET /playlists
pub async fn list_playlists(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let playlists = PlaylistRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: playlists }))
}

/// POST /playlists
pub async fn create_playlist(
    State(state): State<AppState>,
    Json(body): Json<CreatePlaylist>,
) -> AppResult<impl IntoResponse> {
    PlaylistKind::from_str(&body.kind)?;
    if let Some(condition) = &body.condition {
        condition.validate()?;
    }

    let playlist = PlaylistRepo::create(&state.pool, &body).await?;
    Ok(Json(DataResponse { data: playlist }))
}

/// GET /playlists/{id}
pub async fn get_playlist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let playlist = PlaylistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("playlist", id))?;
    Ok(Json(DataResponse { data: playlist }))
}

/// PUT /playlists/{id}
pub async fn update_playlist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdatePlaylist>,
) -> AppResult<impl IntoResponse> {
    if let Some(condition) = &body.condition {
        condition.validate()?;
    }

    let playlist = PlaylistRepo::update(&state.pool, id, &body)
        .await?
        .ok_or_else(|| CoreError::not_found("playlist", id))?;
    Ok(Json(DataResponse { data: playlist }))
}

/// DELETE /playlists/{id}
pub async fn delete_playlist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PlaylistRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::not_found("playlist", id).into());
    }
    Ok(Json(DataResponse {
        data: json!({ "deleted": true }),
    }))
}

/// GET /playlists/{id}/items
pub async fn list_playlist_items(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    PlaylistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("playlist", id))?;
    let items = PlaylistItemRepo::list_items(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /playlists/{id}/sync
///
/// Manual editor sync: the caller supplies the full candidate list.
/// Timings are always written; omitted optional fields leave the stored
/// columns untouched while explicit nulls clear them.
pub async fn sync_playlist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Vec<CandidateItem>>,
) -> AppResult<impl IntoResponse> {
    PlaylistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("playlist", id))?;

    let counts = reconcile::sync(&state.pool, id, &body, false).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// POST /playlists/{id}/regenerate
///
/// Re-resolve a SMART playlist and overwrite timings. Honors the
/// empty-result rating guard (responds with `skipped: true`).
pub async fn regenerate_playlist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let counts = refresh::regenerate(&state.pool, &state.catalog, id).await?;
    Ok(Json(DataResponse {
        data: RegenerateResponse {
            skipped: counts.is_none(),
            counts,
        },
    }))
}
