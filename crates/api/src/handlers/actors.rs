//! Handlers for the actor roster.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use clipdeck_core::conditions::{MIN_RATING_CEIL, MIN_RATING_FLOOR};
use clipdeck_core::error::CoreError;
use clipdeck_db::models::actor::UpsertActor;
use clipdeck_db::repositories::ActorRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /actors
pub async fn list_actors(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let actors = ActorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: actors }))
}

/// GET /actors/{id}
pub async fn get_actor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let actor = ActorRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("actor", &id))?;
    Ok(Json(DataResponse { data: actor }))
}

/// PUT /actors/{id}
///
/// Upsert keyed by the catalog performer id (roster upkeep / rating).
pub async fn upsert_actor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpsertActor>,
) -> AppResult<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(CoreError::Validation("Actor name must not be empty".into()).into());
    }
    if let Some(rating) = body.rating {
        if !(MIN_RATING_FLOOR..=MIN_RATING_CEIL).contains(&rating) {
            return Err(CoreError::Validation(format!(
                "Actor rating must be between {MIN_RATING_FLOOR} and {MIN_RATING_CEIL}, got {rating}"
            ))
            .into());
        }
    }

    let actor = ActorRepo::upsert(&state.pool, &id, &body).await?;
    Ok(Json(DataResponse { data: actor }))
}
