//! Handlers for run history queries.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use clipdeck_db::models::job_run::JobRunListQuery;
use clipdeck_db::repositories::JobRunRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /history?family=<prefix>&limit=N
///
/// Most recent entries, newest first, optionally filtered by family
/// prefix ("maintenance" matches scheduled and manual runs alike).
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<JobRunListQuery>,
) -> AppResult<impl IntoResponse> {
    let runs =
        JobRunRepo::list_recent(&state.pool, params.family.as_deref(), params.limit).await?;
    Ok(Json(DataResponse { data: runs }))
}
