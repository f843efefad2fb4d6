//! Handlers for manual job triggers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use clipdeck_core::family::JobFamily;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /jobs/{family}/run
///
/// Run the family's job body now, regardless of scheduler state. Returns
/// the full result object (counts + error list) synchronously; a 409 if
/// the family already has a run in flight.
pub async fn run_job(
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> AppResult<impl IntoResponse> {
    let family = JobFamily::from_str(&family)?;
    let run = state.scheduler.trigger_now(family).await?;
    Ok(Json(DataResponse { data: run }))
}
