//! Handlers for scheduler status and lifecycle.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use clipdeck_core::family::JobFamily;
use serde_json::json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /schedules
pub async fn list_schedules(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let statuses = state.scheduler.statuses().await;
    Ok(Json(DataResponse { data: statuses }))
}

/// GET /schedules/{family}
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> AppResult<impl IntoResponse> {
    let family = JobFamily::from_str(&family)?;
    let status = state.scheduler.status(family).await?;
    Ok(Json(DataResponse { data: status }))
}

/// POST /schedules/{family}/start
pub async fn start_schedule(
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> AppResult<impl IntoResponse> {
    let family = JobFamily::from_str(&family)?;
    let started = state.scheduler.start(family).await?;
    Ok(Json(DataResponse {
        data: json!({ "started": started }),
    }))
}

/// POST /schedules/{family}/stop
pub async fn stop_schedule(
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> AppResult<impl IntoResponse> {
    let family = JobFamily::from_str(&family)?;
    state.scheduler.stop(family).await?;
    Ok(Json(DataResponse {
        data: json!({ "stopped": true }),
    }))
}

/// POST /schedules/{family}/restart
///
/// Stop + start so changed trigger settings take effect without a process
/// restart.
pub async fn restart_schedule(
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> AppResult<impl IntoResponse> {
    let family = JobFamily::from_str(&family)?;
    let started = state.scheduler.restart(family).await?;
    Ok(Json(DataResponse {
        data: json!({ "started": started }),
    }))
}
