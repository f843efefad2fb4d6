//! Handlers for the flat settings store.
//!
//! Writing a schedule key does not reconfigure a live timer by itself;
//! the operator follows up with a restart of the affected family.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use clipdeck_core::error::CoreError;
use clipdeck_db::models::setting::PutSetting;
use clipdeck_db::repositories::SettingsRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /settings
pub async fn list_settings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let settings = SettingsRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /settings/{key}
pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<PutSetting>,
) -> AppResult<impl IntoResponse> {
    if key.trim().is_empty() {
        return Err(CoreError::Validation("Setting key must not be empty".into()).into());
    }
    let setting = SettingsRepo::set(&state.pool, &key, &body.value).await?;
    Ok(Json(DataResponse { data: setting }))
}
