//! Handlers for template CRUD.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use clipdeck_core::error::CoreError;
use clipdeck_core::types::DbId;
use clipdeck_db::models::template::{CreateTemplate, UpdateTemplate};
use clipdeck_db::repositories::TemplateRepo;
use serde_json::json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /templates
pub async fn list_templates(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(body): Json<CreateTemplate>,
) -> AppResult<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(CoreError::Validation("Template name must not be empty".into()).into());
    }
    let template = TemplateRepo::create(&state.pool, &body).await?;
    Ok(Json(DataResponse { data: template }))
}

/// GET /templates/{id}
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("template", id))?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /templates/{id}
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateTemplate>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::update(&state.pool, id, &body)
        .await?
        .ok_or_else(|| CoreError::not_found("template", id))?;
    Ok(Json(DataResponse { data: template }))
}

/// DELETE /templates/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = TemplateRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::not_found("template", id).into());
    }
    Ok(Json(DataResponse {
        data: json!({ "deleted": true }),
    }))
}
