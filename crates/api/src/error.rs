use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clipdeck_core::error::CoreError;
use clipdeck_engine::EngineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`EngineError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `clipdeck_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An engine-level error (catalog, reconcile, scheduler).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = classify(&self);

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an error into an HTTP status, error code, and message.
fn classify(err: &AppError) -> (StatusCode, &'static str, String) {
    match err {
        AppError::Core(core) => classify_core_error(core),
        AppError::Engine(engine) => classify_engine_error(engine),
        AppError::Database(db) => classify_sqlx_error(db),
        AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

fn classify_engine_error(err: &EngineError) -> (StatusCode, &'static str, String) {
    match err {
        EngineError::Core(core) => classify_core_error(core),
        EngineError::Database(db) => classify_sqlx_error(db),
        // Catalog outages surface as bad-gateway: the request was valid,
        // the upstream was not reachable or rejected the query.
        EngineError::Catalog(e) => (
            StatusCode::BAD_GATEWAY,
            "CATALOG_UNAVAILABLE",
            e.to_string(),
        ),
        EngineError::AlreadyRunning { .. } => {
            (StatusCode::CONFLICT, "ALREADY_RUNNING", err.to_string())
        }
        EngineError::Io(e) => {
            tracing::error!(error = %e, "Backup I/O error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipdeck_core::family::JobFamily;

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::Core(CoreError::not_found("playlist", 7));
        let (status, code, _) = classify(&err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_maps_to_400() {
        let err = AppError::Core(CoreError::Validation("bad".into()));
        let (status, code, _) = classify(&err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn already_running_maps_to_409() {
        let err = AppError::Engine(EngineError::AlreadyRunning {
            family: JobFamily::Maintenance,
        });
        let (status, code, msg) = classify(&err);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "ALREADY_RUNNING");
        assert!(msg.contains("maintenance"));
    }

    #[test]
    fn catalog_failure_maps_to_502() {
        let err = AppError::Engine(EngineError::Catalog(
            clipdeck_catalog::CatalogError::Query("boom".into()),
        ));
        let (status, code, _) = classify(&err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "CATALOG_UNAVAILABLE");
    }

    #[test]
    fn engine_core_errors_unwrap_to_their_own_status() {
        let err = AppError::Engine(EngineError::Core(CoreError::Validation("nope".into())));
        let (status, _, _) = classify(&err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
