use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use serde_json::json;

use crate::store::StoreError;
use crate::validation::ValidationErrors;

pub const LOGIN_REQUIRED: &str = "Please log in to continue.";

/// Unified application error type that maps to JSON HTTP responses.
///
/// Comment endpoints answer in the `{ "success": false, "errors": {...} }` shape;
/// everything else uses `{ "error": { "code": "...", "message": "..." } }`.
#[derive(Debug)]
pub enum AppError {
    /// 400 with field errors
    Validation(ValidationErrors),
    /// 400 for a body that is not a JSON object
    MalformedBody(String),
    /// 401 for anonymous callers of an authenticated endpoint
    AuthRequired,
    /// 400 Bad Request
    BadRequest(String),
    /// 403 Forbidden
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 409 Conflict
    Conflict(String),
    /// 500 Internal Server Error (logs details, returns generic message)
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Validation(errors) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "errors": errors })),
                )
                    .into_response();
            }
            Self::MalformedBody(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "errors": { "general": msg } })),
                )
                    .into_response();
            }
            Self::AuthRequired => {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "success": false, "errors": { "auth": [LOGIN_REQUIRED] } })),
                )
                    .into_response();
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            Self::Internal(err) => {
                tracing::error!("Internal server error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                }
            })),
        )
            .into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => Self::Validation(errors),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::NotFound(what) => Self::NotFound(format!("No such {what}.")),
            StoreError::Database(err) => Self::Internal(err.into()),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self::Internal(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}
