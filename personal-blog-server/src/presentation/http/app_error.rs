use crate::domain::error::DomainError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error("unauthorized")]
    Unauthorized,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg, field) = match self {
            AppError::Domain(err) => match &err {
                DomainError::Validation { field, .. } => (
                    StatusCode::BAD_REQUEST,
                    err.to_string(),
                    Some(field.to_string()),
                ),
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string(), None),
                DomainError::Unexpected(detail) => {
                    error!(error = %detail, "post store failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                        None,
                    )
                }
            },
            AppError::Validation(err) => {
                let field = first_failing_field(&err);
                (StatusCode::BAD_REQUEST, err.to_string(), field)
            }
            AppError::MalformedBody(rejection) => {
                let status = match rejection.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, rejection.body_text(), None)
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string(), None),
        };

        (status, Json(ErrorBody { error: msg, field })).into_response()
    }
}

/// Alphabetically first field with an error, so responses are deterministic.
fn first_failing_field(errors: &ValidationErrors) -> Option<String> {
    errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .min()
}
