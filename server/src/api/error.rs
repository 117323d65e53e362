use crate::store::StoreError;
use crate::validation::ValidationErrors;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// One rejected field. `code` is a violation kind (`MissingField`,
/// `OutOfRange`, ...) or `DuplicateKey` / `InvalidIdentifier`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A referenced entity (e.g. the recipe of a new review) does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    MalformedBody(String),

    /// A path segment or query string that could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(err) => match err {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::DuplicateKey { .. } | StoreError::InvalidIdentifier(_) => {
                    StatusCode::BAD_REQUEST
                }
                StoreError::Unavailable(_) | StoreError::Corrupt(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(errors) => ErrorResponse {
                message: "Validation failed".to_string(),
                details: Some(
                    errors
                        .violations()
                        .iter()
                        .map(|violation| FieldError {
                            field: violation.field.clone(),
                            code: violation.kind.as_str().to_string(),
                            message: violation.message.clone(),
                        })
                        .collect(),
                ),
            },
            ApiError::Store(StoreError::DuplicateKey { entity, field }) => ErrorResponse {
                message: format!("{entity} {field} already exists"),
                details: Some(vec![FieldError {
                    field: field.to_string(),
                    code: "DuplicateKey".to_string(),
                    message: self.to_string(),
                }]),
            },
            ApiError::Store(StoreError::InvalidIdentifier(raw)) => ErrorResponse {
                message: "Invalid identifier".to_string(),
                details: Some(vec![FieldError {
                    field: "id".to_string(),
                    code: "InvalidIdentifier".to_string(),
                    message: format!("'{raw}' is not a valid identifier"),
                }]),
            },
            ApiError::Store(StoreError::Unavailable(_) | StoreError::Corrupt(_)) => ErrorResponse {
                message: "Internal server error".to_string(),
                details: None,
            },
            _ => ErrorResponse {
                message: self.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Store operation failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}
