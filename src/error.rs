//! HTTP-facing error type with status code mapping.
//!
//! [`ApiError`] is what every REST handler returns on failure. Each variant
//! maps to an HTTP status code and a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{NoticeDraftError, NoticeId, ValidationError};
use crate::store::StoreError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "client name is required"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                   |
/// |-----------|--------------------|-------------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request               |
/// | 2000–2999 | Not Found/Conflict | 404 Not Found / 409 Conflict  |
/// | 3000–3999 | Server             | 500 / 503                     |
/// | 4000–4999 | Data source        | 422 Unprocessable Entity      |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Appointment form failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Notice draft failed validation.
    #[error(transparent)]
    NoticeDraft(#[from] NoticeDraftError),

    /// Malformed query or body.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The addressed record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind (`appointment`, `barber`, `notice`).
        kind: &'static str,
        /// Requested id.
        id: String,
    },

    /// An active notice cannot be deleted.
    #[error("notice {0} is active; deactivate it first")]
    ActiveNotice(NoticeId),

    /// The data source refused the operation.
    #[error("{0}")]
    Rejected(String),

    /// Neither the backend nor the fallback dataset could serve the call.
    #[error("{0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for a [`ApiError::NotFound`].
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Validation(_) => 1002,
            Self::NoticeDraft(_) => 1003,
            Self::NotFound { .. } => 2001,
            Self::ActiveNotice(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Unavailable(_) => 3001,
            Self::Rejected(_) => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Validation(_) | Self::NoticeDraft(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ActiveNotice(_) => StatusCode::CONFLICT,
            Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ActiveNotice(id) => Self::ActiveNotice(id),
            StoreError::Rejected { .. } => Self::Rejected(err.to_string()),
            StoreError::Unavailable { .. } => Self::Unavailable(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let rejected = ApiError::from(StoreError::Rejected {
            op: "create_barber",
            reason: "duplicate id".to_string(),
        });
        assert_eq!(rejected.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let down = ApiError::from(StoreError::Unavailable {
            op: "list_appointments",
            reason: "connection refused".to_string(),
        });
        assert_eq!(down.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(down.error_code(), 3001);

        let active = ApiError::from(StoreError::ActiveNotice(NoticeId::new(1)));
        assert_eq!(active.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_is_a_bad_request() {
        let err = ApiError::from(ValidationError::MissingField("client name"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "client name is required");
    }

    #[tokio::test]
    async fn response_body_carries_code_and_message() {
        let response = ApiError::not_found("barber", "zeca").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(json) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body is not json");
        };
        assert_eq!(json["error"]["code"], 2001);
        assert_eq!(json["error"]["message"], "barber not found: zeca");
        assert!(json["error"].get("details").is_none());
    }
}
