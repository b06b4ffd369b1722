//! Application error handling
//!
//! Every failure leaves the API in the same envelope shape. Infrastructure
//! errors are logged with their detail and reach the client only as
//! "Internal Server Error".

use crate::auth::AuthError;
use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use todo_shared::{Envelope, FieldErrors, RequestError};
use tracing::error;

/// Message sent to clients for every 500
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource absent under the caller's scope; reported as 400
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken => ApiError::Conflict(StoreError::EmailTaken.to_string()),
            StoreError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Lookup(e) => e.into(),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Fields(errors) => ApiError::Validation(errors),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, None, errors),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, Some(msg), FieldErrors::new())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, Some(msg), FieldErrors::new()),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, Some(msg), FieldErrors::new())
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some(INTERNAL_ERROR_MESSAGE.to_string()),
                    FieldErrors::new(),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some(INTERNAL_ERROR_MESSAGE.to_string()),
                    FieldErrors::new(),
                )
            }
        };

        (status, Json(Envelope::fail(message, errors))).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_not_found_is_bad_request() {
        let response = ApiError::NotFound("invalid todo id, todo not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_email_taken_is_bad_request() {
        let response = ApiError::from(StoreError::EmailTaken).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_error_status() {
        let response = ApiError::from(AuthError::Token(TokenError::Expired)).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_lookup_failure_is_internal() {
        let err = AuthError::Lookup(StoreError::Database(sqlx::Error::PoolTimedOut));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response =
            ApiError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["status"], "fail");
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
        assert_eq!(body["data"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_type_mismatch_is_single_error() {
        let response = ApiError::from(RequestError::type_mismatch("id", "i64")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            r#"Invalid json type for field: "id", expected type: "i64""#
        );
        assert!(body.get("errors").is_none());
    }
}
