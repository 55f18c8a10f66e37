// ABOUTME: API error type and its JSON response mapping
// ABOUTME: Every failure body is {"reason": "..."}

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use catima_security::AuthError;
use catima_serialize::SerializeError;
use catima_storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No X-Token-Username or X-Token-Secret provided")]
    CredentialMissing,

    #[error("Token authentication failed")]
    CredentialInvalid,

    #[error("No card found matching the query")]
    CardNotFound,

    #[error("{0} method not allowed for this endpoint.")]
    MethodNotAllowed(Method),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),
}

#[derive(Serialize)]
struct ErrorResponse {
    reason: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::CredentialMissing | ApiError::CredentialInvalid => StatusCode::FORBIDDEN,
            ApiError::CardNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Storage(_) | ApiError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client, internal details stay in the logs
    fn reason(&self) -> String {
        match self {
            ApiError::Storage(_) | ApiError::Serialize(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::CredentialMissing => ApiError::CredentialMissing,
            AuthError::CredentialInvalid => ApiError::CredentialInvalid,
            AuthError::Storage(e) => ApiError::Storage(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "Internal server error occurred");
        } else {
            info!(status = %status, error = %self, "API error response");
        }

        let body = ErrorResponse {
            reason: self.reason(),
        };
        (status, Json(body)).into_response()
    }
}

/// Fallback for known paths hit with an unsupported method
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}
