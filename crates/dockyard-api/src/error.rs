//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dockyard_core::{BackendError, FaultKind};
use serde::Serialize;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - unknown or disabled scheduler
    InvalidScheduler(String),
    /// 404 Not Found
    NotFound(String),
    /// 502 Bad Gateway - a backend reported a fault
    BackendFault { message: String, fault: FaultKind },
    /// 502 Bad Gateway - cluster credentials could not be derived
    AuthDerivation(String),
    /// 504 Gateway Timeout
    GatewayTimeout(String),
    /// 500 Internal Server Error
    Internal(String),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault: Option<FaultKind>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, fault) = match self {
            ApiError::InvalidScheduler(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_scheduler", msg, None)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "resource_not_found", msg, None),
            ApiError::BackendFault { message, fault } => {
                (StatusCode::BAD_GATEWAY, "backend_fault", message, Some(fault))
            }
            ApiError::AuthDerivation(msg) => {
                (StatusCode::BAD_GATEWAY, "auth_derivation_failure", msg, None)
            }
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "timeout", msg, None),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
        };

        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            fault,
        });

        (status, body).into_response()
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        let message = err.to_string();
        match err {
            BackendError::InvalidScheduler(_) => ApiError::InvalidScheduler(message),
            BackendError::ResourceNotFound(_) => ApiError::NotFound(message),
            BackendError::BackendFault { kind, .. } => ApiError::BackendFault {
                message,
                fault: kind,
            },
            BackendError::AuthDerivation { .. } => ApiError::AuthDerivation(message),
            BackendError::Timeout => ApiError::GatewayTimeout(message),
            BackendError::Internal(_) => ApiError::Internal(message),
        }
    }
}
