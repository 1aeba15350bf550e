//! Common error types for scheduler backends

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Scheduler;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Classification of a backend-reported fault, derived from its error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The backend failed on its side (`ServerException`)
    ServerFault,
    /// The request was rejected, e.g. for permissions (`ClientException`)
    ClientFault,
    /// A request parameter was invalid (`InvalidParameterException`)
    InvalidParameter,
    /// Any other or missing error code
    Unknown,
}

impl FaultKind {
    /// Classify a raw backend error code
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("ServerException") => FaultKind::ServerFault,
            Some("ClientException") => FaultKind::ClientFault,
            Some("InvalidParameterException") => FaultKind::InvalidParameter,
            _ => FaultKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::ServerFault => "server_fault",
            FaultKind::ClientFault => "client_fault",
            FaultKind::InvalidParameter => "invalid_parameter",
            FaultKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while querying scheduler backends
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend-reported failure, classified by error code
    #[error("{scheduler} backend fault ({kind}): {message}")]
    BackendFault {
        scheduler: Scheduler,
        kind: FaultKind,
        /// Raw error code reported by the backend, if any
        code: Option<String>,
        message: String,
    },

    /// Token, CA or endpoint derivation for a kube-style cluster failed
    #[error("Credential derivation failed for cluster {cluster}: {message}")]
    AuthDerivation { cluster: String, message: String },

    /// A named lookup resolved to nothing
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Caller supplied an unrecognized scheduler discriminator
    #[error("Invalid scheduler: {0}")]
    InvalidScheduler(String),

    /// The request deadline expired before the backends answered
    #[error("Operation timed out")]
    Timeout,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            BackendError::BackendFault { .. } => 502,
            BackendError::AuthDerivation { .. } => 502,
            BackendError::ResourceNotFound(_) => 404,
            BackendError::InvalidScheduler(_) => 400,
            BackendError::Timeout => 504,
            BackendError::Internal(_) => 500,
        }
    }

    /// Stable, machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::BackendFault { .. } => "backend_fault",
            BackendError::AuthDerivation { .. } => "auth_derivation_failure",
            BackendError::ResourceNotFound(_) => "resource_not_found",
            BackendError::InvalidScheduler(_) => "invalid_scheduler",
            BackendError::Timeout => "timeout",
            BackendError::Internal(_) => "internal_error",
        }
    }

    pub fn auth(cluster: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::AuthDerivation {
            cluster: cluster.into(),
            message: message.into(),
        }
    }
}

/// Turn a raw backend failure into a typed [`BackendError`].
///
/// Every adapter call funnels its SDK error through here, so the error-code
/// table lives in exactly one place. Not-found codes become
/// [`BackendError::ResourceNotFound`]; everything else is a
/// [`BackendError::BackendFault`] carrying its [`FaultKind`].
pub fn classify_fault(
    scheduler: Scheduler,
    code: Option<&str>,
    message: impl Into<String>,
) -> BackendError {
    let message = message.into();
    match code {
        Some("ResourceNotFoundException") | Some("ClusterNotFoundException") => {
            BackendError::ResourceNotFound(message)
        }
        _ => BackendError::BackendFault {
            scheduler,
            kind: FaultKind::from_code(code),
            code: code.map(str::to_string),
            message,
        },
    }
}
