//! Application error type shared by the allocator, the repositories and the API.
//!
//! Every variant carries a human-readable message and a JSON `details` payload.
//! The allocator never decides HTTP statuses itself: [`AppError::code`] and the
//! [`IntoResponse`] impl are the only places where errors meet the transport.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input, rejected before any storage access.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The identifier does not resolve to a record.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The requested custom alias is already claimed by another record.
    #[error("{message}")]
    AliasConflict { message: String, details: Value },

    /// A storage-level unique constraint rejected the write.
    ///
    /// Callers treat this exactly like [`AppError::AliasConflict`].
    #[error("{message}")]
    UniqueViolation { message: String, details: Value },

    /// The storage backend cannot be reached. Not retried.
    #[error("{message}")]
    StorageUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn alias_conflict(message: impl Into<String>, details: Value) -> Self {
        Self::AliasConflict {
            message: message.into(),
            details,
        }
    }

    pub fn unique_violation(message: impl Into<String>, details: Value) -> Self {
        Self::UniqueViolation {
            message: message.into(),
            details,
        }
    }

    pub fn storage_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::AliasConflict { .. } => "alias_conflict",
            AppError::UniqueViolation { .. } => "unique_violation",
            AppError::StorageUnavailable { .. } => "storage_unavailable",
            AppError::Internal { .. } => "internal_error",
        }
    }

    /// HTTP status the transport layer should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AliasConflict { .. } | AppError::UniqueViolation { .. } => {
                StatusCode::CONFLICT
            }
            AppError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for both the allocator pre-check conflict and the storage backstop.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            AppError::AliasConflict { .. } | AppError::UniqueViolation { .. }
        )
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::AliasConflict { message, details }
            | AppError::UniqueViolation { message, details }
            | AppError::StorageUnavailable { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::unique_violation(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        match e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => AppError::storage_unavailable(
                "Storage is unavailable",
                json!({ "reason": e.to_string() }),
            ),
            _ => AppError::internal("Database error", json!({ "reason": e.to_string() })),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect::<serde_json::Map<String, Value>>();

        AppError::bad_request("Validation failed", Value::Object(details))
    }
}
