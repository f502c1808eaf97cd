//! API error types and responses.
//!
//! Recoverable conditions answer with `{"error": "<message>"}` and a 4xx
//! status; everything else is logged and answered as an opaque 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use tally_core::OperationError;
use tally_store::StoreError;

use crate::executor::ExecuteError;
use crate::random::RandomError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, malformed, or expired session token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request - invalid input.
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Conflict - resource already exists.
    #[error("{0}")]
    Conflict(String),

    /// Domain validation failure; no charge was made.
    #[error(transparent)]
    Domain(#[from] OperationError),

    /// Balance does not cover the operation cost. The ledger rolled back;
    /// the user-facing message carries the figures.
    #[error("insufficient balance: cost={cost}, balance={balance}")]
    InsufficientBalance {
        /// Balance observed by the ledger.
        balance: i64,
        /// Cost of the rejected operation.
        cost: i64,
    },

    /// The random-string provider failed.
    #[error("external service error: {0}")]
    ExternalService(String),

    /// Internal server error. Never surfaced verbatim.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Domain(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::InsufficientBalance { balance, cost } => {
                let message = if *balance <= 0 {
                    "User balance must be greater than 0".to_string()
                } else {
                    format!("Operation cost: {cost}. Your balance: {balance}")
                };
                (StatusCode::PAYMENT_REQUIRED, message)
            }
            Self::ExternalService(msg) => {
                tracing::warn!(error = %msg, "External service failure");
                (StatusCode::BAD_GATEWAY, "Random-string provider unavailable".to_string())
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientBalance { balance, cost } => {
                Self::InsufficientBalance { balance, cost }
            }
            StoreError::RecordNotFound { record_id } => {
                Self::NotFound(format!("Record {record_id} not found"))
            }
            StoreError::UsernameTaken { .. } => Self::Conflict("Username already exists".into()),
            // Missing users and catalog gaps on the charge path are
            // configuration/integrity faults, not user input.
            StoreError::UserNotFound { .. }
            | StoreError::OperationNotFound { .. }
            | StoreError::Database(_)
            | StoreError::Decode(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<ExecuteError> for ApiError {
    fn from(err: ExecuteError) -> Self {
        match err {
            ExecuteError::MissingOperand(name) => Self::BadRequest(format!("{name} is required")),
            ExecuteError::Domain(e) => Self::Domain(e),
            ExecuteError::Store(e) => e.into(),
            ExecuteError::Random(e) => Self::ExternalService(e.to_string()),
        }
    }
}

impl From<RandomError> for ApiError {
    fn from(err: RandomError) -> Self {
        Self::ExternalService(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_balance_messages() {
        let empty = ApiError::InsufficientBalance { balance: 0, cost: 10 };
        let response = empty.into_response();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

        let short = ApiError::from(StoreError::InsufficientBalance { balance: 5, cost: 10 });
        assert!(matches!(
            short,
            ApiError::InsufficientBalance { balance: 5, cost: 10 }
        ));
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let conflict = ApiError::from(StoreError::UsernameTaken { username: "a".into() });
        assert!(matches!(conflict, ApiError::Conflict(_)));

        let missing_op = ApiError::from(StoreError::OperationNotFound {
            op_type: tally_core::OperationType::Addition,
        });
        assert!(matches!(missing_op, ApiError::Internal(_)));
    }
}
