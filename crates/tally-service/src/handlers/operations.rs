//! Operation execution handler: the metered, charged path.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::executor::OperationRequest;
use crate::state::AppState;

/// Successful execution response: `{"data": {"result", "user_balance"}}`.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    /// The result envelope.
    pub data: ExecutionData,
}

/// The result payload of a charged execution.
#[derive(Debug, Serialize)]
pub struct ExecutionData {
    /// Operation result: number for arithmetic, string for random strings.
    pub result: serde_json::Value,

    /// Balance after the charge.
    pub user_balance: i64,
}

/// Execute an operation for the authenticated user.
pub async fn execute(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<OperationRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    tracing::debug!(
        user_id = %auth.user_id,
        operation = %body.operation,
        "executing operation"
    );

    let execution = state.executor.execute(auth.user_id, &body).await?;

    Ok(Json(ExecuteResponse {
        data: ExecutionData {
            result: execution.result,
            user_balance: execution.user_balance,
        },
    }))
}
