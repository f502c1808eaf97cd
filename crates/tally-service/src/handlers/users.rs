//! Current-user handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use tally_core::UserId;
use tally_store::StoreError;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Current user response.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// User id.
    pub id: UserId,
    /// Username.
    pub username: String,
    /// Current prepaid balance.
    pub balance: i64,
}

/// Balance reset response.
#[derive(Debug, Serialize)]
pub struct ResetBalanceResponse {
    /// The restored balance.
    pub user_balance: i64,
}

/// Get the authenticated user's account.
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    // A valid token for a since-deactivated account reads as absent here;
    // that is a stale session, not an integrity fault.
    let user = state
        .store
        .get_user(auth.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        balance: user.balance,
    }))
}

/// Reset the authenticated user's balance to the configured initial value.
pub async fn reset_balance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ResetBalanceResponse>, ApiError> {
    let user_balance = state
        .store
        .reset_balance(auth.user_id, state.config.initial_balance)
        .await
        .map_err(|e| match e {
            StoreError::UserNotFound { .. } => ApiError::Unauthorized,
            other => other.into(),
        })?;

    tracing::info!(user_id = %auth.user_id, user_balance, "balance reset");

    Ok(Json(ResetBalanceResponse { user_balance }))
}
