//! Signup and login handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, issue_token, verify_password};
use crate::error::ApiError;
use crate::state::AppState;

/// Signup/login request body.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password; hashed before storage, never logged.
    pub password: String,
}

/// Session token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Register a new user with the configured initial balance.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Please provide a username and password".into(),
        ));
    }

    let password_hash = hash_password(&body.password)?;
    let user = state
        .store
        .create_user(username, &password_hash, state.config.initial_balance)
        .await?;

    tracing::info!(user_id = %user.id, username, "signup completed");

    let token = issue_token(&state.config, &user)?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Log an existing user in.
///
/// Unknown usernames and wrong passwords answer with the same message, so
/// the endpoint does not reveal which usernames exist.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Please provide a username and password".into(),
        ));
    }

    let user = state.store.get_user_by_username(&body.username).await?;
    let valid = user
        .as_ref()
        .is_some_and(|u| verify_password(&body.password, &u.password_hash));
    let Some(user) = user.filter(|_| valid) else {
        return Err(ApiError::BadRequest("Invalid username or password".into()));
    };

    let token = issue_token(&state.config, &user)?;
    Ok(Json(TokenResponse { token }))
}
