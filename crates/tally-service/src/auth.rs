//! Session authentication.
//!
//! Passwords are stored as argon2 PHC strings. A successful signup or login
//! issues a short-lived HS256 JWT; the [`AuthUser`] extractor validates the
//! bearer token and resolves the request to a [`UserId`], which the rest of
//! the service trusts.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_core::{User, UserId};

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims for a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user id.
    pub sub: i64,
    /// The username at issue time.
    pub username: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Token id.
    pub jti: String,
}

/// Hash a password with argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored PHC hash string.
///
/// An unparsable hash reads as a mismatch.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Issue a session token for a user.
pub fn issue_token(config: &ServiceConfig, user: &User) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.get(),
        username: user.username.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(config.token_ttl_seconds)).timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))
}

/// Validate a session token and return its claims.
///
/// Signature and expiry failures both read as [`ApiError::Unauthorized`].
pub fn verify_token(config: &ServiceConfig, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized)
}

/// An authenticated user extracted from a bearer session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user id.
    pub user_id: UserId,
    /// The username claim.
    pub username: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let claims = verify_token(&state.config, token)?;

        Ok(AuthUser {
            user_id: UserId::new(claims.sub),
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::UserStatus;

    fn test_user() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(7),
            username: "alice".into(),
            status: UserStatus::Active,
            password_hash: String::new(),
            balance: 100,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn unparsable_hash_never_verifies() {
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }

    #[test]
    fn token_roundtrip() {
        let config = ServiceConfig::default();
        let token = issue_token(&config, &test_user()).unwrap();

        let claims = verify_token(&config, &token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = ServiceConfig::default();
        let other = ServiceConfig {
            jwt_secret: "different-secret".into(),
            ..ServiceConfig::default()
        };

        let token = issue_token(&other, &test_user()).unwrap();
        assert!(matches!(
            verify_token(&config, &token),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = ServiceConfig {
            token_ttl_seconds: -120,
            ..ServiceConfig::default()
        };

        let token = issue_token(&config, &test_user()).unwrap();
        assert!(matches!(
            verify_token(&config, &token),
            Err(ApiError::Unauthorized)
        ));
    }
}
