//! User account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::UserId;

/// A metered user account.
///
/// The balance is prepaid credit in integer units. It is decremented only by
/// the ledger's charge transaction (or reset by the explicit balance-reset
/// operation) and is never negative once a transaction commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user id.
    pub id: UserId,

    /// Unique login name.
    pub username: String,

    /// Account status; inactive users cannot be charged.
    pub status: UserStatus,

    /// Argon2 hash in PHC string format. Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Current prepaid balance in credit units.
    pub balance: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Check if the balance covers a charge of `cost`.
    ///
    /// Mirrors the ledger's two-step check: an empty (or negative) balance
    /// fails outright, and otherwise the balance must cover the full cost.
    #[must_use]
    pub fn can_afford(&self, cost: i64) -> bool {
        self.balance > 0 && self.balance - cost >= 0
    }
}

/// Status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account can log in and execute operations.
    Active,

    /// Account is disabled; treated as missing by the charge path.
    Inactive,
}

impl UserStatus {
    /// Stable name used in the `users.status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = UnknownUserStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownUserStatus(other.to_string())),
        }
    }
}

/// Error for a status string outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user status: {0}")]
pub struct UnknownUserStatus(pub String);
