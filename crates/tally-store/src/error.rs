//! Error types for tally storage.

use tally_core::{OperationType, RecordId, UserId};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Active user row missing: the id does not exist or the account is
    /// inactive. The charge path treats both the same way.
    #[error("user not found or inactive: {user_id}")]
    UserNotFound {
        /// The user id that was looked up.
        user_id: UserId,
    },

    /// Operation type missing from the catalog. Reference data is seeded by
    /// migration, so this is a configuration fault rather than user input.
    #[error("operation not found in catalog: {op_type}")]
    OperationNotFound {
        /// The operation type that was looked up.
        op_type: OperationType,
    },

    /// Record missing, already deleted, or owned by another user.
    #[error("record not found: {record_id}")]
    RecordNotFound {
        /// The record id that was looked up.
        record_id: RecordId,
    },

    /// Username already registered.
    #[error("username already exists: {username}")]
    UsernameTaken {
        /// The username that collided.
        username: String,
    },

    /// Balance does not cover the charge. Raised only after the ledger
    /// transaction has rolled back; no balance change or record survives.
    #[error("insufficient balance: cost={cost}, balance={balance}")]
    InsufficientBalance {
        /// The balance observed under the row lock.
        balance: i64,
        /// The cost that was requested.
        cost: i64,
    },

    /// Any other database failure (connectivity, constraint violation).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row held a value the domain types reject.
    #[error("column decode error: {0}")]
    Decode(String),
}
