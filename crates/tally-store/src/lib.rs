//! PostgreSQL storage layer for tally.
//!
//! This crate owns everything that touches the database: user accounts, the
//! operation catalog, the balance ledger, and the charge-record store.
//!
//! # Architecture
//!
//! Three tables back the service (see `migrations/`):
//!
//! - `users`: accounts with a prepaid integer balance
//! - `operations`: immutable catalog of operation types and costs
//! - `records`: one audit row per successful charge, soft-deletable
//!
//! The ledger is [`Store::charge`]: a single transaction that locks the user
//! row (`SELECT ... FOR UPDATE`), validates funds, debits the balance and
//! appends the record. That row lock is the system's only synchronization
//! primitive; charges for one user serialize on it while charges for
//! different users proceed concurrently.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod pg;

pub use error::{Result, StoreError};
pub use pg::PgStore;

use async_trait::async_trait;

use tally_core::{Operation, OperationId, OperationType, Record, RecordId, RecordPage, User, UserId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer so the service and its tests can
/// run against something other than PostgreSQL; [`PgStore`] is the only
/// production implementation.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Users
    // =========================================================================

    /// Create an active user with the given initial balance.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UsernameTaken`] if the username is already
    /// registered.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        initial_balance: i64,
    ) -> Result<User>;

    /// Get an active user by id. Inactive accounts read as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>>;

    /// Get an active user by username, including the password hash, for
    /// login verification.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Set a user's balance to a fixed value, outside the ledger. This is
    /// the explicit balance-reset operation; every other balance change
    /// goes through [`Store::charge`].
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UserNotFound`] if the user is missing or
    /// inactive.
    async fn reset_balance(&self, user_id: UserId, balance: i64) -> Result<i64>;

    // =========================================================================
    // Operation catalog
    // =========================================================================

    /// Look up a catalog row by operation type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OperationNotFound`] if the type is not seeded;
    /// callers treat that as a configuration fault, not user input.
    async fn find_operation(&self, op_type: OperationType) -> Result<Operation>;

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Atomically debit `cost` from the user and append the charge record.
    ///
    /// The whole sequence runs in one transaction with the user row locked:
    /// validate the account is active, validate funds, write the new
    /// balance, insert the record with `user_balance` equal to the
    /// post-charge balance. Returns the inserted record. A failure at any
    /// step rolls the transaction back; partial writes are never
    /// observable.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UserNotFound`] if the user is missing or inactive.
    /// - [`StoreError::InsufficientBalance`] if the balance is empty or
    ///   does not cover `cost`.
    async fn charge(
        &self,
        operation_id: OperationId,
        user_id: UserId,
        cost: i64,
        response: &str,
    ) -> Result<Record>;

    // =========================================================================
    // Record store (read side)
    // =========================================================================

    /// List a user's non-deleted records, newest first, with the total
    /// count for pagination. Pages are 1-based.
    ///
    /// This read takes no lock and may observe a balance that changes
    /// concurrently; it is informational, not transactional.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_records(&self, user_id: UserId, page: u32, page_size: u32) -> Result<RecordPage>;

    /// Direct lookup of a record by id, including soft-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_record(&self, record_id: RecordId) -> Result<Option<Record>>;

    /// Soft-delete a record owned by `user_id` by stamping `deleted_at`.
    /// The row is never physically removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RecordNotFound`] if the record does not exist,
    /// is already deleted, or belongs to another user.
    async fn delete_record(&self, user_id: UserId, record_id: RecordId) -> Result<()>;
}
