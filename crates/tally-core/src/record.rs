//! Charge record types.
//!
//! A record is the audit entry for one successful charge. The ledger writes
//! it in the same transaction that debits the balance, so a committed
//! record's `user_balance` always equals the user's balance immediately
//! after that charge. Records are immutable except for the soft-delete
//! marker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OperationId, OperationType, RecordId, UserId};

/// An immutable audit entry for one charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The record id.
    pub id: RecordId,

    /// The catalog operation that was executed.
    pub operation_id: OperationId,

    /// The user that was charged.
    pub user_id: UserId,

    /// The cost charged, in credit units.
    pub amount: i64,

    /// Serialized operation result; opaque to the ledger.
    pub operation_response: String,

    /// The user's balance immediately after this charge.
    pub user_balance: i64,

    /// When the charge committed.
    pub created_at: DateTime<Utc>,

    /// Soft-delete marker. A deleted record stays in storage and remains
    /// retrievable by direct lookup; it is only excluded from listings.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Check if the record has been soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A record joined with its operation type, as surfaced by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// The record id.
    pub id: RecordId,

    /// Human-readable operation type from the catalog join.
    pub op_type: OperationType,

    /// The cost charged.
    pub amount: i64,

    /// Serialized operation result.
    pub operation_response: String,

    /// Balance after the charge.
    pub user_balance: i64,

    /// When the charge committed.
    pub created_at: DateTime<Utc>,
}

/// One page of a user's charge history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    /// The records on this page.
    pub records: Vec<RecordEntry>,

    /// Total non-deleted records across all pages, for pagination display.
    pub total: i64,
}
