//! Core types for the tally metering service.
//!
//! This crate provides the domain types shared by the storage layer and the
//! HTTP service:
//!
//! - **Identifiers**: [`UserId`], [`OperationId`], [`RecordId`]
//! - **Users**: [`User`], [`UserStatus`]
//! - **Catalog**: [`Operation`], [`OperationType`]
//! - **Charge history**: [`Record`], [`RecordEntry`], [`RecordPage`]
//!
//! # Balance unit
//!
//! Balances and costs are plain integer credit units stored as `i64`.
//! A user's balance is never negative once a transaction commits; the
//! storage layer enforces this inside the ledger transaction.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod operation;
pub mod record;
pub mod user;

pub use error::OperationError;
pub use ids::{IdError, OperationId, RecordId, UserId};
pub use operation::{Operation, OperationType, UnknownOperationType};
pub use record::{Record, RecordEntry, RecordPage};
pub use user::{UnknownUserStatus, User, UserStatus};
