//! Tally HTTP API service.
//!
//! This crate provides the HTTP surface of the tally metering service:
//!
//! - Signup/login with argon2 password hashing and JWT session tokens
//! - Operation execution (the metered, charged path)
//! - Charge-record listing and soft deletion
//! - Balance reset
//!
//! The money-like correctness lives in `tally-store`; this crate is glue:
//! it resolves the session to a user id, validates operands, talks to the
//! random-string provider, and shapes responses as
//! `{"data": {...}}` / `{"error": "..."}`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod auth;
pub mod config;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod random;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use executor::{Execution, OperationExecutor, OperationRequest};
pub use random::{RandomClient, RandomError};
pub use routes::create_router;
pub use state::AppState;
