//! Common test utilities for tally service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;

use tally_core::{
    Operation, OperationId, OperationType, Record, RecordEntry, RecordId, RecordPage, User, UserId,
    UserStatus,
};
use tally_service::{create_router, AppState, ServiceConfig};
use tally_store::{Result, Store, StoreError};

/// In-memory [`Store`] double for service tests.
///
/// A single async mutex serializes every mutation, mirroring the row lock
/// the PostgreSQL ledger takes per user. The catalog matches the seed
/// migration.
pub struct MemStore {
    inner: Mutex<Inner>,
}

struct Inner {
    users: Vec<User>,
    records: Vec<Record>,
    next_user_id: i64,
    next_record_id: i64,
}

fn catalog() -> &'static [(i32, OperationType, i64)] {
    &[
        (1, OperationType::Addition, 10),
        (2, OperationType::Subtraction, 10),
        (3, OperationType::Multiplication, 20),
        (4, OperationType::Division, 20),
        (5, OperationType::SquareRoot, 25),
        (6, OperationType::RandomString, 30),
    ]
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                users: Vec::new(),
                records: Vec::new(),
                next_user_id: 1,
                next_record_id: 1,
            }),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        initial_balance: i64,
    ) -> Result<User> {
        let mut inner = self.inner.lock().await;

        if inner.users.iter().any(|u| u.username == username) {
            return Err(StoreError::UsernameTaken {
                username: username.to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(inner.next_user_id),
            username: username.to_string(),
            status: UserStatus::Active,
            password_hash: password_hash.to_string(),
            balance: initial_balance,
            created_at: now,
            updated_at: now,
        };
        inner.next_user_id += 1;
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .users
            .iter()
            .find(|u| u.id == user_id && u.is_active())
            .cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .users
            .iter()
            .find(|u| u.username == username && u.is_active())
            .cloned())
    }

    async fn reset_balance(&self, user_id: UserId, balance: i64) -> Result<i64> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id && u.is_active())
            .ok_or(StoreError::UserNotFound { user_id })?;

        user.balance = balance;
        user.updated_at = Utc::now();
        Ok(user.balance)
    }

    async fn find_operation(&self, op_type: OperationType) -> Result<Operation> {
        catalog()
            .iter()
            .find(|(_, t, _)| *t == op_type)
            .map(|&(id, op_type, cost)| Operation {
                id: OperationId::new(id),
                op_type,
                cost,
            })
            .ok_or(StoreError::OperationNotFound { op_type })
    }

    async fn charge(
        &self,
        operation_id: OperationId,
        user_id: UserId,
        cost: i64,
        response: &str,
    ) -> Result<Record> {
        let mut inner = self.inner.lock().await;

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id && u.is_active())
            .ok_or(StoreError::UserNotFound { user_id })?;

        if user.balance <= 0 {
            return Err(StoreError::InsufficientBalance {
                balance: user.balance,
                cost,
            });
        }

        let updated = user.balance - cost;
        if updated < 0 {
            return Err(StoreError::InsufficientBalance {
                balance: user.balance,
                cost,
            });
        }

        user.balance = updated;
        user.updated_at = Utc::now();

        let record = Record {
            id: RecordId::new(inner.next_record_id),
            operation_id,
            user_id,
            amount: cost,
            operation_response: response.to_string(),
            user_balance: updated,
            created_at: Utc::now(),
            deleted_at: None,
        };
        inner.next_record_id += 1;
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn list_records(&self, user_id: UserId, page: u32, page_size: u32) -> Result<RecordPage> {
        let inner = self.inner.lock().await;

        let mut matching: Vec<&Record> = inner
            .records
            .iter()
            .filter(|r| r.user_id == user_id && !r.is_deleted())
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        let total = matching.len() as i64;
        let offset = (page.max(1) as usize - 1) * page_size as usize;

        let records = matching
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .map(|r| RecordEntry {
                id: r.id,
                op_type: catalog()
                    .iter()
                    .find(|(id, _, _)| OperationId::new(*id) == r.operation_id)
                    .map(|(_, t, _)| *t)
                    .expect("record references a seeded operation"),
                amount: r.amount,
                operation_response: r.operation_response.clone(),
                user_balance: r.user_balance,
                created_at: r.created_at,
            })
            .collect();

        Ok(RecordPage { records, total })
    }

    async fn get_record(&self, record_id: RecordId) -> Result<Option<Record>> {
        let inner = self.inner.lock().await;
        Ok(inner.records.iter().find(|r| r.id == record_id).cloned())
    }

    async fn delete_record(&self, user_id: UserId, record_id: RecordId) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == record_id && r.user_id == user_id && !r.is_deleted())
            .ok_or(StoreError::RecordNotFound { record_id })?;

        record.deleted_at = Some(Utc::now());
        Ok(())
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
}

impl TestHarness {
    /// Create a harness with the default test configuration.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a harness with a custom configuration (e.g. a wiremock
    /// random-string URL or a different initial balance).
    pub fn with_config(config: ServiceConfig) -> Self {
        let store: Arc<dyn Store> = Arc::new(MemStore::new());
        let state = AppState::new(store, config);
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");
        Self { server }
    }

    /// Sign a user up and return their session token.
    pub async fn signup(&self, username: &str) -> String {
        let response = self
            .server
            .post("/v1/auth/signup")
            .json(&json!({ "username": username, "password": "correct-horse" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["token"].as_str().expect("signup returns a token").to_string()
    }

    /// Format a bearer header value.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Default service configuration for tests.
pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        jwt_secret: "test-secret".into(),
        ..ServiceConfig::default()
    }
}
