//! PostgreSQL implementation of the [`Store`] trait.
//!
//! Row structs mirror the SQL schema exactly; domain types are produced at
//! this boundary so nothing loosely typed leaks into the core.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tally_core::{
    Operation, OperationId, OperationType, Record, RecordEntry, RecordId, RecordPage, User, UserId,
};

use crate::error::{Result, StoreError};
use crate::Store;

/// PostgreSQL-backed storage.
///
/// Holds an injected connection pool; constructing one per test with an
/// isolated database is cheap.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (used by the service for health checks).
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// =============================================================================
// Row types
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    status: String,
    password_hash: String,
    balance: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self> {
        let status = row
            .status
            .parse()
            .map_err(|e: tally_core::UnknownUserStatus| StoreError::Decode(e.to_string()))?;
        Ok(Self {
            id: UserId::new(row.id),
            username: row.username,
            status,
            password_hash: row.password_hash,
            balance: row.balance,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OperationRow {
    id: i32,
    op_type: String,
    cost: i64,
}

impl TryFrom<OperationRow> for Operation {
    type Error = StoreError;

    fn try_from(row: OperationRow) -> Result<Self> {
        let op_type = row
            .op_type
            .parse()
            .map_err(|e: tally_core::UnknownOperationType| StoreError::Decode(e.to_string()))?;
        Ok(Self {
            id: OperationId::new(row.id),
            op_type,
            cost: row.cost,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: i64,
    operation_id: i32,
    user_id: i64,
    amount: i64,
    operation_response: String,
    user_balance: i64,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Self {
            id: RecordId::new(row.id),
            operation_id: OperationId::new(row.operation_id),
            user_id: UserId::new(row.user_id),
            amount: row.amount,
            operation_response: row.operation_response,
            user_balance: row.user_balance,
            created_at: row.created_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecordEntryRow {
    id: i64,
    op_type: String,
    amount: i64,
    operation_response: String,
    user_balance: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<RecordEntryRow> for RecordEntry {
    type Error = StoreError;

    fn try_from(row: RecordEntryRow) -> Result<Self> {
        let op_type = row
            .op_type
            .parse()
            .map_err(|e: tally_core::UnknownOperationType| StoreError::Decode(e.to_string()))?;
        Ok(Self {
            id: RecordId::new(row.id),
            op_type,
            amount: row.amount,
            operation_response: row.operation_response,
            user_balance: row.user_balance,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, username, status, password_hash, balance, created_at, updated_at";

const RECORD_COLUMNS: &str =
    "id, operation_id, user_id, amount, operation_response, user_balance, created_at, deleted_at";

// =============================================================================
// Store implementation
// =============================================================================

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        initial_balance: i64,
    ) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, password_hash, status, balance)
             VALUES ($1, $2, 'active', $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(password_hash)
        .bind(initial_balance)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UsernameTaken {
                username: username.to_string(),
            },
            _ => StoreError::Database(e),
        })?;

        tracing::info!(user_id = row.id, username, "user created");
        row.try_into()
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND status = 'active'"
        ))
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 AND status = 'active'"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn reset_balance(&self, user_id: UserId, balance: i64) -> Result<i64> {
        let new_balance: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET balance = $2, updated_at = now()
             WHERE id = $1 AND status = 'active'
             RETURNING balance",
        )
        .bind(user_id.get())
        .bind(balance)
        .fetch_optional(&self.pool)
        .await?;

        new_balance.ok_or(StoreError::UserNotFound { user_id })
    }

    async fn find_operation(&self, op_type: OperationType) -> Result<Operation> {
        let row = sqlx::query_as::<_, OperationRow>(
            "SELECT id, op_type, cost FROM operations WHERE op_type = $1",
        )
        .bind(op_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map_or(Err(StoreError::OperationNotFound { op_type }), TryInto::try_into)
    }

    async fn charge(
        &self,
        operation_id: OperationId,
        user_id: UserId,
        cost: i64,
        response: &str,
    ) -> Result<Record> {
        let mut tx = self.pool.begin().await?;

        // Serialization point: concurrent charges for the same user block
        // here until the prior transaction commits or rolls back.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE id = $1 AND status = 'active'
             FOR UPDATE"
        ))
        .bind(user_id.get())
        .fetch_optional(&mut *tx)
        .await?;

        // Early returns drop `tx`, which rolls the transaction back.
        let Some(user) = row else {
            return Err(StoreError::UserNotFound { user_id });
        };

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

        sqlx::query("UPDATE users SET balance = $1, updated_at = now() WHERE id = $2")
            .bind(updated)
            .bind(user_id.get())
            .execute(&mut *tx)
            .await?;

        let record = sqlx::query_as::<_, RecordRow>(&format!(
            "INSERT INTO records (operation_id, user_id, amount, operation_response, user_balance)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(operation_id.get())
        .bind(user_id.get())
        .bind(cost)
        .bind(response)
        .bind(updated)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id = %user_id,
            record_id = record.id,
            cost,
            new_balance = updated,
            "charge committed"
        );

        Ok(record.into())
    }

    async fn list_records(&self, user_id: UserId, page: u32, page_size: u32) -> Result<RecordPage> {
        let page = i64::from(page.max(1));
        let page_size = i64::from(page_size);
        let offset = (page - 1) * page_size;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM records WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id.get())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, RecordEntryRow>(
            "SELECT r.id, o.op_type, r.amount, r.operation_response, r.user_balance, r.created_at
             FROM records r
             JOIN operations o ON o.id = r.operation_id
             WHERE r.user_id = $1 AND r.deleted_at IS NULL
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id.get())
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>>>()?;

        Ok(RecordPage { records, total })
    }

    async fn get_record(&self, record_id: RecordId) -> Result<Option<Record>> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM records WHERE id = $1"
        ))
        .bind(record_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_record(&self, user_id: UserId, record_id: RecordId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE records SET deleted_at = now()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(record_id.get())
        .bind(user_id.get())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound { record_id });
        }

        Ok(())
    }
}
