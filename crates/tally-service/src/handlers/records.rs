//! Charge-record history handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use tally_core::{RecordEntry, RecordId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Record list query parameters. Pages are 1-based.
#[derive(Debug, Deserialize)]
pub struct ListRecordsQuery {
    /// Page to fetch (default: 1).
    #[serde(default = "default_page")]
    pub page: u32,

    /// Records per page (default: 10, clamped to 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

/// One record in a listing.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    /// Record id.
    pub id: RecordId,
    /// Human-readable operation type.
    pub operation: String,
    /// Cost charged.
    pub amount: i64,
    /// Serialized operation result.
    pub operation_response: String,
    /// Balance after the charge.
    pub user_balance: i64,
    /// Charge timestamp, RFC 3339.
    pub created_at: String,
}

impl From<&RecordEntry> for RecordResponse {
    fn from(entry: &RecordEntry) -> Self {
        Self {
            id: entry.id,
            operation: entry.op_type.to_string(),
            amount: entry.amount,
            operation_response: entry.operation_response.clone(),
            user_balance: entry.user_balance,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// Record listing response.
#[derive(Debug, Serialize)]
pub struct ListRecordsResponse {
    /// Records on this page, newest first.
    pub records: Vec<RecordResponse>,
    /// Total non-deleted records across all pages.
    pub total: i64,
}

/// List the authenticated user's charge history.
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<ListRecordsResponse>, ApiError> {
    let page_size = query.page_size.clamp(1, 100);
    let page = state
        .store
        .list_records(auth.user_id, query.page.max(1), page_size)
        .await?;

    Ok(Json(ListRecordsResponse {
        records: page.records.iter().map(RecordResponse::from).collect(),
        total: page.total,
    }))
}

/// Soft-delete one of the authenticated user's records.
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(record_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_record(auth.user_id, RecordId::new(record_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
