//! The operation executor.
//!
//! Stateless dispatcher between the HTTP surface and the ledger. The order
//! per call is deliberate: operand and domain validation first (cheap, no
//! I/O), then the catalog lookup, then the result computation or provider
//! fetch, and only then the charged ledger write. A request that cannot
//! succeed is never billed.

use std::sync::Arc;

use serde::Deserialize;

use tally_core::{OperationError, OperationType, UserId};
use tally_store::{Store, StoreError};

use crate::random::{RandomClient, RandomError};

/// One operation execution request, as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationRequest {
    /// Which operation to run.
    pub operation: OperationType,

    /// First operand; required for all arithmetic operations.
    #[serde(default)]
    pub operand1: Option<f64>,

    /// Second operand; required for the binary arithmetic operations.
    #[serde(default)]
    pub operand2: Option<f64>,
}

/// A successful, charged execution.
#[derive(Debug, Clone)]
pub struct Execution {
    /// The operation result: a JSON number for arithmetic, a string for
    /// the random-string operation.
    pub result: serde_json::Value,

    /// The caller's balance after the charge.
    pub user_balance: i64,
}

/// Errors from executing an operation.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// A required operand was absent. No charge was made.
    #[error("{0} is required")]
    MissingOperand(&'static str),

    /// Domain validation failed. No charge was made.
    #[error(transparent)]
    Domain(#[from] OperationError),

    /// Catalog or ledger failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The random-string provider failed. No charge was made.
    #[error(transparent)]
    Random(#[from] RandomError),
}

/// Stateless operation dispatcher over an injected store and provider.
#[derive(Clone)]
pub struct OperationExecutor {
    store: Arc<dyn Store>,
    random: RandomClient,
}

impl OperationExecutor {
    /// Create an executor over the given store and random-string client.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, random: RandomClient) -> Self {
        Self { store, random }
    }

    /// Execute one operation for `user_id`: validate, compute, charge.
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::MissingOperand`] / [`ExecuteError::Domain`] before
    ///   any charge.
    /// - [`ExecuteError::Store`] from the catalog lookup or the ledger;
    ///   `InsufficientBalance` follows a full rollback.
    pub async fn execute(
        &self,
        user_id: UserId,
        request: &OperationRequest,
    ) -> Result<Execution, ExecuteError> {
        let value = match request.operation {
            OperationType::Addition => {
                let (a, b) = binary_operands(request)?;
                a + b
            }
            OperationType::Subtraction => {
                let (a, b) = binary_operands(request)?;
                a - b
            }
            OperationType::Multiplication => {
                let (a, b) = binary_operands(request)?;
                a * b
            }
            OperationType::Division => {
                let (a, b) = binary_operands(request)?;
                if b == 0.0 {
                    return Err(OperationError::DivisionByZero.into());
                }
                a / b
            }
            OperationType::SquareRoot => {
                let a = request
                    .operand1
                    .ok_or(ExecuteError::MissingOperand("operand1"))?;
                if a < 0.0 {
                    return Err(OperationError::NegativeSquareRoot.into());
                }
                a.sqrt()
            }
            OperationType::RandomString => return self.execute_random(user_id).await,
        };

        let operation = self.store.find_operation(request.operation).await?;
        let response = value.to_string();
        let record = self
            .store
            .charge(operation.id, user_id, operation.cost, &response)
            .await?;

        Ok(Execution {
            result: json_number(value),
            user_balance: record.user_balance,
        })
    }

    /// Fetch a random string from the provider, then charge for it.
    ///
    /// The catalog lookup runs first so a misconfigured catalog fails before
    /// the network call; the charge runs last so a provider failure costs
    /// the user nothing.
    async fn execute_random(&self, user_id: UserId) -> Result<Execution, ExecuteError> {
        let operation = self.store.find_operation(OperationType::RandomString).await?;
        let value = self.random.fetch().await?;
        let record = self
            .store
            .charge(operation.id, user_id, operation.cost, &value)
            .await?;

        Ok(Execution {
            result: serde_json::Value::String(value),
            user_balance: record.user_balance,
        })
    }
}

fn binary_operands(request: &OperationRequest) -> Result<(f64, f64), ExecuteError> {
    let a = request
        .operand1
        .ok_or(ExecuteError::MissingOperand("operand1"))?;
    let b = request
        .operand2
        .ok_or(ExecuteError::MissingOperand("operand2"))?;
    Ok((a, b))
}

/// Render an arithmetic result as JSON: integral values as integers,
/// everything else as a number (falling back to the display string for the
/// rare non-finite result).
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn json_number(value: f64) -> serde_json::Value {
    if value.is_finite()
        && value.fract() == 0.0
        && (i64::MIN as f64..=i64::MAX as f64).contains(&value)
    {
        serde_json::Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value).map_or_else(
            || serde_json::Value::String(value.to_string()),
            serde_json::Value::Number,
        )
    }
}
