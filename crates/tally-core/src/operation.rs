//! Operation catalog types.
//!
//! The catalog is immutable reference data: each operation type maps to a
//! database id and a fixed positive cost. Rows are seeded by migration and
//! never created or mutated at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::OperationId;

/// The fixed set of billable operation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// `operand1 + operand2`.
    Addition,

    /// `operand1 - operand2`.
    Subtraction,

    /// `operand1 * operand2`.
    Multiplication,

    /// `operand1 / operand2`. Fails before charging when the divisor is zero.
    Division,

    /// `sqrt(operand1)`. Fails before charging for a negative operand.
    SquareRoot,

    /// A string fetched from the external random-string provider.
    RandomString,
}

impl OperationType {
    /// Stable name used in the `operations.op_type` column and API payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
            Self::SquareRoot => "square_root",
            Self::RandomString => "random_string",
        }
    }

    /// Whether this type consumes two numeric operands.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(
            self,
            Self::Addition | Self::Subtraction | Self::Multiplication | Self::Division
        )
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = UnknownOperationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addition" => Ok(Self::Addition),
            "subtraction" => Ok(Self::Subtraction),
            "multiplication" => Ok(Self::Multiplication),
            "division" => Ok(Self::Division),
            "square_root" => Ok(Self::SquareRoot),
            "random_string" => Ok(Self::RandomString),
            other => Err(UnknownOperationType(other.to_string())),
        }
    }
}

/// Error for an operation type string the catalog does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation type: {0}")]
pub struct UnknownOperationType(pub String);

/// A catalog row: an operation type with its fixed cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Catalog key, referenced by [`crate::Record::operation_id`].
    pub id: OperationId,

    /// The operation type; unique within the catalog.
    pub op_type: OperationType,

    /// Fixed charge in credit units, always positive. A zero-cost operation
    /// is distinct from a missing one; lookups report missing types as a
    /// configuration error.
    pub cost: i64,
}
