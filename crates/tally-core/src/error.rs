//! Domain validation errors.

/// Preconditions that fail before any catalog or ledger interaction.
///
/// These are recoverable, user-facing failures: no charge is made and no
/// record is written. The display strings are surfaced verbatim in API
/// error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    /// Division with a zero divisor.
    #[error("Error division by zero")]
    DivisionByZero,

    /// Square root of a negative operand.
    #[error("Error square root of negative number")]
    NegativeSquareRoot,
}
