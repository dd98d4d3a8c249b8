//! Errors produced by value operations.

use thiserror::Error;

/// Why a value operation could not produce a constant.
///
/// These are not diagnostics: the evaluator maps each variant to an
/// error code and attaches the source span.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operation}")]
    Overflow { operation: &'static str },

    #[error("operator `{op}` is not defined for {operand}")]
    InvalidOperand { op: &'static str, operand: &'static str },

    #[error("operands of `{op}` have mismatched kinds: {left} and {right}")]
    Mismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("index {index} is out of bounds for a value of length {len}")]
    OutOfBounds { index: i64, len: usize },

    #[error("member {index} does not exist")]
    NoSuchMember { index: usize },

    #[error("operand is not a valid constant")]
    Invalid,
}
