//! Vera Value - constant values consumed by the constant evaluator.
//!
//! The evaluation engine only needs three things from a value: it can be
//! cloned, it can be checked for the invalid sentinel, and it can be read
//! and written through element/member paths. Everything else here exists
//! so the reference evaluator can do arithmetic:
//!
//! - [`ConstantValue`]: scalars, strings, arrays, queues, structs and the
//!   unbounded placeholder
//! - [`evaluate_binary`] / [`evaluate_unary`]: direct enum dispatch for
//!   operators
//! - [`ValueError`]: why an operation could not produce a constant

mod error;
mod operators;
mod value;

pub use error::ValueError;
pub use operators::{evaluate_binary, evaluate_unary, BinaryOp, UnaryOp};
pub use value::ConstantValue;
