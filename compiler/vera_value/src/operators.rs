//! Operator implementations over constant values.
//!
//! Direct enum dispatch: the value kinds are a closed set, so matching on
//! `(left, right)` pairs keeps every combination visible in one place.
//! Comparisons and logical operators produce integer `1` / `0`.

use std::fmt;

use crate::{ConstantValue, ValueError};

/// Binary operators the constant evaluator understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Power,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Power => "**",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        }
    }

    /// Whether the right operand is only evaluated depending on the left.
    #[inline]
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Unary operators the constant evaluator understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    LogicalNot,
}

impl UnaryOp {
    /// Source spelling of the operator.
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::LogicalNot => "!",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

type OpResult = Result<ConstantValue, ValueError>;

#[inline]
fn overflow(operation: &'static str) -> ValueError {
    ValueError::Overflow { operation }
}

#[inline]
fn invalid_for(op: BinaryOp, operand: &'static str) -> ValueError {
    ValueError::InvalidOperand {
        op: op.as_symbol(),
        operand,
    }
}

/// Evaluate a binary operator.
pub fn evaluate_binary(left: &ConstantValue, right: &ConstantValue, op: BinaryOp) -> OpResult {
    match (left, right) {
        (ConstantValue::Invalid, _) | (_, ConstantValue::Invalid) => Err(ValueError::Invalid),
        (ConstantValue::Integer(a), ConstantValue::Integer(b)) => eval_int_binary(*a, *b, op),
        (ConstantValue::Real(_), ConstantValue::Integer(_) | ConstantValue::Real(_))
        | (ConstantValue::Integer(_), ConstantValue::Real(_)) => {
            match (left.as_real(), right.as_real()) {
                (Some(a), Some(b)) => eval_real_binary(a, b, op),
                _ => Err(ValueError::Invalid),
            }
        }
        (ConstantValue::Str(a), ConstantValue::Str(b)) => eval_string_binary(a, b, op),
        _ if left.kind_name() == right.kind_name() => eval_aggregate_binary(left, right, op),
        _ => Err(ValueError::Mismatch {
            op: op.as_symbol(),
            left: left.kind_name(),
            right: right.kind_name(),
        }),
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> OpResult {
    let value = match op {
        BinaryOp::Add => a.checked_add(b).ok_or_else(|| overflow("addition"))?,
        BinaryOp::Sub => a.checked_sub(b).ok_or_else(|| overflow("subtraction"))?,
        BinaryOp::Mul => a.checked_mul(b).ok_or_else(|| overflow("multiplication"))?,
        BinaryOp::Div => {
            if b == 0 {
                return Err(ValueError::DivisionByZero);
            }
            a.checked_div(b).ok_or_else(|| overflow("division"))?
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(ValueError::DivisionByZero);
            }
            a.checked_rem(b).ok_or_else(|| overflow("remainder"))?
        }
        BinaryOp::Power => int_power(a, b)?,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::Shl => u32::try_from(b)
            .ok()
            .and_then(|s| a.checked_shl(s))
            .unwrap_or(0),
        BinaryOp::Shr => logical_shr(a, b),
        BinaryOp::Eq => i64::from(a == b),
        BinaryOp::NotEq => i64::from(a != b),
        BinaryOp::Lt => i64::from(a < b),
        BinaryOp::LtEq => i64::from(a <= b),
        BinaryOp::Gt => i64::from(a > b),
        BinaryOp::GtEq => i64::from(a >= b),
        BinaryOp::LogicalAnd => i64::from(a != 0 && b != 0),
        BinaryOp::LogicalOr => i64::from(a != 0 || b != 0),
    };
    Ok(ConstantValue::Integer(value))
}

/// `>>` is a logical shift: the sign bit is not replicated.
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "logical shift reinterprets the bit pattern"
)]
fn logical_shr(value: i64, amount: i64) -> i64 {
    match u32::try_from(amount) {
        Ok(s) if s < 64 => ((value as u64) >> s) as i64,
        _ => 0,
    }
}

/// Integer exponentiation. Negative exponents truncate toward zero.
fn int_power(base: i64, exp: i64) -> Result<i64, ValueError> {
    if exp < 0 {
        return match base {
            0 => Err(ValueError::DivisionByZero),
            1 => Ok(1),
            -1 => Ok(if exp % 2 == 0 { 1 } else { -1 }),
            _ => Ok(0),
        };
    }
    let exp = u32::try_from(exp).map_err(|_| overflow("exponentiation"))?;
    base.checked_pow(exp).ok_or_else(|| overflow("exponentiation"))
}

fn eval_real_binary(a: f64, b: f64, op: BinaryOp) -> OpResult {
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Power => a.powf(b),
        BinaryOp::Eq => return Ok(ConstantValue::from_bool(a == b)),
        BinaryOp::NotEq => return Ok(ConstantValue::from_bool(a != b)),
        BinaryOp::Lt => return Ok(ConstantValue::from_bool(a < b)),
        BinaryOp::LtEq => return Ok(ConstantValue::from_bool(a <= b)),
        BinaryOp::Gt => return Ok(ConstantValue::from_bool(a > b)),
        BinaryOp::GtEq => return Ok(ConstantValue::from_bool(a >= b)),
        BinaryOp::LogicalAnd => return Ok(ConstantValue::from_bool(a != 0.0 && b != 0.0)),
        BinaryOp::LogicalOr => return Ok(ConstantValue::from_bool(a != 0.0 || b != 0.0)),
        BinaryOp::Mod
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor
        | BinaryOp::Shl
        | BinaryOp::Shr => return Err(invalid_for(op, "reals")),
    };
    Ok(ConstantValue::Real(value))
}

fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> OpResult {
    match op {
        BinaryOp::Eq => Ok(ConstantValue::from_bool(a == b)),
        BinaryOp::NotEq => Ok(ConstantValue::from_bool(a != b)),
        BinaryOp::Lt => Ok(ConstantValue::from_bool(a < b)),
        BinaryOp::LtEq => Ok(ConstantValue::from_bool(a <= b)),
        BinaryOp::Gt => Ok(ConstantValue::from_bool(a > b)),
        BinaryOp::GtEq => Ok(ConstantValue::from_bool(a >= b)),
        _ => Err(invalid_for(op, "strings")),
    }
}

fn eval_aggregate_binary(left: &ConstantValue, right: &ConstantValue, op: BinaryOp) -> OpResult {
    match op {
        BinaryOp::Eq => Ok(ConstantValue::from_bool(left == right)),
        BinaryOp::NotEq => Ok(ConstantValue::from_bool(left != right)),
        _ => Err(invalid_for(op, left.kind_name())),
    }
}

/// Evaluate a unary operator.
pub fn evaluate_unary(operand: &ConstantValue, op: UnaryOp) -> OpResult {
    match (operand, op) {
        (ConstantValue::Integer(v), UnaryOp::Plus) => Ok(ConstantValue::Integer(*v)),
        (ConstantValue::Integer(v), UnaryOp::Minus) => v
            .checked_neg()
            .map(ConstantValue::Integer)
            .ok_or_else(|| overflow("negation")),
        (ConstantValue::Integer(v), UnaryOp::BitNot) => Ok(ConstantValue::Integer(!v)),
        (ConstantValue::Integer(v), UnaryOp::LogicalNot) => Ok(ConstantValue::from_bool(*v == 0)),
        (ConstantValue::Real(v), UnaryOp::Plus) => Ok(ConstantValue::Real(*v)),
        (ConstantValue::Real(v), UnaryOp::Minus) => Ok(ConstantValue::Real(-v)),
        (ConstantValue::Real(v), UnaryOp::LogicalNot) => Ok(ConstantValue::from_bool(*v == 0.0)),
        (ConstantValue::Invalid, _) => Err(ValueError::Invalid),
        (other, op) => Err(ValueError::InvalidOperand {
            op: op.as_symbol(),
            operand: other.kind_name(),
        }),
    }
}
