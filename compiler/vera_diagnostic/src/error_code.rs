//! Error codes for all evaluator diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E6001`) with the first
//! digit indicating the subsystem. Used for searchability and for tests
//! that match on the kind of failure rather than its wording.

use std::fmt;

/// Error codes for evaluator diagnostics.
///
/// Format: E#### / W#### where the first digit indicates the subsystem:
/// - E6xxx: Constant evaluation errors
/// - E7xxx: Format string errors
/// - E9xxx: Internal evaluator errors
/// - Wxxxx: Warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Constant evaluation (E6xxx)
    /// Exceeded the maximum constant function call depth
    E6001,
    /// Exceeded the maximum number of evaluation steps
    E6002,
    /// Unbounded `$` literal with no queue target
    E6003,
    /// Called function has no body
    E6004,
    /// `disable` escaped the constant function
    E6005,
    /// Assertion failed during constant evaluation
    E6006,
    /// Operator could not produce a constant
    E6007,
    /// Index or range out of bounds
    E6008,
    /// Condition has no truth value
    E6009,
    /// Expression is not assignable
    E6010,
    /// Wrong number of arguments in a constant function call
    E6011,
    /// `break` / `continue` outside of a loop
    E6012,
    /// Value is not a constant
    E6013,

    // Format strings (E7xxx)
    /// Format string ends in the middle of a specifier
    E7001,
    /// Unknown format specifier
    E7002,
    /// Width or precision not allowed for this specifier
    E7003,
    /// Not enough arguments for the format string
    E7004,
    /// Argument kind does not match the specifier
    E7005,
    /// Format string argument is not a string
    E7006,
    /// Width or precision exceeds the supported maximum
    E7007,

    // Internal (E9xxx)
    /// Local variable storage missing for a resolved symbol
    E9001,
    /// L-value reference with an empty l-value stack
    E9002,

    // Warnings
    /// System task ignored during constant evaluation
    W6001,
    /// More arguments than the format string consumes
    W7001,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E6004,
        ErrorCode::E6005,
        ErrorCode::E6006,
        ErrorCode::E6007,
        ErrorCode::E6008,
        ErrorCode::E6009,
        ErrorCode::E6010,
        ErrorCode::E6011,
        ErrorCode::E6012,
        ErrorCode::E6013,
        ErrorCode::E7001,
        ErrorCode::E7002,
        ErrorCode::E7003,
        ErrorCode::E7004,
        ErrorCode::E7005,
        ErrorCode::E7006,
        ErrorCode::E7007,
        ErrorCode::E9001,
        ErrorCode::E9002,
        ErrorCode::W6001,
        ErrorCode::W7001,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6008 => "E6008",
            ErrorCode::E6009 => "E6009",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E6012 => "E6012",
            ErrorCode::E6013 => "E6013",
            ErrorCode::E7001 => "E7001",
            ErrorCode::E7002 => "E7002",
            ErrorCode::E7003 => "E7003",
            ErrorCode::E7004 => "E7004",
            ErrorCode::E7005 => "E7005",
            ErrorCode::E7006 => "E7006",
            ErrorCode::E7007 => "E7007",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::W6001 => "W6001",
            ErrorCode::W7001 => "W7001",
        }
    }

    /// Default message used until the reporter supplies a specific one.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E6001 => "exceeded maximum depth of nested constant function calls",
            ErrorCode::E6002 => "constant evaluation exceeded the maximum number of steps",
            ErrorCode::E6003 => "unbounded literal '$' has no queue to resolve against",
            ErrorCode::E6004 => "function has no body and cannot be evaluated",
            ErrorCode::E6005 => "disable target is not within the constant function",
            ErrorCode::E6006 => "assertion failed during constant evaluation",
            ErrorCode::E6007 => "operator could not produce a constant",
            ErrorCode::E6008 => "index out of bounds",
            ErrorCode::E6009 => "condition has no truth value",
            ErrorCode::E6010 => "expression is not assignable",
            ErrorCode::E6011 => "wrong number of arguments",
            ErrorCode::E6012 => "loop control statement outside of a loop",
            ErrorCode::E6013 => "value is not a constant",
            ErrorCode::E7001 => "format string ends in the middle of a specifier",
            ErrorCode::E7002 => "unknown format specifier",
            ErrorCode::E7003 => "width or precision is not allowed for this specifier",
            ErrorCode::E7004 => "not enough arguments for format string",
            ErrorCode::E7005 => "argument is not valid for this format specifier",
            ErrorCode::E7006 => "format string must be a string",
            ErrorCode::E7007 => "format width or precision is too large",
            ErrorCode::E9001 => "no storage for local variable",
            ErrorCode::E9002 => "l-value reference with no assignment in progress",
            ErrorCode::W6001 => "system task is ignored during constant evaluation",
            ErrorCode::W7001 => "too many arguments for format string",
        }
    }

    /// Check if this is a constant evaluation error (E6xxx range).
    pub fn is_eval_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    /// Check if this is a format string error (E7xxx range).
    pub fn is_format_error(&self) -> bool {
        self.as_str().starts_with("E7")
    }

    /// Check if this is an internal evaluator error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W6001 | ErrorCode::W7001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E6001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
