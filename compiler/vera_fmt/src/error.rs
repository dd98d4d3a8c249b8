//! Errors raised while rendering a single argument.

use thiserror::Error;
use vera_diagnostic::ErrorCode;

/// Why an argument could not be rendered.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("value of kind {kind} cannot be formatted with '%{specifier}'")]
    ArgumentKind { specifier: char, kind: &'static str },
    #[error("'%{0}' does not take an argument")]
    NoArgument(char),
    #[error("unknown format specifier '%{0}'")]
    UnknownSpecifier(char),
}

impl FormatError {
    /// Diagnostic code to report this error under.
    pub fn code(&self) -> ErrorCode {
        match self {
            FormatError::ArgumentKind { .. } | FormatError::NoArgument(_) => ErrorCode::E7005,
            FormatError::UnknownSpecifier(_) => ErrorCode::E7002,
        }
    }
}
