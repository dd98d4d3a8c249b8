//! Type-level proof that an error was reported.

use std::fmt;

/// Proof that at least one error diagnostic was recorded.
///
/// Evaluator functions return `Result<T, ErrorGuaranteed>`: the `Err` side
/// carries no data because the diagnostic is already in the log, but it
/// cannot be produced without going through a reporting path.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    /// Only the diagnostic log hands these out.
    pub(crate) const fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Get proof from an error count, if it is non-zero.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}
