//! Diagnostics for the Vera constant evaluator.
//!
//! - Error codes for searchability
//! - A primary span for where the problem occurred
//! - Notes for context, such as the call stack at the point of failure
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! recorded. It can only be obtained from a diagnostic log, so an evaluator
//! returning `Err(ErrorGuaranteed)` has always said why.
//!
//! ```text
//! let (diag, guar) = diags.emit_error(ErrorCode::E6002, span);
//! diag.set_message("exceeded maximum number of steps");
//! return Err(guar);
//! ```

mod diagnostic;
mod diagnostics;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Note, Severity};
pub use diagnostics::Diagnostics;
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue, DiagnosticSink};
