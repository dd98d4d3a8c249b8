//! The reference evaluator.
//!
//! A tree walker over `vera_ir` that drives an [`EvalContext`]:
//!
//! - `expr`: expressions, l-value resolution, result caching
//! - `stmt`: statements, loops, named blocks and `disable`
//! - `call`: constant function calls
//! - `system`: `$sformatf` and the other system calls
//!
//! Every evaluator function returns `Result<_, ErrorGuaranteed>`. A fatal
//! problem records a diagnostic and unwinds with `?`; statement-level
//! control flow (`break`, `return`, `disable`) travels as a [`Flow`].

mod call;
mod expr;
mod stmt;
mod system;

use tracing::debug;
use vera_diagnostic::{ErrorCode, ErrorGuaranteed};
use vera_ir::{ExprId, Span, StmtId};
use vera_value::{ConstantValue, ValueError};

use crate::EvalContext;

/// Result type for evaluator functions.
pub type EvalResult<T = ConstantValue> = Result<T, ErrorGuaranteed>;

/// How a statement finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Fell off the end normally.
    Success,
    Break,
    Continue,
    Return,
    /// Unwinding towards the context's disable target.
    Disable,
}

impl EvalContext<'_> {
    /// Evaluate a top-level expression.
    ///
    /// Returns [`ConstantValue::Invalid`] on failure; the reasons are in
    /// [`diagnostics`](Self::diagnostics).
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn evaluate(&mut self, expr: ExprId) -> ConstantValue {
        match self.eval_expr(expr) {
            Ok(value) => value,
            Err(_) => {
                debug!(errors = self.diagnostics().error_count(), "evaluation failed");
                ConstantValue::Invalid
            }
        }
    }

    /// Execute a top-level statement, as a script would.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, stmt: StmtId) -> EvalResult<Flow> {
        self.exec_stmt(stmt)
    }

    /// Record a failed value operation.
    pub(crate) fn value_error(&mut self, err: &ValueError, span: Span) -> ErrorGuaranteed {
        let code = match err {
            ValueError::OutOfBounds { .. } | ValueError::NoSuchMember { .. } => ErrorCode::E6008,
            ValueError::Invalid => ErrorCode::E6013,
            ValueError::DivisionByZero
            | ValueError::Overflow { .. }
            | ValueError::InvalidOperand { .. }
            | ValueError::Mismatch { .. } => ErrorCode::E6007,
        };
        let (diag, guar) = self.add_error_with_stack(code, span);
        diag.set_message(err.to_string());
        guar
    }

    /// Truth value of a condition.
    pub(crate) fn truth(&mut self, value: &ConstantValue, span: Span) -> EvalResult<bool> {
        match value.is_true() {
            Some(b) => Ok(b),
            None => {
                let (diag, guar) = self.add_error_with_stack(ErrorCode::E6009, span);
                diag.set_message(format!("{} value has no truth value", value.kind_name()));
                Err(guar)
            }
        }
    }

    /// Integral value of an index, count or bound.
    pub(crate) fn integer(&mut self, value: &ConstantValue, span: Span) -> EvalResult<i64> {
        match value.as_integer() {
            Some(v) => Ok(v),
            None => {
                let (diag, guar) = self.add_error_with_stack(ErrorCode::E6007, span);
                diag.set_message(format!("expected an integer, found {}", value.kind_name()));
                Err(guar)
            }
        }
    }

    /// Name used for `%m`: the executing function, or `$unit` at top level.
    pub(crate) fn scope_name(&self) -> &str {
        let unit = self.unit();
        match self.frames().iter().rev().find_map(|f| f.subroutine()) {
            Some(sub) => unit.name_str(unit.subroutine(sub).name),
            None => "$unit",
        }
    }
}
