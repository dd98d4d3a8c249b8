//! Constant function calls.

use tracing::debug;
use vera_diagnostic::ErrorCode;
use vera_ir::{LookupLocation, Span, StmtId, SubroutineId};
use vera_value::ConstantValue;

use super::{EvalResult, Flow};
use crate::EvalContext;

impl EvalContext<'_> {
    /// Call `subroutine` with already evaluated arguments.
    ///
    /// Runs the body in a fresh frame, recording `call_span` and `lookup`
    /// on it, which is popped again on every path out of this function.
    /// `void` functions produce [`ConstantValue::Invalid`].
    pub fn call_function(
        &mut self,
        subroutine: SubroutineId,
        args: Vec<ConstantValue>,
        call_span: Span,
        lookup: LookupLocation,
    ) -> EvalResult {
        let unit = self.unit();
        let decl = unit.subroutine(subroutine);
        let name = unit.name_str(decl.name);

        if args.len() != decl.params.len() {
            let (diag, guar) = self.add_error_with_stack(ErrorCode::E6011, call_span);
            diag.set_message(format!(
                "'{name}' takes {} argument(s) but {} were supplied",
                decl.params.len(),
                args.len()
            ));
            return Err(guar);
        }
        let Some(body) = decl.body else {
            let (diag, guar) = self.add_error_with_stack(ErrorCode::E6004, call_span);
            diag.set_message(format!("'{name}' has no body to evaluate"))
                .set_label(format!("call to '{name}'"));
            return Err(guar);
        };

        self.try_push_frame(subroutine, call_span, lookup)?;
        debug!(function = name, depth = self.depth(), "calling constant function");

        for (&param, arg) in decl.params.iter().zip(args) {
            self.create_local(param, arg);
        }
        if let Some(return_var) = decl.return_var {
            let initial = unit.symbol(return_var).default_value.clone();
            self.create_local(return_var, initial);
        }

        let result = self.run_body(subroutine, body);
        let value = match (result, decl.return_var) {
            (Ok(()), Some(return_var)) => Ok(self
                .find_local_value(return_var)
                .cloned()
                .unwrap_or_default()),
            (Ok(()), None) => Ok(ConstantValue::Invalid),
            (Err(guar), _) => Err(guar),
        };
        self.pop_frame();
        value
    }

    /// Execute a function body and check how it finished.
    fn run_body(&mut self, subroutine: SubroutineId, body: StmtId) -> EvalResult<()> {
        let unit = self.unit();
        let decl = unit.subroutine(subroutine);
        match self.exec_stmt(body)? {
            Flow::Success | Flow::Return => Ok(()),
            Flow::Disable if self.disable_target() == Some(decl.block) => {
                self.set_disable_target(None, Span::DUMMY);
                Ok(())
            }
            Flow::Disable => {
                let range = self.disable_range();
                self.set_disable_target(None, Span::DUMMY);
                let (diag, guar) = self.add_error_with_stack(ErrorCode::E6005, range);
                diag.set_message(format!(
                    "disable escapes constant function '{}'",
                    unit.name_str(decl.name)
                ));
                Err(guar)
            }
            flow @ (Flow::Break | Flow::Continue) => {
                let keyword = if flow == Flow::Break { "break" } else { "continue" };
                let span = unit.stmt(body).span;
                let (diag, guar) = self.add_error_with_stack(ErrorCode::E6012, span);
                diag.set_message(format!("'{keyword}' outside of a loop"));
                Err(guar)
            }
        }
    }
}
