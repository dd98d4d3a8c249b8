//! System function calls.

use tracing::debug;
use vera_diagnostic::{ErrorCode, Note};
use vera_fmt::format_values;
use vera_ir::{ExprId, Span, SystemCall};
use vera_value::ConstantValue;

use super::EvalResult;
use crate::EvalContext;

fn clog2(n: i64) -> i64 {
    if n <= 1 {
        0
    } else {
        i64::from(64 - (n - 1).leading_zeros())
    }
}

impl EvalContext<'_> {
    pub(crate) fn eval_system_call(
        &mut self,
        call: SystemCall,
        args: &[ExprId],
        span: Span,
    ) -> EvalResult {
        match call {
            SystemCall::SFormatF | SystemCall::PSPrintF => {
                let text = self.eval_format(call, args, span)?;
                Ok(ConstantValue::Str(text))
            }
            SystemCall::Display | SystemCall::Write => {
                let text = self.eval_format(call, args, span)?;
                debug!(task = call.name(), %text, "ignoring system task");
                self.add_diag(ErrorCode::W6001, span)
                    .set_message(format!(
                        "{} is ignored during constant evaluation",
                        call.name()
                    ))
                    .add_note(Note::new(format!("output would have been \"{text}\"")));
                Ok(ConstantValue::Invalid)
            }
            SystemCall::Clog2 => {
                let [arg] = self.expect_args::<1>(call, args, span)?;
                let value = self.eval_expr(arg)?;
                let arg_span = self.unit().expr(arg).span;
                let n = self.integer(&value, arg_span)?;
                Ok(ConstantValue::Integer(clog2(n)))
            }
            SystemCall::Size => {
                let [arg] = self.expect_args::<1>(call, args, span)?;
                let value = self.eval_expr(arg)?;
                match value.len() {
                    Some(len) => Ok(ConstantValue::Integer(
                        i64::try_from(len).unwrap_or(i64::MAX),
                    )),
                    None => {
                        let arg_span = self.unit().expr(arg).span;
                        let (diag, guar) = self.add_error_with_stack(ErrorCode::E6007, arg_span);
                        diag.set_message(format!("{} has no size", value.kind_name()));
                        Err(guar)
                    }
                }
            }
        }
    }

    fn expect_args<const N: usize>(
        &mut self,
        call: SystemCall,
        args: &[ExprId],
        span: Span,
    ) -> EvalResult<[ExprId; N]> {
        if let Ok(args) = <[ExprId; N]>::try_from(args) {
            return Ok(args);
        }
        let (diag, guar) = self.add_error_with_stack(ErrorCode::E6011, span);
        diag.set_message(format!(
            "{} takes {N} argument(s) but {} were supplied",
            call.name(),
            args.len()
        ));
        Err(guar)
    }

    /// Shared by the formatting functions and tasks: the first argument is
    /// the format string, the rest are the values it consumes.
    ///
    /// Warnings from the format service are recorded and formatting
    /// continues; any error fails the call.
    fn eval_format(&mut self, call: SystemCall, args: &[ExprId], span: Span) -> EvalResult<String> {
        let Some((&format_expr, value_exprs)) = args.split_first() else {
            let (diag, guar) = self.add_error_with_stack(ErrorCode::E6011, span);
            diag.set_message(format!("{} requires a format string", call.name()));
            return Err(guar);
        };
        let format = self.eval_string(format_expr, ErrorCode::E7006)?;
        let mut values = Vec::with_capacity(value_exprs.len());
        for &arg in value_exprs {
            values.push(self.eval_expr(arg)?);
        }

        let formatted = format_values(&format, &values, self.scope_name());

        let unit = self.unit();
        let mut failure = None;
        for issue in formatted.issues {
            let location = match issue.arg.and_then(|i| value_exprs.get(i)) {
                Some(&arg) => unit.expr(arg).span,
                None => unit.expr(format_expr).span,
            };
            if issue.code.is_warning() {
                self.add_diag(issue.code, location).set_message(issue.message);
            } else {
                let (diag, guar) = self.add_error_with_stack(issue.code, location);
                diag.set_message(issue.message);
                failure = failure.or(Some(guar));
            }
        }
        match failure {
            Some(guar) => Err(guar),
            None => Ok(formatted.text),
        }
    }
}
