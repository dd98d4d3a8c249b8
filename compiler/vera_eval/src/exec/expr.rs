//! Expression evaluation.

use tracing::trace;
use vera_diagnostic::{ErrorCode, ErrorGuaranteed};
use vera_ir::{Expr, ExprId, ExprKind, Span, SymbolId};
use vera_value::{evaluate_binary, evaluate_unary, BinaryOp, ConstantValue};

use super::EvalResult;
use crate::stack::ensure_sufficient_stack;
use crate::{EvalContext, EvalFlags, LValue, Selector};

impl EvalContext<'_> {
    /// Evaluate an expression to a constant.
    ///
    /// A result memoized on the node is returned without re-evaluating.
    /// Otherwise the result is memoized when the context allows caching
    /// and the expression is closed: nothing evaluated under it read a
    /// local, assigned, ran a system task, or resolved `$`. Closedness is
    /// collected bottom-up while evaluating, so each node is visited once.
    pub fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        let expr = self.unit().expr(id);
        if let Some(value) = expr.cached_constant() {
            trace!(?id, "cached constant");
            return Ok(value.clone());
        }

        let outer_open = std::mem::replace(&mut self.saw_open, false);
        let result = ensure_sufficient_stack(|| self.eval_expr_kind(expr));
        let closed = !self.saw_open;
        self.saw_open |= outer_open;

        let value = result?;
        if closed && self.cache_results() && !value.is_invalid() {
            expr.cache_constant(value.clone());
        }
        Ok(value)
    }

    /// Record that the expression being evaluated is not closed.
    #[inline]
    fn mark_open(&mut self) {
        self.saw_open = true;
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> EvalResult {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Integer(v) => Ok(ConstantValue::Integer(*v)),
            ExprKind::Real(v) => Ok(ConstantValue::Real(*v)),
            ExprKind::Str(s) => Ok(ConstantValue::Str(s.clone())),
            ExprKind::Unbounded => {
                self.mark_open();
                self.eval_unbounded(span)
            }
            ExprKind::Local(symbol) => {
                self.mark_open();
                self.eval_local(*symbol, span)
            }
            ExprKind::LValueRef => {
                self.mark_open();
                let Some(lvalue) = self.top_lvalue().cloned() else {
                    let (_, guar) = self.add_error(ErrorCode::E9002, span);
                    return Err(guar);
                };
                lvalue.load(self).map_err(|e| self.value_error(&e, span))
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(*operand)?;
                evaluate_unary(&value, *op).map_err(|e| self.value_error(&e, span))
            }
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, *left, *right, span),
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                let value = self.eval_expr(*cond)?;
                let cond_span = self.unit().expr(*cond).span;
                if self.truth(&value, cond_span)? {
                    self.eval_expr(*then_expr)
                } else {
                    self.eval_expr(*else_expr)
                }
            }
            ExprKind::Assign { target, value } => {
                self.mark_open();
                self.eval_assign(*target, *value, span)
            }
            ExprKind::Call {
                subroutine,
                args,
                lookup,
            } => {
                let mut values = Vec::with_capacity(args.len());
                for &arg in args {
                    values.push(self.eval_expr(arg)?);
                }
                // Callee frames cannot see caller locals, so what the body
                // reads does not make the call open.
                let args_open = self.saw_open;
                let result = self.call_function(*subroutine, values, span, *lookup);
                self.saw_open = args_open;
                result
            }
            ExprKind::SystemCall { call, args } => {
                if call.is_task() {
                    self.mark_open();
                }
                self.eval_system_call(*call, args, span)
            }
            ExprKind::ElementSelect { value, index } => {
                let base = self.eval_expr(*value)?;
                let index = self.eval_selector(&base, *index)?;
                base.element(index)
                    .cloned()
                    .map_err(|e| self.value_error(&e, span))
            }
            ExprKind::RangeSelect { value, left, right } => {
                let base = self.eval_expr(*value)?;
                let left = self.eval_selector(&base, *left)?;
                let right = self.eval_selector(&base, *right)?;
                base.slice(left, right)
                    .map_err(|e| self.value_error(&e, span))
            }
            ExprKind::Member { value, field } => {
                let base = self.eval_expr(*value)?;
                base.member(*field)
                    .cloned()
                    .map_err(|e| self.value_error(&e, span))
            }
            ExprKind::ArrayLiteral(items) => Ok(ConstantValue::Array(self.eval_list(items)?)),
            ExprKind::QueueLiteral(items) => Ok(ConstantValue::Queue(self.eval_list(items)?)),
            ExprKind::StructLiteral(items) => Ok(ConstantValue::Struct(self.eval_list(items)?)),
        }
    }

    fn eval_list(&mut self, items: &[ExprId]) -> EvalResult<Vec<ConstantValue>> {
        items.iter().map(|&item| self.eval_expr(item)).collect()
    }

    /// `$`: the last index of the queue being selected from.
    fn eval_unbounded(&mut self, span: Span) -> EvalResult {
        if let Some(target) = self.queue_target() {
            if let Some(len) = target.len() {
                let len = i64::try_from(len).unwrap_or(i64::MAX);
                return Ok(ConstantValue::Integer(len - 1));
            }
        }
        if self.flags().contains(EvalFlags::ALLOW_UNBOUNDED_PLACEHOLDER) {
            return Ok(ConstantValue::UnboundedPlaceholder);
        }
        let (_, guar) = self.add_error_with_stack(ErrorCode::E6003, span);
        Err(guar)
    }

    fn eval_local(&mut self, symbol: SymbolId, span: Span) -> EvalResult {
        match self.find_local_value(symbol) {
            Some(value) => Ok(value.clone()),
            None => Err(self.missing_local(symbol, span)),
        }
    }

    fn missing_local(&mut self, symbol: SymbolId, span: Span) -> ErrorGuaranteed {
        let unit = self.unit();
        let name = unit.name_str(unit.symbol(symbol).name);
        let (diag, guar) = self.add_error_with_stack(ErrorCode::E9001, span);
        diag.set_message(format!("no storage for local '{name}'"));
        guar
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        span: Span,
    ) -> EvalResult {
        let lhs = self.eval_expr(left)?;
        if op.is_short_circuit() {
            let left_span = self.unit().expr(left).span;
            let lhs_true = self.truth(&lhs, left_span)?;
            match (op, lhs_true) {
                (BinaryOp::LogicalAnd, false) => return Ok(ConstantValue::FALSE),
                (BinaryOp::LogicalOr, true) => return Ok(ConstantValue::TRUE),
                _ => {}
            }
            let rhs = self.eval_expr(right)?;
            let right_span = self.unit().expr(right).span;
            return Ok(ConstantValue::from_bool(self.truth(&rhs, right_span)?));
        }
        let rhs = self.eval_expr(right)?;
        evaluate_binary(&lhs, &rhs, op).map_err(|e| self.value_error(&e, span))
    }

    /// Evaluate a selector of `base`, with `$` resolving against `base`
    /// when it is an array or queue.
    fn eval_selector(&mut self, base: &ConstantValue, selector: ExprId) -> EvalResult<i64> {
        let value = match base {
            ConstantValue::Array(_) | ConstantValue::Queue(_) => {
                let previous = self.set_queue_target(Some(base.clone()));
                let result = self.eval_expr(selector);
                self.set_queue_target(previous);
                result?
            }
            _ => self.eval_expr(selector)?,
        };
        let span = self.unit().expr(selector).span;
        self.integer(&value, span)
    }

    /// Resolve an assignment target to a place.
    pub(crate) fn eval_lvalue(&mut self, id: ExprId) -> EvalResult<LValue> {
        let expr = self.unit().expr(id);
        let span = expr.span;
        ensure_sufficient_stack(|| match &expr.kind {
            ExprKind::Local(symbol) => match self.find_local(*symbol) {
                Some(local) => Ok(LValue::new(local)),
                None => Err(self.missing_local(*symbol, span)),
            },
            ExprKind::ElementSelect { value, index } => {
                let mut lvalue = self.eval_lvalue(*value)?;
                let current = lvalue.load(self).map_err(|e| self.value_error(&e, span))?;
                let index = self.eval_selector(&current, *index)?;
                lvalue.push(Selector::Index(index));
                Ok(lvalue)
            }
            ExprKind::RangeSelect { value, left, right } => {
                let mut lvalue = self.eval_lvalue(*value)?;
                let current = lvalue.load(self).map_err(|e| self.value_error(&e, span))?;
                let left = self.eval_selector(&current, *left)?;
                let right = self.eval_selector(&current, *right)?;
                lvalue.push(Selector::Range { left, right });
                Ok(lvalue)
            }
            ExprKind::Member { value, field } => {
                let mut lvalue = self.eval_lvalue(*value)?;
                lvalue.push(Selector::Field(*field));
                Ok(lvalue)
            }
            _ => {
                let (_, guar) = self.add_error_with_stack(ErrorCode::E6010, span);
                Err(guar)
            }
        })
    }

    /// `target = value`. The target is resolved first and stays on the
    /// l-value stack while `value` is evaluated, so `LValueRef` in `value`
    /// reads the target's current contents.
    fn eval_assign(&mut self, target: ExprId, value: ExprId, span: Span) -> EvalResult {
        let lvalue = self.eval_lvalue(target)?;
        self.push_lvalue(lvalue.clone());
        let result = self.eval_expr(value);
        self.pop_lvalue();
        let result = result?;
        lvalue
            .store(self, result.clone())
            .map_err(|e| self.value_error(&e, span))?;
        Ok(result)
    }

    /// `$sformatf` and friends need the format argument as a string.
    pub(crate) fn eval_string(&mut self, id: ExprId, code: ErrorCode) -> EvalResult<String> {
        match self.eval_expr(id)? {
            ConstantValue::Str(s) => Ok(s),
            other => {
                let span = self.unit().expr(id).span;
                let (diag, guar) = self.add_error_with_stack(code, span);
                diag.set_message(format!("expected a string, found {}", other.kind_name()));
                Err(guar)
            }
        }
    }
}
