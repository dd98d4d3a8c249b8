//! Statement execution.
//!
//! Every statement costs one step. Loops stop early on `Break`, swallow
//! `Continue`, and pass `Return` and `Disable` outward untouched.

use tracing::trace;
use vera_diagnostic::ErrorCode;
use vera_ir::{BlockId, ExprId, Span, Stmt, StmtId, StmtKind, SymbolId};

use super::{EvalResult, Flow};
use crate::stack::ensure_sufficient_stack;
use crate::EvalContext;

/// What a loop does after one run of its body.
enum LoopControl {
    Next,
    Exit(Flow),
}

fn loop_control(flow: Flow) -> LoopControl {
    match flow {
        Flow::Success | Flow::Continue => LoopControl::Next,
        Flow::Break => LoopControl::Exit(Flow::Success),
        Flow::Return | Flow::Disable => LoopControl::Exit(flow),
    }
}

impl EvalContext<'_> {
    /// Execute one statement.
    pub fn exec_stmt(&mut self, id: StmtId) -> EvalResult<Flow> {
        let stmt = self.unit().stmt(id);
        self.try_step(stmt.span)?;
        ensure_sufficient_stack(|| self.exec_stmt_kind(stmt))
    }

    fn exec_stmt_kind(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match &stmt.kind {
            StmtKind::Empty => Ok(Flow::Success),
            StmtKind::Block { block, body } => self.exec_block(*block, body),
            StmtKind::VarDecl { symbol, init } => {
                self.exec_var_decl(*symbol, *init)?;
                Ok(Flow::Success)
            }
            StmtKind::Expr(expr) => {
                self.eval_expr(*expr)?;
                Ok(Flow::Success)
            }
            StmtKind::If {
                cond,
                then_stmt,
                else_stmt,
            } => {
                if self.eval_condition(*cond)? {
                    self.exec_stmt(*then_stmt)
                } else if let Some(else_stmt) = else_stmt {
                    self.exec_stmt(*else_stmt)
                } else {
                    Ok(Flow::Success)
                }
            }
            StmtKind::For {
                init,
                cond,
                steps,
                body,
            } => self.exec_for(init, *cond, steps, *body),
            StmtKind::While { cond, body } => {
                while self.eval_condition(*cond)? {
                    if let LoopControl::Exit(flow) = loop_control(self.exec_stmt(*body)?) {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Success)
            }
            StmtKind::DoWhile { body, cond } => {
                loop {
                    if let LoopControl::Exit(flow) = loop_control(self.exec_stmt(*body)?) {
                        return Ok(flow);
                    }
                    if !self.eval_condition(*cond)? {
                        return Ok(Flow::Success);
                    }
                }
            }
            StmtKind::Repeat { count, body } => {
                let value = self.eval_expr(*count)?;
                let span = self.unit().expr(*count).span;
                let count = self.integer(&value, span)?;
                for _ in 0..count.max(0) {
                    if let LoopControl::Exit(flow) = loop_control(self.exec_stmt(*body)?) {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Success)
            }
            StmtKind::Forever { body } => loop {
                if let LoopControl::Exit(flow) = loop_control(self.exec_stmt(*body)?) {
                    return Ok(flow);
                }
            },
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.exec_return_value(*value)?;
                }
                Ok(Flow::Return)
            }
            StmtKind::Disable(block) => {
                trace!(?block, "disable");
                self.set_disable_target(Some(*block), stmt.span);
                Ok(Flow::Disable)
            }
            StmtKind::Assert { cond } => {
                if !self.eval_condition(*cond)? {
                    let (diag, _) = self.add_error_with_stack(ErrorCode::E6006, stmt.span);
                    diag.set_message("assertion failed");
                }
                Ok(Flow::Success)
            }
        }
    }

    fn exec_block(&mut self, block: Option<BlockId>, body: &[StmtId]) -> EvalResult<Flow> {
        for &stmt in body {
            match self.exec_stmt(stmt)? {
                Flow::Success => {}
                Flow::Disable if block.is_some() && self.disable_target() == block => {
                    trace!(?block, "disable reached its block");
                    self.set_disable_target(None, Span::DUMMY);
                    return Ok(Flow::Success);
                }
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Success)
    }

    fn exec_var_decl(&mut self, symbol: SymbolId, init: Option<ExprId>) -> EvalResult<()> {
        let value = match init {
            Some(init) => self.eval_expr(init)?,
            None => self.unit().symbol(symbol).default_value.clone(),
        };
        self.create_local(symbol, value);
        Ok(())
    }

    fn exec_for(
        &mut self,
        init: &[StmtId],
        cond: Option<ExprId>,
        steps: &[ExprId],
        body: StmtId,
    ) -> EvalResult<Flow> {
        for &stmt in init {
            let flow = self.exec_stmt(stmt)?;
            if flow != Flow::Success {
                return Ok(flow);
            }
        }
        loop {
            if let Some(cond) = cond {
                if !self.eval_condition(cond)? {
                    return Ok(Flow::Success);
                }
            }
            if let LoopControl::Exit(flow) = loop_control(self.exec_stmt(body)?) {
                return Ok(flow);
            }
            for &step in steps {
                self.eval_expr(step)?;
            }
        }
    }

    fn eval_condition(&mut self, cond: ExprId) -> EvalResult<bool> {
        let value = self.eval_expr(cond)?;
        let span = self.unit().expr(cond).span;
        self.truth(&value, span)
    }

    /// `return expr;` writes the function's implicit result variable.
    /// Outside a function, or in a `void` function, the value is dropped.
    fn exec_return_value(&mut self, value: ExprId) -> EvalResult<()> {
        let result = self.eval_expr(value)?;
        let Some(subroutine) = self.top_frame().subroutine() else {
            return Ok(());
        };
        if let Some(return_var) = self.unit().subroutine(subroutine).return_var {
            self.create_local(return_var, result);
        }
        Ok(())
    }
}
