//! The compilation unit: arenas for everything the evaluator reads.

use vera_value::{BinaryOp, ConstantValue, UnaryOp};

use crate::ast::{Expr, ExprId, ExprKind, Stmt, StmtId, StmtKind, SystemCall};
use crate::{
    BlockId, LookupLocation, Name, NamedBlock, Span, StringInterner, Subroutine, SubroutineId,
    SymbolId, ValueSymbol,
};

fn next_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("arena exceeded u32::MAX entries"))
}

/// Owns the checked tree for one compilation unit.
///
/// Built up front (by the front end, or by tests), then shared immutably
/// with any number of evaluation contexts. The only interior mutability is
/// the per-expression constant cache, which is thread-safe.
#[derive(Debug, Default)]
pub struct CompilationUnit {
    interner: StringInterner,
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    symbols: Vec<ValueSymbol>,
    subroutines: Vec<Subroutine>,
    blocks: Vec<NamedBlock>,
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Resolve a name to its text.
    #[inline]
    pub fn name_str(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    // Accessors

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &ValueSymbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub fn subroutine(&self, id: SubroutineId) -> &Subroutine {
        &self.subroutines[id.index()]
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &NamedBlock {
        &self.blocks[id.index()]
    }

    // Declarations

    /// Declare a value symbol.
    pub fn add_symbol(&mut self, name: &str, span: Span, default_value: ConstantValue) -> SymbolId {
        let id = SymbolId::new(next_index(self.symbols.len()));
        let name = self.interner.intern(name);
        self.symbols.push(ValueSymbol {
            name,
            span,
            default_value,
        });
        id
    }

    /// Declare a named block.
    pub fn add_block(&mut self, name: &str, span: Span) -> BlockId {
        let id = BlockId::new(next_index(self.blocks.len()));
        let name = self.interner.intern(name);
        self.blocks.push(NamedBlock { name, span });
        id
    }

    /// Declare a function returning a value.
    ///
    /// Creates the function's own block identity and its implicit return
    /// variable (named after the function, default `0`). Parameters and
    /// the body are added afterward so bodies can call the function
    /// recursively.
    pub fn declare_function(&mut self, name: &str, span: Span) -> SubroutineId {
        let return_var = self.add_symbol(name, span, ConstantValue::Integer(0));
        self.declare(name, span, Some(return_var))
    }

    /// Declare a `void` function.
    pub fn declare_void_function(&mut self, name: &str, span: Span) -> SubroutineId {
        self.declare(name, span, None)
    }

    fn declare(&mut self, name: &str, span: Span, return_var: Option<SymbolId>) -> SubroutineId {
        let id = SubroutineId::new(next_index(self.subroutines.len()));
        let block = self.add_block(name, span);
        let name = self.interner.intern(name);
        self.subroutines.push(Subroutine {
            name,
            span,
            block,
            params: Vec::new(),
            return_var,
            body: None,
        });
        id
    }

    /// Append a formal argument to a subroutine.
    pub fn add_param(&mut self, subroutine: SubroutineId, name: &str, span: Span) -> SymbolId {
        let sym = self.add_symbol(name, span, ConstantValue::Integer(0));
        self.subroutines[subroutine.index()].params.push(sym);
        sym
    }

    /// Attach a body to a subroutine.
    pub fn set_body(&mut self, subroutine: SubroutineId, body: StmtId) {
        self.subroutines[subroutine.index()].body = Some(body);
    }

    // Nodes

    pub fn add_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId::new(next_index(self.exprs.len()));
        self.exprs.push(Expr::new(kind, span));
        id
    }

    pub fn add_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId::new(next_index(self.stmts.len()));
        self.stmts.push(Stmt { kind, span });
        id
    }

    // Shorthands for the common shapes

    pub fn int(&mut self, value: i64, span: Span) -> ExprId {
        self.add_expr(ExprKind::Integer(value), span)
    }

    pub fn local(&mut self, symbol: SymbolId, span: Span) -> ExprId {
        self.add_expr(ExprKind::Local(symbol), span)
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.expr(left).span.merge(self.expr(right).span);
        self.add_expr(ExprKind::Binary { op, left, right }, span)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        let span = self.expr(operand).span;
        self.add_expr(ExprKind::Unary { op, operand }, span)
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        let span = self.expr(target).span.merge(self.expr(value).span);
        self.add_expr(ExprKind::Assign { target, value }, span)
    }

    /// `target op= value`, lowered through the l-value reference.
    pub fn compound_assign(&mut self, op: BinaryOp, target: ExprId, value: ExprId) -> ExprId {
        let target_span = self.expr(target).span;
        let current = self.add_expr(ExprKind::LValueRef, target_span);
        let combined = self.binary(op, current, value);
        self.assign(target, combined)
    }

    pub fn call(&mut self, subroutine: SubroutineId, args: Vec<ExprId>, span: Span) -> ExprId {
        self.call_at(subroutine, args, span, LookupLocation::NONE)
    }

    /// A call whose callee was resolved at `lookup`.
    pub fn call_at(
        &mut self,
        subroutine: SubroutineId,
        args: Vec<ExprId>,
        span: Span,
        lookup: LookupLocation,
    ) -> ExprId {
        self.add_expr(
            ExprKind::Call {
                subroutine,
                args,
                lookup,
            },
            span,
        )
    }

    pub fn system_call(&mut self, call: SystemCall, args: Vec<ExprId>, span: Span) -> ExprId {
        self.add_expr(ExprKind::SystemCall { call, args }, span)
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        let span = self.expr(expr).span;
        self.add_stmt(StmtKind::Expr(expr), span)
    }

    pub fn block_stmt(&mut self, block: Option<BlockId>, body: Vec<StmtId>, span: Span) -> StmtId {
        self.add_stmt(StmtKind::Block { block, body }, span)
    }
}
