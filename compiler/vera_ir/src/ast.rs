//! Constant-evaluable expression and statement trees.
//!
//! Trees are flat: children are referenced by [`ExprId`] / [`StmtId`]
//! indices into the arenas of a [`CompilationUnit`](crate::CompilationUnit).
//! Only the forms a constant function may contain are represented; the
//! tree has already been through name resolution and type checking.

use std::sync::OnceLock;

use vera_value::{BinaryOp, ConstantValue, UnaryOp};

use crate::{BlockId, LookupLocation, Span, SubroutineId, SymbolId};

/// Index of an expression in the unit's expression arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a statement in the unit's statement arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct StmtId(u32);

impl StmtId {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        StmtId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// System functions and tasks callable from constant functions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SystemCall {
    /// `$sformatf(fmt, args...)` returns the formatted string.
    SFormatF,
    /// `$psprintf(fmt, args...)`, an older spelling of `$sformatf`.
    PSPrintF,
    /// `$display(fmt, args...)`; ignored during constant evaluation.
    Display,
    /// `$write(fmt, args...)`; ignored during constant evaluation.
    Write,
    /// `$clog2(n)`.
    Clog2,
    /// `$size(aggregate)`.
    Size,
}

impl SystemCall {
    /// Source spelling, including the leading `$`.
    pub fn name(self) -> &'static str {
        match self {
            SystemCall::SFormatF => "$sformatf",
            SystemCall::PSPrintF => "$psprintf",
            SystemCall::Display => "$display",
            SystemCall::Write => "$write",
            SystemCall::Clog2 => "$clog2",
            SystemCall::Size => "$size",
        }
    }

    /// Tasks have no value; they only matter for their side effects.
    pub fn is_task(self) -> bool {
        matches!(self, SystemCall::Display | SystemCall::Write)
    }
}

/// Expression kinds.
#[derive(Clone, Debug)]
pub enum ExprKind {
    Integer(i64),
    Real(f64),
    Str(String),
    /// The unbounded `$` literal.
    Unbounded,
    /// Read of a local variable or argument.
    Local(SymbolId),
    /// Read of the innermost in-flight assignment target.
    ///
    /// Compound assignments lower `a[i] += x` to `a[i] = LValueRef + x` so
    /// the target expression is evaluated exactly once.
    LValueRef,
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    Assign {
        target: ExprId,
        value: ExprId,
    },
    Call {
        subroutine: SubroutineId,
        args: Vec<ExprId>,
        /// Where the callee name was resolved. Recorded on the callee's frame.
        lookup: LookupLocation,
    },
    SystemCall {
        call: SystemCall,
        args: Vec<ExprId>,
    },
    ElementSelect {
        value: ExprId,
        index: ExprId,
    },
    RangeSelect {
        value: ExprId,
        left: ExprId,
        right: ExprId,
    },
    Member {
        value: ExprId,
        field: usize,
    },
    ArrayLiteral(Vec<ExprId>),
    QueueLiteral(Vec<ExprId>),
    StructLiteral(Vec<ExprId>),
}

/// An expression node.
///
/// `constant` memoizes a result computed outside of any function call;
/// it is written at most once and only when the evaluation context says
/// caching is safe.
#[derive(Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    constant: OnceLock<ConstantValue>,
}

impl Expr {
    pub(crate) fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            constant: OnceLock::new(),
        }
    }

    /// The memoized constant, if one has been recorded.
    #[inline]
    pub fn cached_constant(&self) -> Option<&ConstantValue> {
        self.constant.get()
    }

    /// Record a constant for later reuse. The first recorded value wins.
    pub fn cache_constant(&self, value: ConstantValue) {
        let _ = self.constant.set(value);
    }
}

/// Statement kinds.
#[derive(Clone, Debug)]
pub enum StmtKind {
    Empty,
    /// A sequential block; `block` is set when the block is named.
    Block {
        block: Option<BlockId>,
        body: Vec<StmtId>,
    },
    VarDecl {
        symbol: SymbolId,
        init: Option<ExprId>,
    },
    Expr(ExprId),
    If {
        cond: ExprId,
        then_stmt: StmtId,
        else_stmt: Option<StmtId>,
    },
    For {
        init: Vec<StmtId>,
        cond: Option<ExprId>,
        steps: Vec<ExprId>,
        body: StmtId,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
    },
    Repeat {
        count: ExprId,
        body: StmtId,
    },
    Forever {
        body: StmtId,
    },
    Break,
    Continue,
    Return(Option<ExprId>),
    Disable(BlockId),
    /// Immediate assertion.
    Assert {
        cond: ExprId,
    },
}

/// A statement node.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}
