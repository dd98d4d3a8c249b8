//! Vera IR - checked syntax trees for constant evaluation.
//!
//! This crate contains the data the constant evaluator walks:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Symbol identities (`SymbolId`, `SubroutineId`, `BlockId`)
//! - Flat expression and statement arenas (`ExprId`, `StmtId`)
//!
//! # Design Philosophy
//!
//! - **Identity over name**: locals are keyed by `SymbolId`, never by text
//! - **Flatten everything**: no `Box<Expr>`, children are arena indices
//! - **Share freely**: a `CompilationUnit` is `Sync`, so independent
//!   evaluation contexts can read it from different threads

pub mod ast;
mod interner;
mod span;
mod symbol;
mod unit;

pub use ast::{Expr, ExprId, ExprKind, Stmt, StmtId, StmtKind, SystemCall};
pub use interner::{Name, StringInterner};
pub use span::Span;
pub use symbol::{
    BlockId, LookupLocation, NamedBlock, ScopeId, Subroutine, SubroutineId, SymbolId, ValueSymbol,
};
pub use unit::CompilationUnit;
pub use vera_value::{BinaryOp, UnaryOp};
