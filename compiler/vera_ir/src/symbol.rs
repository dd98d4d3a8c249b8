//! Symbol identities and the declarations they refer to.
//!
//! Every identity is a 32-bit index into a table owned by
//! [`CompilationUnit`](crate::CompilationUnit). Identity, not name, is what
//! the evaluator keys local storage on.

use std::fmt;

use vera_value::ConstantValue;

use crate::{Name, Span, StmtId};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create from a raw table index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Table index.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identity of a value symbol (variable, argument, return slot).
    SymbolId,
    "sym#"
);
define_id!(
    /// Identity of a subroutine (constant function).
    SubroutineId,
    "fn#"
);
define_id!(
    /// Identity of a named block that a `disable` statement can target.
    BlockId,
    "block#"
);
define_id!(
    /// Identity of a lexical scope.
    ScopeId,
    "scope#"
);

/// Where a name lookup happens: a scope plus the position of the lookup
/// within that scope's members. Carried for diagnostics only.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupLocation {
    pub scope: Option<ScopeId>,
    pub index: u32,
}

impl LookupLocation {
    /// Lookup location with no scope, used for synthesized calls.
    pub const NONE: LookupLocation = LookupLocation {
        scope: None,
        index: 0,
    };

    /// Lookup at `index` within `scope`.
    pub const fn new(scope: ScopeId, index: u32) -> Self {
        LookupLocation {
            scope: Some(scope),
            index,
        }
    }
}

/// A variable, argument, or return-value slot.
#[derive(Clone, Debug)]
pub struct ValueSymbol {
    pub name: Name,
    pub span: Span,
    /// Value a declaration without an initializer starts with.
    pub default_value: ConstantValue,
}

/// A named block. Subroutines own one too, so `disable f` can name a function.
#[derive(Clone, Debug)]
pub struct NamedBlock {
    pub name: Name,
    pub span: Span,
}

/// A subroutine that may be called during constant evaluation.
#[derive(Clone, Debug)]
pub struct Subroutine {
    pub name: Name,
    pub span: Span,
    /// Block identity of the function body, for `disable <function>`.
    pub block: BlockId,
    pub params: Vec<SymbolId>,
    /// Implicit variable named after the function that holds the result.
    pub return_var: Option<SymbolId>,
    /// `None` for declarations without a body (e.g. imported functions).
    pub body: Option<StmtId>,
}
