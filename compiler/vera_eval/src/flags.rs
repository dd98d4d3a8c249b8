//! Evaluation mode flags.

use bitflags::bitflags;

bitflags! {
    /// Options that control how a context evaluates.
    ///
    /// Fixed when the context is created, except that
    /// [`disable_caching`](crate::EvalContext::disable_caching) clears
    /// `CACHE_RESULTS` for the lifetime of its guard.
    ///
    /// The evaluator in this crate reads `CACHE_RESULTS` and
    /// `ALLOW_UNBOUNDED_PLACEHOLDER`. `IS_SCRIPT`, `SPECPARAMS_ALLOWED`
    /// and `COVERGROUP_EXPR` describe the evaluation request; they are
    /// carried for name resolution and other passes that consult
    /// [`EvalContext::flags`](crate::EvalContext::flags).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EvalFlags: u8 {
        /// Evaluating a script rather than elaborating a design.
        const IS_SCRIPT = 1 << 0;
        /// Memoize results into expression nodes when outside any function.
        const CACHE_RESULTS = 1 << 1;
        /// Specparams may be referenced.
        const SPECPARAMS_ALLOWED = 1 << 2;
        /// Evaluating a covergroup expression.
        const COVERGROUP_EXPR = 1 << 3;
        /// `$` without a queue target yields a placeholder instead of failing.
        const ALLOW_UNBOUNDED_PLACEHOLDER = 1 << 4;
    }
}

#[cfg(test)]
mod tests;
