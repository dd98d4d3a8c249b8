//! Resource limits for one evaluation context.

/// Bounds that stop runaway constant evaluation.
///
/// Fixed for the lifetime of a context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvalLimits {
    /// Maximum number of nested constant function calls.
    pub max_call_depth: usize,
    /// Maximum number of statements executed between resets.
    pub max_steps: u64,
    /// Maximum number of call frames listed in a backtrace. `0` lists all.
    pub max_backtrace: usize,
}

impl EvalLimits {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;
    pub const DEFAULT_MAX_STEPS: u64 = 100_000;
    pub const DEFAULT_MAX_BACKTRACE: usize = 10;

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = steps;
        self
    }

    #[must_use]
    pub fn with_max_backtrace(mut self, frames: usize) -> Self {
        self.max_backtrace = frames;
        self
    }
}

impl Default for EvalLimits {
    fn default() -> Self {
        EvalLimits {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
            max_steps: Self::DEFAULT_MAX_STEPS,
            max_backtrace: Self::DEFAULT_MAX_BACKTRACE,
        }
    }
}
