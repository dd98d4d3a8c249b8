//! Scoped suppression of result caching.
//!
//! [`EvalContext::disable_caching`] returns a [`CachingDisabled`] guard.
//! While the guard lives, [`cache_results`](EvalContext::cache_results) is
//! false; when it drops (normal exit, `?`, or unwinding) the previous state
//! is restored.
//!
//! ```text
//! {
//!     let mut ctx = ctx.disable_caching();
//!     let value = ctx.eval_expr(expr)?;
//! } // flag restored, empty frame popped
//! ```

use std::ops::{Deref, DerefMut};

use crate::{EvalContext, EvalFlags};

/// Guard returned by [`EvalContext::disable_caching`].
///
/// Derefs to the context, so evaluation continues through the guard.
pub struct CachingDisabled<'guard, 'a> {
    ctx: &'guard mut EvalContext<'a>,
    was_caching: bool,
    pushed_frame: bool,
}

impl Drop for CachingDisabled<'_, '_> {
    fn drop(&mut self) {
        if self.pushed_frame {
            self.ctx.pop_frame();
        }
        self.ctx
            .flags
            .set(EvalFlags::CACHE_RESULTS, self.was_caching);
    }
}

impl<'a> Deref for CachingDisabled<'_, 'a> {
    type Target = EvalContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for CachingDisabled<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl<'a> EvalContext<'a> {
    /// Turn off result caching until the returned guard is dropped.
    ///
    /// Pushes an empty frame when none is active, so anything evaluated
    /// through the guard counts as being inside a function.
    pub fn disable_caching(&mut self) -> CachingDisabled<'_, 'a> {
        let was_caching = self.flags.contains(EvalFlags::CACHE_RESULTS);
        let pushed_frame = !self.in_function();
        if pushed_frame {
            self.push_empty_frame();
        }
        self.flags.remove(EvalFlags::CACHE_RESULTS);
        CachingDisabled {
            ctx: self,
            was_caching,
            pushed_frame,
        }
    }

    /// Run `f` with result caching turned off.
    pub fn with_caching_disabled<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut CachingDisabled<'_, 'a>) -> T,
    {
        let mut guard = self.disable_caching();
        f(&mut guard)
    }
}
