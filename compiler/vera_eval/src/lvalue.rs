//! Assignment targets.
//!
//! An [`LValue`] names a place inside some local's storage: the local's
//! handle plus a path of selectors. It does not own or borrow the storage,
//! so it can sit on the context's l-value stack while the right-hand side
//! of an assignment is evaluated against the same context.

use smallvec::SmallVec;
use vera_value::{ConstantValue, ValueError};

use crate::{EvalContext, LocalRef};

/// One step from a value into part of it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// `[i]` of an array or queue.
    Index(i64),
    /// A struct member, by declaration position.
    Field(usize),
    /// `[left:right]` of an array or queue. Only valid as the last step.
    Range { left: i64, right: i64 },
}

/// A place that can be read and written.
///
/// The frame owning `root` must stay on the stack while the l-value is in
/// use; the context checks this in debug builds when frames are popped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LValue {
    root: LocalRef,
    path: SmallVec<[Selector; 2]>,
}

fn range_not_last() -> ValueError {
    ValueError::InvalidOperand {
        op: "[:]",
        operand: "slice",
    }
}

fn step<'v>(value: &'v ConstantValue, selector: &Selector) -> Result<&'v ConstantValue, ValueError> {
    match *selector {
        Selector::Index(i) => value.element(i),
        Selector::Field(f) => value.member(f),
        Selector::Range { .. } => Err(range_not_last()),
    }
}

fn step_mut<'v>(
    value: &'v mut ConstantValue,
    selector: &Selector,
) -> Result<&'v mut ConstantValue, ValueError> {
    match *selector {
        Selector::Index(i) => value.element_mut(i),
        Selector::Field(f) => value.member_mut(f),
        Selector::Range { .. } => Err(range_not_last()),
    }
}

impl LValue {
    /// The whole of a local.
    pub fn new(root: LocalRef) -> Self {
        LValue {
            root,
            path: SmallVec::new(),
        }
    }

    /// Narrow the place by one more selector.
    pub fn push(&mut self, selector: Selector) {
        self.path.push(selector);
    }

    #[must_use]
    pub fn select(mut self, selector: Selector) -> Self {
        self.push(selector);
        self
    }

    #[inline]
    pub fn root(&self) -> LocalRef {
        self.root
    }

    #[inline]
    pub fn path(&self) -> &[Selector] {
        &self.path
    }

    /// Read the current value at this place.
    ///
    /// A deleted or popped root reads as [`ValueError::Invalid`].
    pub fn load(&self, ctx: &EvalContext<'_>) -> Result<ConstantValue, ValueError> {
        let mut current = ctx.local(self.root).ok_or(ValueError::Invalid)?;
        let Some((last, prefix)) = self.path.split_last() else {
            return Ok(current.clone());
        };
        for selector in prefix {
            current = step(current, selector)?;
        }
        match *last {
            Selector::Range { left, right } => current.slice(left, right),
            ref selector => step(current, selector).cloned(),
        }
    }

    /// Overwrite the value at this place.
    pub fn store(&self, ctx: &mut EvalContext<'_>, value: ConstantValue) -> Result<(), ValueError> {
        let mut current = ctx.local_mut(self.root).ok_or(ValueError::Invalid)?;
        let Some((last, prefix)) = self.path.split_last() else {
            *current = value;
            return Ok(());
        };
        for selector in prefix {
            current = step_mut(current, selector)?;
        }
        match *last {
            Selector::Range { left, right } => current.replace_slice(left, right, value),
            ref selector => {
                *step_mut(current, selector)? = value;
                Ok(())
            }
        }
    }
}
