//! The evaluation context.
//!
//! [`EvalContext`] holds all mutable state for one logical evaluation:
//!
//! - the frame stack (innermost last) plus a root scope used when no frame
//!   is active
//! - the l-value stack for in-flight assignments
//! - the step counter and the limits that bound it
//! - the disable-target and queue-target signals
//! - the diagnostic log
//!
//! A context borrows the [`CompilationUnit`] it evaluates, is reset and
//! reused between evaluations, and is never shared between threads.

use std::fmt::Write;

use tracing::{debug, trace};
use vera_diagnostic::{
    Diagnostic, DiagnosticSink, Diagnostics, ErrorCode, ErrorGuaranteed, Note,
};
use vera_ir::{BlockId, CompilationUnit, LookupLocation, Span, SubroutineId, SymbolId};
use vera_value::ConstantValue;

use crate::{EvalFlags, EvalLimits, Frame, LValue, LocalRef};

/// Mutable state for constant evaluation.
pub struct EvalContext<'a> {
    unit: &'a CompilationUnit,
    limits: EvalLimits,
    pub(crate) flags: EvalFlags,
    root: Frame,
    frames: Vec<Frame>,
    next_serial: u32,
    lvalues: Vec<LValue>,
    diags: Diagnostics,
    steps: u64,
    disable_target: Option<BlockId>,
    disable_range: Span,
    queue_target: Option<ConstantValue>,
    /// Whether the expression being evaluated is open; see `eval_expr`.
    pub(crate) saw_open: bool,
}

impl<'a> EvalContext<'a> {
    /// Create a context with default limits.
    pub fn new(unit: &'a CompilationUnit, flags: EvalFlags) -> Self {
        Self::with_limits(unit, flags, EvalLimits::default())
    }

    pub fn with_limits(unit: &'a CompilationUnit, flags: EvalFlags, limits: EvalLimits) -> Self {
        EvalContext {
            unit,
            limits,
            flags,
            root: Frame::synthetic(0),
            frames: Vec::new(),
            next_serial: 1,
            lvalues: Vec::new(),
            diags: Diagnostics::new(),
            steps: 0,
            disable_target: None,
            disable_range: Span::DUMMY,
            queue_target: None,
            saw_open: false,
        }
    }

    #[inline]
    pub fn unit(&self) -> &'a CompilationUnit {
        self.unit
    }

    #[inline]
    pub fn flags(&self) -> EvalFlags {
        self.flags
    }

    #[inline]
    pub fn limits(&self) -> &EvalLimits {
        &self.limits
    }

    fn fresh_serial(&mut self) -> u32 {
        let serial = self.next_serial;
        self.next_serial = self.next_serial.wrapping_add(1);
        serial
    }

    /// Return to the freshly constructed state, keeping flags and limits.
    ///
    /// Every outstanding [`LocalRef`] is invalidated, including handles into
    /// the root scope.
    pub fn reset(&mut self) {
        trace!(steps = self.steps, depth = self.frames.len(), "resetting eval context");
        self.root = Frame::synthetic(self.fresh_serial());
        self.frames.clear();
        self.lvalues.clear();
        self.diags.clear();
        self.steps = 0;
        self.disable_target = None;
        self.disable_range = Span::DUMMY;
        self.queue_target = None;
        self.saw_open = false;
    }

    // Locals

    fn current_frame(&self) -> &Frame {
        self.frames.last().unwrap_or(&self.root)
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    fn frame_by_serial(&self, serial: u32) -> Option<&Frame> {
        if serial == self.root.serial() {
            return Some(&self.root);
        }
        // Serials increase from the bottom of the stack to the top.
        self.frames
            .binary_search_by_key(&serial, Frame::serial)
            .ok()
            .map(|i| &self.frames[i])
    }

    fn frame_by_serial_mut(&mut self, serial: u32) -> Option<&mut Frame> {
        if serial == self.root.serial() {
            return Some(&mut self.root);
        }
        match self.frames.binary_search_by_key(&serial, Frame::serial) {
            Ok(i) => Some(&mut self.frames[i]),
            Err(_) => None,
        }
    }

    /// Create storage for `symbol` in the innermost frame, or in the root
    /// scope when no frame is active.
    ///
    /// Re-declaring a symbol in the same frame overwrites its value and
    /// returns the same handle.
    pub fn create_local(&mut self, symbol: SymbolId, value: ConstantValue) -> LocalRef {
        self.current_frame_mut().create(symbol, value)
    }

    /// Find `symbol` in the innermost frame only. Locals of calling frames
    /// are not visible.
    pub fn find_local(&self, symbol: SymbolId) -> Option<LocalRef> {
        self.current_frame().find(symbol)
    }

    /// Current value of `symbol` in the innermost frame.
    pub fn find_local_value(&self, symbol: SymbolId) -> Option<&ConstantValue> {
        self.current_frame().value_of(symbol)
    }

    /// Remove `symbol` from the innermost frame. Handles to it read as
    /// `None` afterward.
    pub fn delete_local(&mut self, symbol: SymbolId) {
        self.current_frame_mut().delete(symbol);
    }

    /// Resolve a handle. `None` if the local was deleted or its frame popped.
    pub fn local(&self, local: LocalRef) -> Option<&ConstantValue> {
        self.frame_by_serial(local.frame)?.get(local)
    }

    pub fn local_mut(&mut self, local: LocalRef) -> Option<&mut ConstantValue> {
        self.frame_by_serial_mut(local.frame)?.get_mut(local)
    }

    // Call stack

    /// Whether a frame (real or empty) is active.
    #[inline]
    pub fn in_function(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Number of active frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a frame for a call to `subroutine`.
    ///
    /// Fails with a diagnostic at the subroutine's declaration when the
    /// depth limit would be exceeded; the stack is left untouched.
    pub fn push_frame(
        &mut self,
        subroutine: SubroutineId,
        call_location: Span,
        lookup_location: LookupLocation,
    ) -> bool {
        self.try_push_frame(subroutine, call_location, lookup_location)
            .is_ok()
    }

    /// [`push_frame`](Self::push_frame) with proof of the reported error.
    pub fn try_push_frame(
        &mut self,
        subroutine: SubroutineId,
        call_location: Span,
        lookup_location: LookupLocation,
    ) -> Result<(), ErrorGuaranteed> {
        let max = self.limits.max_call_depth;
        if self.frames.len() >= max {
            let unit = self.unit;
            let decl = unit.subroutine(subroutine);
            let name = unit.name_str(decl.name);
            debug!(function = name, max, "call depth limit reached");
            let notes = self.stack_notes();
            let (diag, guar) = self.diags.emit_error(ErrorCode::E6001, decl.span);
            diag.set_message(format!(
                "exceeded maximum depth of {max} nested constant function calls"
            ))
            .set_label(format!("while calling '{name}'"));
            diag.notes.extend(notes);
            return Err(guar);
        }

        let serial = self.fresh_serial();
        self.frames.push(Frame::new(
            serial,
            Some(subroutine),
            call_location,
            lookup_location,
        ));
        trace!(?subroutine, depth = self.frames.len(), "pushed frame");
        Ok(())
    }

    /// Push a frame with no subroutine. Not subject to the depth limit.
    pub fn push_empty_frame(&mut self) {
        let serial = self.fresh_serial();
        self.frames.push(Frame::synthetic(serial));
        trace!(depth = self.frames.len(), "pushed empty frame");
    }

    /// Pop the innermost frame.
    ///
    /// # Panics
    /// Panics if no frame is active.
    pub fn pop_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            panic!("pop_frame called with no active frame");
        };
        debug_assert!(
            self.lvalues.iter().all(|lv| lv.root().frame() != frame.serial()),
            "popped a frame that an in-flight l-value still refers to"
        );
        trace!(subroutine = ?frame.subroutine(), depth = self.frames.len(), "popped frame");
    }

    /// The innermost frame, or the root scope when no frame is active.
    pub fn top_frame(&self) -> &Frame {
        self.current_frame()
    }

    /// Active frames, outermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Count one unit of work at `location`.
    ///
    /// Fails with a diagnostic once more than `max_steps` steps have been
    /// taken since the last reset, and on every call after that.
    pub fn step(&mut self, location: Span) -> bool {
        self.try_step(location).is_ok()
    }

    /// [`step`](Self::step) with proof of the reported error.
    pub fn try_step(&mut self, location: Span) -> Result<(), ErrorGuaranteed> {
        self.steps = self.steps.saturating_add(1);
        let max = self.limits.max_steps;
        if self.steps <= max {
            return Ok(());
        }
        debug!(max, %location, "step limit reached");
        let notes = self.stack_notes();
        let (diag, guar) = self.diags.emit_error(ErrorCode::E6002, location);
        diag.set_message(format!(
            "constant evaluation exceeded the maximum of {max} steps"
        ));
        diag.notes.extend(notes);
        Err(guar)
    }

    /// Steps taken since the last reset.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    // L-values

    pub fn push_lvalue(&mut self, lvalue: LValue) {
        self.lvalues.push(lvalue);
    }

    /// # Panics
    /// Panics if the l-value stack is empty.
    pub fn pop_lvalue(&mut self) -> LValue {
        let Some(lvalue) = self.lvalues.pop() else {
            panic!("pop_lvalue called with no l-value in flight");
        };
        lvalue
    }

    pub fn top_lvalue(&self) -> Option<&LValue> {
        self.lvalues.last()
    }

    // Caching

    /// Whether results may be memoized into the expression tree.
    ///
    /// Results computed inside a function depend on its arguments, so
    /// caching only happens at the top level.
    #[inline]
    pub fn cache_results(&self) -> bool {
        !self.in_function() && self.flags.contains(EvalFlags::CACHE_RESULTS)
    }

    // Disable signaling

    /// Record that a `disable` statement is unwinding towards `target`.
    pub fn set_disable_target(&mut self, target: Option<BlockId>, range: Span) {
        self.disable_target = target;
        self.disable_range = range;
    }

    #[inline]
    pub fn disable_target(&self) -> Option<BlockId> {
        self.disable_target
    }

    /// Location of the `disable` statement that set the current target.
    #[inline]
    pub fn disable_range(&self) -> Span {
        self.disable_range
    }

    // Unbounded literal target

    /// Set the value that `$` resolves against, returning the previous one.
    pub fn set_queue_target(&mut self, target: Option<ConstantValue>) -> Option<ConstantValue> {
        std::mem::replace(&mut self.queue_target, target)
    }

    #[inline]
    pub fn queue_target(&self) -> Option<&ConstantValue> {
        self.queue_target.as_ref()
    }

    // Diagnostics

    /// Append a diagnostic. Evaluation is not stopped.
    pub fn add_diag(&mut self, code: ErrorCode, span: Span) -> &mut Diagnostic {
        self.diags.add(code, span)
    }

    /// Append an error and get proof that it was recorded.
    pub fn add_error(&mut self, code: ErrorCode, span: Span) -> (&mut Diagnostic, ErrorGuaranteed) {
        self.diags.emit_error(code, span)
    }

    /// Append an error with the current call stack attached.
    pub fn add_error_with_stack(
        &mut self,
        code: ErrorCode,
        span: Span,
    ) -> (&mut Diagnostic, ErrorGuaranteed) {
        let notes = self.stack_notes();
        let (diag, guar) = self.diags.emit_error(code, span);
        diag.notes.extend(notes);
        (diag, guar)
    }

    /// Append copies of every diagnostic in `diags`.
    pub fn add_diags(&mut self, diags: &Diagnostics) {
        self.diags.extend_from(diags);
    }

    /// Move every recorded diagnostic into `sink`, in order. Returns how
    /// many the sink accepted.
    pub fn report_diags(&mut self, sink: &mut impl DiagnosticSink) -> usize {
        let total = self.diags.len();
        let mut accepted = 0;
        for diag in self.diags.drain() {
            if sink.report(diag) {
                accepted += 1;
            }
        }
        debug!(total, accepted, "reported diagnostics");
        accepted
    }

    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diags
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        self.diags.has_errors()
    }

    /// Attach the current call stack to `diag`.
    pub fn report_stack(&self, diag: &mut Diagnostic) {
        diag.notes.extend(self.stack_notes());
    }

    /// The call stack as plain text, one frame per line, innermost first.
    pub fn dump_stack(&self) -> String {
        let mut out = String::new();
        for (i, note) in self.stack_notes().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{note}");
        }
        out
    }

    /// `f(1, "x")` for the call active in `frame`.
    fn frame_signature(&self, frame: &Frame, subroutine: SubroutineId) -> String {
        let decl = self.unit.subroutine(subroutine);
        let mut text = String::from(self.unit.name_str(decl.name));
        text.push('(');
        for (i, param) in decl.params.iter().enumerate() {
            if i > 0 {
                text.push_str(", ");
            }
            match frame.value_of(*param) {
                Some(value) => {
                    let _ = write!(text, "{value}");
                }
                None => text.push('?'),
            }
        }
        text.push(')');
        text
    }

    /// One note per subroutine frame, innermost first, with the middle
    /// elided once there are more than `max_backtrace` of them.
    fn stack_notes(&self) -> Vec<Note> {
        let calls: Vec<(&Frame, SubroutineId)> = self
            .frames
            .iter()
            .rev()
            .filter_map(|f| f.subroutine().map(|s| (f, s)))
            .collect();

        let limit = self.limits.max_backtrace;
        let (head, skipped) = if limit > 0 && calls.len() > limit {
            (limit / 2, calls.len() - limit)
        } else {
            (calls.len(), 0)
        };

        let mut notes = Vec::new();
        for (i, (frame, subroutine)) in calls.iter().enumerate() {
            if i == head && skipped > 0 {
                notes.push(Note::new(format!("skipping {skipped} frames")));
            }
            if i >= head && i < head + skipped {
                continue;
            }
            notes.push(Note::at(
                format!("in call to '{}'", self.frame_signature(frame, *subroutine)),
                frame.call_location(),
            ));
        }
        notes
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
