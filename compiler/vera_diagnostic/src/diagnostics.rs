//! An ordered diagnostic log for one logical evaluation.

use vera_ir::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Diagnostics in the order they were recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new diagnostic and return it for further annotation.
    pub fn add(&mut self, code: ErrorCode, span: Span) -> &mut Diagnostic {
        self.push(Diagnostic::new(code, span))
    }

    /// Append an already-built diagnostic.
    pub fn push(&mut self, diag: Diagnostic) -> &mut Diagnostic {
        self.entries.push(diag);
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Append copies of every diagnostic in `other`, preserving order.
    pub fn extend_from(&mut self, other: &Diagnostics) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every diagnostic, leaving the log empty.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Diagnostic> {
        self.entries.drain(..)
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_error()).count()
    }

    /// Proof of an error, if any error has been recorded.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count())
    }

    /// Record an error and get proof that it was recorded.
    ///
    /// # Panics
    /// Panics in debug builds if `code` is a warning code.
    pub fn emit_error(&mut self, code: ErrorCode, span: Span) -> (&mut Diagnostic, ErrorGuaranteed) {
        debug_assert!(!code.is_warning(), "emit_error called with warning {code}");
        (self.add(code, span), ErrorGuaranteed::new())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Diagnostics {
            entries: iter.into_iter().collect(),
        }
    }
}
