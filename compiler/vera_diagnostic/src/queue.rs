//! Destinations for reported diagnostics.
//!
//! An evaluation context accumulates diagnostics privately and hands them
//! to a [`DiagnosticSink`] when the caller asks for them. The
//! [`DiagnosticQueue`] sink adds an error limit, deduplication of repeated
//! errors at the same location, and position-sorted flushing.

use std::hash::{Hash, Hasher};

use crate::{Diagnostic, Diagnostics, ErrorGuaranteed};

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Anything that accepts diagnostics.
pub trait DiagnosticSink {
    /// Accept one diagnostic. Returns `false` if the sink filtered it out.
    fn report(&mut self, diag: Diagnostic) -> bool;
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diag: Diagnostic) -> bool {
        self.push(diag);
        true
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diag: Diagnostic) -> bool {
        self.push(diag);
        true
    }
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop an error whose code, location and message prefix repeat the
    /// previous error.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    /// Start offset and content hash of the last accepted error.
    last_error: Option<(u32, u64)>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Proof of an error, if any error was accepted.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Sort diagnostics by primary location and return them.
    ///
    /// The sort is stable, so diagnostics at the same location keep their
    /// report order. Clears the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let key = |d: &Diagnostic| d.primary_span().map_or(0, |s| s.start);
        let already_sorted = self.diagnostics.windows(2).all(|w| key(&w[0]) <= key(&w[1]));
        if !already_sorted {
            self.diagnostics.sort_by_key(key);
        }
        self.error_count = 0;
        self.last_error = None;
        std::mem::take(&mut self.diagnostics)
    }

    fn is_duplicate(&self, diag: &Diagnostic, start: u32) -> bool {
        diag.is_error()
            && self
                .last_error
                .is_some_and(|(offset, hash)| offset == start && hash == Self::dedup_hash(diag))
    }

    fn dedup_hash(diag: &Diagnostic) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        diag.code.hash(&mut hasher);
        message_prefix_hash(&diag.message).hash(&mut hasher);
        hasher.finish()
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn report(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();
        if is_error && self.limit_reached() {
            return false;
        }

        let start = diag.primary_span().map_or(0, |s| s.start);
        if self.config.deduplicate && self.is_duplicate(&diag, start) {
            return false;
        }

        if is_error {
            self.last_error = Some((start, Self::dedup_hash(&diag)));
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }
}
