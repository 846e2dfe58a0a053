//! Diagnostic accumulation.
//!
//! `Level` stays a 4-variant enum rather than collapsing to a single
//! `Error` case, in case a downstream driver wants warnings someday.
//! Diagnostic codes and byte-offset spans are dropped: this language's
//! diagnostics are plain text keyed by a source line number (see
//! `cc_sem`), not by a stable code namespace or a byte range into a
//! source map.

pub mod builder;

use std::cell::RefCell;
use std::fmt;

pub use builder::DiagnosticBuilder;

/// Severity of a diagnostic. This core only ever emits `Error`, but `Level`
/// is kept as an enum (rather than collapsed to a unit type) since a
/// downstream driver built on top of this core is the natural place for
/// warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
            Level::Help => write!(f, "help"),
        }
    }
}

/// A single reported problem, located by source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub line: u32,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, line: u32) -> Self {
        Self {
            level,
            message: message.into(),
            line,
        }
    }

    pub fn error(message: impl Into<String>, line: u32) -> Self {
        Self::new(Level::Error, message, line)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Error => write!(f, "Semantic Error (line {}): {}", self.line, self.message),
            other => write!(f, "{} (line {}): {}", other, self.line, self.message),
        }
    }
}

/// Accumulates diagnostics for one compilation run.
///
/// A plain `RefCell<Vec<Diagnostic>>`, so that emission sites can hold a
/// shared `&Handler` without needing `&mut` threaded through every walk
/// function.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn error(&self, message: impl Into<String>, line: u32) {
        self.emit(Diagnostic::error(message, line));
    }

    /// Number of `Level::Error` diagnostics recorded so far. This is the
    /// `semantic_errors` counter exposed to a driver.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}
