//! Fluent construction of diagnostics. No source-snippet rendering: this
//! core has no `SourceMap` to pull a snippet from, only a line number.

use super::{Diagnostic, Handler, Level};

pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    line: u32,
}

impl DiagnosticBuilder {
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

    pub fn warning(message: impl Into<String>, line: u32) -> Self {
        Self::new(Level::Warning, message, line)
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic::new(self.level, self.message, self.line)
    }

    pub fn emit(self, handler: &Handler) {
        handler.emit(self.build());
    }
}
