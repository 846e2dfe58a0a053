//! Internal fault types for cc-util.
//!
//! These are caller-contract violations (bad configuration, out-of-range
//! indices), not the compiler's own user-facing semantic diagnostics. They
//! are ordinary `Result` errors, never printed with the
//! `"Semantic Error (line <n>): ..."` format used by `cc-sem`.

use thiserror::Error;

/// Error type for symbol interning operations.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("symbol index {index} out of range (interner holds {len} entries)")]
    OutOfRange { index: u32, len: usize },
}

pub type SymbolResult<T> = std::result::Result<T, SymbolError>;
