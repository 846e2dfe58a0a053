//! Internal faults: contract violations by a caller of this crate, as
//! opposed to semantic diagnostics (which are counted, not `Err`-returned —
//! see `cc_util::diagnostic`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SemError {
    #[error("scope table bucket count must be non-zero")]
    InvalidTableSize,
}

pub type Result<T> = std::result::Result<T, SemError>;
