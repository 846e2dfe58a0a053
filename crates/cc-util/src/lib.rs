//! Shared infrastructure for the compiler middle-end crates: typed index
//! vectors, identifier interning, and diagnostic accumulation.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use symbol::{Interner, Symbol};
pub use rustc_hash::{FxHashMap, FxHashSet};
