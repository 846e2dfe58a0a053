//! Name resolution, type checking, and return-coverage analysis for the
//! AST defined in `cc_ast`. Grounded directly in `symbol_table.c` (the
//! scope table) and `semantic.c` (the analyzer's per-node-kind rules).

pub mod analysis;
pub mod config;
pub mod error;
pub mod scope;
pub mod symbol;

pub use analysis::SemanticAnalyzer;
pub use config::AnalyzerConfig;
pub use error::SemError;
pub use scope::{Scope, ScopeId, ScopeTable};
pub use symbol::{Symbol, SymbolKind};
