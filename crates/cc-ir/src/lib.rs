//! Three-address-code IR generation: jumping-code translation of an
//! analyzed `cc_ast::Ast` into a flat, function-scoped instruction list.
//! Grounded directly in `ir.h`/`ir.c` (the IR shapes and text rendering)
//! and `ir_gen.c` (the `gen_expr`/`gen_cond`/`gen_stmt` lowering rules).

pub mod config;
pub mod error;
pub mod gen;
pub mod ir;

pub use config::IrGenConfig;
pub use error::IrError;
pub use gen::IrGenerator;
pub use ir::{Function, Instruction, Operand, Program, RelOp};
