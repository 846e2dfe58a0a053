use thiserror::Error;

/// Internal faults raised by malformed input, as opposed to the semantic
/// diagnostics `cc_sem` accumulates. The IR generator assumes semantic
/// success: these fire only on a tree shape that could never survive
/// analysis, such as an `Assign` whose target is not a `Var`.
#[derive(Debug, Error)]
pub enum IrError {
    #[error("malformed AST node at line {line}: {detail}")]
    MalformedNode { line: u32, detail: &'static str },
}

pub type Result<T> = std::result::Result<T, IrError>;
