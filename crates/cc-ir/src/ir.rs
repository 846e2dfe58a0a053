//! The three-address-code IR: a flat instruction list per function, rather
//! than a control-flow graph of basic blocks. Grounded in `ir.h`'s
//! `Instruction`/`Operand`/`Function`/`Program` shapes; text rendering
//! matches `ir.c`'s `print_*` family form-for-form.

use std::fmt;

use cc_ast::{BinOp as AstBinOp, DataType, UnOp as AstUnOp};

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Name(String),
    Const(i64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Name(n) => write!(f, "{n}"),
            Operand::Const(c) => write!(f, "{c}"),
        }
    }
}

/// Relational operator carried by an `IfRel` instruction. Kept distinct
/// from `cc_ast::BinOp` since only six of its variants are ever valid
/// here, and a conditional jump's payload is a narrower thing than a
/// general binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl RelOp {
    pub fn from_bin_op(op: AstBinOp) -> Self {
        match op {
            AstBinOp::Lt => RelOp::Lt,
            AstBinOp::Gt => RelOp::Gt,
            AstBinOp::Le => RelOp::Le,
            AstBinOp::Ge => RelOp::Ge,
            AstBinOp::Eq => RelOp::Eq,
            AstBinOp::Ne => RelOp::Ne,
            other => panic!("{other:?} is not a relational operator"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `dst := src`
    Assign { dst: String, src: Operand },
    /// `dst := lhs op rhs`
    BinOp {
        dst: String,
        op: AstBinOp,
        lhs: Operand,
        rhs: Operand,
    },
    /// `dst := op src`
    UnOp {
        dst: String,
        op: AstUnOp,
        src: Operand,
    },
    /// `param value`
    Param { value: Operand },
    /// `dst := call func, argc` if `dst` is `Some`, else `call func, argc`.
    Call {
        dst: Option<String>,
        func: String,
        argc: usize,
    },
    /// `return value` if `Some`, else bare `return`.
    Return { value: Option<Operand> },
    /// `name:`
    Label { name: String },
    /// `goto target`
    Goto { target: String },
    /// `if lhs rel rhs goto target`
    IfRel {
        lhs: Operand,
        rel: RelOp,
        rhs: Operand,
        target: String,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Assign { dst, src } => write!(f, "  {dst} := {src}"),
            Instruction::BinOp { dst, op, lhs, rhs } => {
                write!(f, "  {dst} := {lhs} {} {rhs}", op.as_str())
            }
            Instruction::UnOp { dst, op, src } => write!(f, "  {dst} := {} {src}", op.as_str()),
            Instruction::Param { value } => write!(f, "  param {value}"),
            Instruction::Call {
                dst: Some(dst),
                func,
                argc,
            } => write!(f, "  {dst} := call {func}, {argc}"),
            Instruction::Call { dst: None, func, argc } => write!(f, "  call {func}, {argc}"),
            Instruction::Return { value: Some(v) } => write!(f, "  return {v}"),
            Instruction::Return { value: None } => write!(f, "  return"),
            Instruction::Label { name } => write!(f, "{name}:"),
            Instruction::Goto { target } => write!(f, "  goto {target}"),
            Instruction::IfRel { lhs, rel, rhs, target } => {
                write!(f, "  if {lhs} {rel} {rhs} goto {target}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub return_type: DataType,
    pub instructions: Vec<Instruction>,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "function {}:", self.name)?;
        for inst in &self.instructions {
            writeln!(f, "{inst}")?;
        }
        Ok(())
    }
}

/// A whole lowered translation unit: one `Function` per `FuncDef`, plus
/// the flat instruction list produced by initialized top-level `VarDecl`s.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub functions: Vec<Function>,
    pub global_instrs: Vec<Instruction>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.global_instrs {
            writeln!(f, "{inst}")?;
        }
        if !self.global_instrs.is_empty() {
            writeln!(f)?;
        }
        for func in &self.functions {
            write!(f, "{func}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}
