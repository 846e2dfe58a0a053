//! Jumping-code translation from `cc_ast::Ast` to the flat TAC IR.
//! Grounded in `ir_gen.c`: `gen_expr` (value context), `gen_cond` (jump
//! context), and `gen_stmt` (statement lowering), each ported function for
//! function.

use cc_ast::{Ast, BinOp, DataType, Node, NodeId, NodeKind, UnOp};

use crate::config::IrGenConfig;
use crate::error::{IrError, Result};
use crate::ir::{Function, Instruction, Operand, Program, RelOp};

pub struct IrGenerator {
    config: IrGenConfig,
    temp_counter: u32,
    label_counter: u32,
}

impl Default for IrGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IrGenerator {
    pub fn new() -> Self {
        Self::with_config(IrGenConfig::default())
    }

    pub fn with_config(config: IrGenConfig) -> Self {
        Self {
            config,
            temp_counter: 0,
            label_counter: 0,
        }
    }

    pub fn config(&self) -> IrGenConfig {
        self.config
    }

    /// Resets both counters. Called once per function so temporaries and
    /// labels are function-scoped, matching `ir_reset_temps`.
    fn reset_counters(&mut self) {
        self.temp_counter = 0;
        self.label_counter = 0;
    }

    fn fresh_temp(&mut self) -> String {
        let name = format!("t{}", self.temp_counter);
        self.temp_counter += 1;
        name
    }

    fn fresh_label(&mut self) -> String {
        let name = format!("L{}", self.label_counter);
        self.label_counter += 1;
        name
    }

    pub fn generate(&mut self, ast: &Ast, root: Option<NodeId>) -> Result<Program> {
        let mut program = Program::default();
        for id in ast.siblings(root) {
            match ast.get(id).kind {
                NodeKind::FuncDef => program.functions.push(self.gen_func(ast, id)?),
                NodeKind::VarDecl => {
                    if let Some(init) = ast.get(id).right {
                        let v = self.gen_expr(ast, init, &mut program.global_instrs)?;
                        let name = var_decl_name(ast.get(id));
                        program
                            .global_instrs
                            .push(Instruction::Assign { dst: name, src: v });
                    }
                }
                _ => {}
            }
        }
        Ok(program)
    }

    fn gen_func(&mut self, ast: &Ast, id: NodeId) -> Result<Function> {
        self.reset_counters();
        let node = ast.get(id);
        let name = node.name.clone().expect("FuncDef missing name");
        let ret_type_node = node.left.expect("FuncDef missing return type node");
        let return_type = ast.get(ret_type_node).data_type;
        let body = node.body;

        let mut instructions = Vec::new();
        if let Some(b) = body {
            self.gen_stmt(ast, b, &mut instructions)?;
        }

        Ok(Function {
            name,
            return_type,
            instructions,
        })
    }

    // ---- expression-context lowering: produces a value ----

    fn gen_expr(&mut self, ast: &Ast, id: NodeId, out: &mut Vec<Instruction>) -> Result<Operand> {
        let node = ast.get(id);
        match node.kind {
            NodeKind::ConstInt | NodeKind::ConstChar => Ok(Operand::Const(node.literal)),
            NodeKind::StrLit => Ok(Operand::Const(0)),
            NodeKind::Var => Ok(Operand::Name(node.name.clone().expect("Var missing name"))),
            NodeKind::Assign => {
                let target = node.left.expect("Assign missing target");
                let value = node.right.expect("Assign missing value");
                let v = self.gen_expr(ast, value, out)?;
                let name = assign_target_name(ast, target)?;
                out.push(Instruction::Assign {
                    dst: name.clone(),
                    src: v,
                });
                Ok(Operand::Name(name))
            }
            NodeKind::BinOp => {
                let op = node.bin_op.expect("BinOp missing operator");
                let left = node.left.expect("BinOp missing left operand");
                let right = node.right.expect("BinOp missing right operand");
                if op.is_logical() {
                    self.gen_logical(ast, id, out)
                } else if op.is_relational() {
                    self.gen_relational(ast, op, left, right, out)
                } else {
                    let l = self.gen_expr(ast, left, out)?;
                    let r = self.gen_expr(ast, right, out)?;
                    let t = self.fresh_temp();
                    out.push(Instruction::BinOp {
                        dst: t.clone(),
                        op,
                        lhs: l,
                        rhs: r,
                    });
                    Ok(Operand::Name(t))
                }
            }
            NodeKind::UnOp => {
                let op = node.un_op.expect("UnOp missing operator");
                let operand = node.left.expect("UnOp missing operand");
                let s = self.gen_expr(ast, operand, out)?;
                let t = self.fresh_temp();
                out.push(Instruction::UnOp {
                    dst: t.clone(),
                    op,
                    src: s,
                });
                Ok(Operand::Name(t))
            }
            NodeKind::FuncCall => self.gen_call(ast, id, out),
            // An absent optional slot is represented as `NodeKind::Empty`
            // rather than `None` in a few places (e.g. a for-loop's
            // `incr`); any other unrecognized kind reaching expression
            // context falls back to the same harmless constant-zero.
            _ => Ok(Operand::Const(0)),
        }
    }

    fn gen_logical(&mut self, ast: &Ast, id: NodeId, out: &mut Vec<Instruction>) -> Result<Operand> {
        let t = self.fresh_temp();
        let l_true = self.fresh_label();
        let l_false = self.fresh_label();
        let l_end = self.fresh_label();

        out.push(Instruction::Assign {
            dst: t.clone(),
            src: Operand::Const(0),
        });
        self.gen_cond(ast, id, &l_true, &l_false, out)?;
        out.push(Instruction::Label { name: l_true });
        out.push(Instruction::Assign {
            dst: t.clone(),
            src: Operand::Const(1),
        });
        out.push(Instruction::Goto { target: l_end.clone() });
        out.push(Instruction::Label { name: l_false });
        out.push(Instruction::Label { name: l_end });
        Ok(Operand::Name(t))
    }

    fn gen_relational(
        &mut self,
        ast: &Ast,
        op: BinOp,
        left: NodeId,
        right: NodeId,
        out: &mut Vec<Instruction>,
    ) -> Result<Operand> {
        let l = self.gen_expr(ast, left, out)?;
        let r = self.gen_expr(ast, right, out)?;
        let t = self.fresh_temp();
        let l_true = self.fresh_label();
        let l_end = self.fresh_label();

        out.push(Instruction::Assign {
            dst: t.clone(),
            src: Operand::Const(0),
        });
        out.push(Instruction::IfRel {
            lhs: l,
            rel: RelOp::from_bin_op(op),
            rhs: r,
            target: l_true.clone(),
        });
        out.push(Instruction::Goto { target: l_end.clone() });
        out.push(Instruction::Label { name: l_true });
        out.push(Instruction::Assign {
            dst: t.clone(),
            src: Operand::Const(1),
        });
        out.push(Instruction::Label { name: l_end });
        Ok(Operand::Name(t))
    }

    fn gen_call(&mut self, ast: &Ast, id: NodeId, out: &mut Vec<Instruction>) -> Result<Operand> {
        let node = ast.get(id);
        let func = node.name.clone().expect("FuncCall missing name");
        let args_head = node.left;
        let result_type = node.data_type;

        let args: Vec<NodeId> = ast.siblings(args_head).collect();
        for &arg in &args {
            let v = self.gen_expr(ast, arg, out)?;
            out.push(Instruction::Param { value: v });
        }

        if result_type == DataType::Void {
            out.push(Instruction::Call {
                dst: None,
                func,
                argc: args.len(),
            });
            Ok(Operand::Const(0))
        } else {
            let t = self.fresh_temp();
            out.push(Instruction::Call {
                dst: Some(t.clone()),
                func,
                argc: args.len(),
            });
            Ok(Operand::Name(t))
        }
    }

    // ---- jump-context lowering: produces no value, only control flow ----

    fn gen_cond(&mut self, ast: &Ast, id: NodeId, l_true: &str, l_false: &str, out: &mut Vec<Instruction>) -> Result<()> {
        let node = ast.get(id);
        match node.kind {
            NodeKind::ConstInt | NodeKind::ConstChar => {
                let target = if node.literal != 0 { l_true } else { l_false };
                out.push(Instruction::Goto {
                    target: target.to_string(),
                });
                Ok(())
            }
            NodeKind::Var => {
                let name = node.name.clone().expect("Var missing name");
                out.push(Instruction::IfRel {
                    lhs: Operand::Name(name),
                    rel: RelOp::Ne,
                    rhs: Operand::Const(0),
                    target: l_true.to_string(),
                });
                out.push(Instruction::Goto {
                    target: l_false.to_string(),
                });
                Ok(())
            }
            NodeKind::BinOp if node.bin_op == Some(BinOp::And) => {
                let left = node.left.expect("BinOp missing left operand");
                let right = node.right.expect("BinOp missing right operand");
                let l_mid = self.fresh_label();
                self.gen_cond(ast, left, &l_mid, l_false, out)?;
                out.push(Instruction::Label { name: l_mid.clone() });
                self.gen_cond(ast, right, l_true, l_false, out)
            }
            NodeKind::BinOp if node.bin_op == Some(BinOp::Or) => {
                let left = node.left.expect("BinOp missing left operand");
                let right = node.right.expect("BinOp missing right operand");
                let l_mid = self.fresh_label();
                self.gen_cond(ast, left, l_true, &l_mid, out)?;
                out.push(Instruction::Label { name: l_mid.clone() });
                self.gen_cond(ast, right, l_true, l_false, out)
            }
            NodeKind::BinOp if node.bin_op.is_some_and(BinOp::is_relational) => {
                let op = node.bin_op.unwrap();
                let left = node.left.expect("BinOp missing left operand");
                let right = node.right.expect("BinOp missing right operand");
                let l = self.gen_expr(ast, left, out)?;
                let r = self.gen_expr(ast, right, out)?;
                out.push(Instruction::IfRel {
                    lhs: l,
                    rel: RelOp::from_bin_op(op),
                    rhs: r,
                    target: l_true.to_string(),
                });
                out.push(Instruction::Goto {
                    target: l_false.to_string(),
                });
                Ok(())
            }
            NodeKind::UnOp if node.un_op == Some(UnOp::Not) => {
                let operand = node.left.expect("UnOp missing operand");
                // Swap targets: `!e` is true exactly where `e` is false.
                self.gen_cond(ast, operand, l_false, l_true, out)
            }
            _ => {
                let v = self.gen_expr(ast, id, out)?;
                out.push(Instruction::IfRel {
                    lhs: v,
                    rel: RelOp::Ne,
                    rhs: Operand::Const(0),
                    target: l_true.to_string(),
                });
                out.push(Instruction::Goto {
                    target: l_false.to_string(),
                });
                Ok(())
            }
        }
    }

    // ---- statement lowering: no value, side effects only ----

    fn gen_stmt(&mut self, ast: &Ast, id: NodeId, out: &mut Vec<Instruction>) -> Result<()> {
        let node = ast.get(id);
        match node.kind {
            NodeKind::Block => {
                for stmt in ast.siblings(node.left).collect::<Vec<_>>() {
                    self.gen_stmt(ast, stmt, out)?;
                }
                Ok(())
            }
            NodeKind::If => self.gen_if(ast, id, out),
            NodeKind::While => self.gen_while(ast, id, out),
            NodeKind::For => self.gen_for(ast, id, out),
            NodeKind::Return => {
                match node.left {
                    Some(e) => {
                        let v = self.gen_expr(ast, e, out)?;
                        out.push(Instruction::Return { value: Some(v) });
                    }
                    None => out.push(Instruction::Return { value: None }),
                }
                Ok(())
            }
            NodeKind::Assign => {
                self.gen_expr(ast, id, out)?;
                Ok(())
            }
            NodeKind::VarDecl => {
                if let Some(init) = node.right {
                    let v = self.gen_expr(ast, init, out)?;
                    let name = var_decl_name(node);
                    out.push(Instruction::Assign { dst: name, src: v });
                }
                Ok(())
            }
            NodeKind::Empty | NodeKind::Type => Ok(()),
            _ => {
                self.gen_expr(ast, id, out)?;
                Ok(())
            }
        }
    }

    fn gen_if(&mut self, ast: &Ast, id: NodeId, out: &mut Vec<Instruction>) -> Result<()> {
        let node = ast.get(id);
        let cond = node.cond.expect("If missing condition");
        let then_branch = node.left.expect("If missing then-branch");
        let else_branch = node.right;
        let line = node.line;

        let l_then = self.fresh_label();
        let l_else = self.fresh_label();
        let l_end = self.fresh_label();

        let false_target = if else_branch.is_some() { &l_else } else { &l_end };
        self.gen_cond(ast, cond, &l_then, false_target, out)?;

        out.push(Instruction::Label { name: l_then });
        self.gen_stmt(ast, then_branch, out)?;

        if let Some(else_b) = else_branch {
            out.push(Instruction::Goto { target: l_end.clone() });
            out.push(Instruction::Label { name: l_else });
            self.gen_stmt(ast, else_b, out)?;
        }
        let _ = line;
        out.push(Instruction::Label { name: l_end });
        Ok(())
    }

    fn gen_while(&mut self, ast: &Ast, id: NodeId, out: &mut Vec<Instruction>) -> Result<()> {
        let node = ast.get(id);
        let cond = node.cond.expect("While missing condition");
        let body = node.body.expect("While missing body");

        let l_cond = self.fresh_label();
        let l_body = self.fresh_label();
        let l_end = self.fresh_label();

        out.push(Instruction::Label { name: l_cond.clone() });
        self.gen_cond(ast, cond, &l_body, &l_end, out)?;
        out.push(Instruction::Label { name: l_body });
        self.gen_stmt(ast, body, out)?;
        out.push(Instruction::Goto { target: l_cond });
        out.push(Instruction::Label { name: l_end });
        Ok(())
    }

    fn gen_for(&mut self, ast: &Ast, id: NodeId, out: &mut Vec<Instruction>) -> Result<()> {
        let node = ast.get(id);
        let init = node.init;
        let cond = node.cond;
        let incr = node.incr;
        let body = node.body.expect("For missing body");

        if let Some(i) = init {
            self.gen_stmt(ast, i, out)?;
        }

        let l_cond = self.fresh_label();
        let l_body = self.fresh_label();
        let l_end = self.fresh_label();

        out.push(Instruction::Label { name: l_cond.clone() });
        match cond {
            Some(c) => self.gen_cond(ast, c, &l_body, &l_end, out)?,
            None => out.push(Instruction::Goto { target: l_body.clone() }),
        }
        out.push(Instruction::Label { name: l_body });
        self.gen_stmt(ast, body, out)?;
        if let Some(inc) = incr {
            self.gen_expr(ast, inc, out)?;
        }
        out.push(Instruction::Goto { target: l_cond });
        out.push(Instruction::Label { name: l_end });
        Ok(())
    }
}

fn var_decl_name(node: &Node) -> String {
    node.name.clone().expect("VarDecl missing name")
}

fn assign_target_name(ast: &Ast, target: NodeId) -> Result<String> {
    let node = ast.get(target);
    match &node.name {
        Some(name) if node.kind == NodeKind::Var => Ok(name.clone()),
        _ => Err(IrError::MalformedNode {
            line: node.line,
            detail: "Assign target must be a Var node",
        }),
    }
}
