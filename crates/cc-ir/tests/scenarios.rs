//! End-to-end scenarios running the semantic analyzer and IR generator
//! back to back, one test per lettered scenario.

use cc_ast::{Ast, BinOp, DataType, Node, NodeId, NodeKind};
use cc_ir::{Instruction, IrGenerator, Operand};
use cc_sem::{AnalyzerConfig, SemanticAnalyzer};

fn type_node(ast: &mut Ast, dt: DataType) -> NodeId {
    let mut n = Node::new(NodeKind::Type, 1);
    n.data_type = dt;
    ast.push(n)
}

fn link(ast: &mut Ast, nodes: &[NodeId]) {
    for w in nodes.windows(2) {
        ast.get_mut(w[0]).next = Some(w[1]);
    }
}

/// A. `int f(int x){ return x + 1; }` -> no errors; IR: `t0 := x + 1;
/// return t0`.
#[test]
fn scenario_a_arithmetic_return_with_parameter() {
    let mut ast = Ast::new();
    let ret_ty = type_node(&mut ast, DataType::Int);
    let param_ty = type_node(&mut ast, DataType::Int);
    let mut param = Node::new(NodeKind::Param, 1);
    param.name = Some("x".into());
    param.left = Some(param_ty);
    let param = ast.push(param);

    let var_x = {
        let mut n = Node::new(NodeKind::Var, 1);
        n.name = Some("x".into());
        ast.push(n)
    };
    let mut one = Node::new(NodeKind::ConstInt, 1);
    one.literal = 1;
    let one = ast.push(one);
    let mut add = Node::new(NodeKind::BinOp, 1);
    add.bin_op = Some(BinOp::Add);
    add.left = Some(var_x);
    add.right = Some(one);
    let add = ast.push(add);
    let mut ret = Node::new(NodeKind::Return, 1);
    ret.left = Some(add);
    let ret = ast.push(ret);
    let mut block = Node::new(NodeKind::Block, 1);
    block.left = Some(ret);
    let block = ast.push(block);

    let mut func = Node::new(NodeKind::FuncDef, 1);
    func.name = Some("f".into());
    func.left = Some(ret_ty);
    func.params = Some(param);
    func.body = Some(block);
    let func = ast.push(func);

    let mut analyzer = SemanticAnalyzer::new(AnalyzerConfig::default()).unwrap();
    analyzer.analyze(&mut ast, Some(func));
    assert_eq!(analyzer.error_count(), 0);

    let mut gen = IrGenerator::new();
    let program = gen.generate(&ast, Some(func)).unwrap();
    assert_eq!(
        program.functions[0].instructions,
        vec![
            Instruction::BinOp {
                dst: "t0".into(),
                op: BinOp::Add,
                lhs: Operand::Name("x".into()),
                rhs: Operand::Const(1),
            },
            Instruction::Return {
                value: Some(Operand::Name("t0".into()))
            },
        ]
    );
}

/// B. `int f(){}` -> one error "Non-void function must return a value".
#[test]
fn scenario_b_missing_return_in_non_void_function() {
    let mut ast = Ast::new();
    let ret_ty = type_node(&mut ast, DataType::Int);
    let block = ast.push(Node::new(NodeKind::Block, 1));
    let mut func = Node::new(NodeKind::FuncDef, 1);
    func.name = Some("f".into());
    func.left = Some(ret_ty);
    func.body = Some(block);
    let func = ast.push(func);

    let mut analyzer = SemanticAnalyzer::new(AnalyzerConfig::default()).unwrap();
    analyzer.analyze(&mut ast, Some(func));
    assert_eq!(analyzer.error_count(), 1);
    assert_eq!(
        analyzer.handler().diagnostics()[0].to_string(),
        "Semantic Error (line 1): Non-void function must return a value"
    );
}

/// C. `int main(){ int x; x = y; return 0; }` with no `y` declared -> one
/// error "Undeclared variable" at `y`'s line; analysis continues. Per
/// policy, IR generation is skipped on a non-zero error count.
#[test]
fn scenario_c_undeclared_variable_reported_once_analysis_continues() {
    let mut ast = Ast::new();
    let ret_ty = type_node(&mut ast, DataType::Int);
    let x_ty = type_node(&mut ast, DataType::Int);
    let mut decl_x = Node::new(NodeKind::VarDecl, 2);
    decl_x.name = Some("x".into());
    decl_x.left = Some(x_ty);
    let decl_x = ast.push(decl_x);

    let target_x = {
        let mut n = Node::new(NodeKind::Var, 3);
        n.name = Some("x".into());
        ast.push(n)
    };
    let var_y = {
        let mut n = Node::new(NodeKind::Var, 3);
        n.name = Some("y".into());
        ast.push(n)
    };
    let mut assign = Node::new(NodeKind::Assign, 3);
    assign.left = Some(target_x);
    assign.right = Some(var_y);
    let assign = ast.push(assign);

    let mut zero = Node::new(NodeKind::ConstInt, 4);
    zero.literal = 0;
    let zero = ast.push(zero);
    let mut ret = Node::new(NodeKind::Return, 4);
    ret.left = Some(zero);
    let ret = ast.push(ret);

    link(&mut ast, &[decl_x, assign, ret]);
    let mut block = Node::new(NodeKind::Block, 1);
    block.left = Some(decl_x);
    let block = ast.push(block);

    let mut func = Node::new(NodeKind::FuncDef, 1);
    func.name = Some("main".into());
    func.left = Some(ret_ty);
    func.body = Some(block);
    let func = ast.push(func);

    let mut analyzer = SemanticAnalyzer::new(AnalyzerConfig::default()).unwrap();
    analyzer.analyze(&mut ast, Some(func));

    assert_eq!(analyzer.error_count(), 1);
    let diag = &analyzer.handler().diagnostics()[0];
    assert_eq!(diag.message, "Undeclared variable");
    assert_eq!(diag.line, 3);
    // Policy: a non-zero error count means the driver skips IR
    // generation for this AST; this test stops at the analyzer result.
}

/// E. `int f(int a){ return 1; } int main(){ return f(1,2); }` -> one
/// error "Too many arguments" at the call's line.
#[test]
fn scenario_e_call_with_too_many_arguments() {
    let mut ast = Ast::new();

    let f_ret_ty = type_node(&mut ast, DataType::Int);
    let a_ty = type_node(&mut ast, DataType::Int);
    let mut param_a = Node::new(NodeKind::Param, 1);
    param_a.name = Some("a".into());
    param_a.left = Some(a_ty);
    let param_a = ast.push(param_a);
    let mut one = Node::new(NodeKind::ConstInt, 1);
    one.literal = 1;
    let one = ast.push(one);
    let mut ret_f = Node::new(NodeKind::Return, 1);
    ret_f.left = Some(one);
    let ret_f = ast.push(ret_f);
    let mut block_f = Node::new(NodeKind::Block, 1);
    block_f.left = Some(ret_f);
    let block_f = ast.push(block_f);
    let mut f = Node::new(NodeKind::FuncDef, 1);
    f.name = Some("f".into());
    f.left = Some(f_ret_ty);
    f.params = Some(param_a);
    f.body = Some(block_f);
    let f = ast.push(f);

    let main_ret_ty = type_node(&mut ast, DataType::Int);
    let mut arg1 = Node::new(NodeKind::ConstInt, 2);
    arg1.literal = 1;
    let arg1 = ast.push(arg1);
    let mut arg2 = Node::new(NodeKind::ConstInt, 2);
    arg2.literal = 2;
    let arg2 = ast.push(arg2);
    ast.get_mut(arg1).next = Some(arg2);
    let mut call = Node::new(NodeKind::FuncCall, 2);
    call.name = Some("f".into());
    call.left = Some(arg1);
    let call = ast.push(call);
    let mut ret_main = Node::new(NodeKind::Return, 2);
    ret_main.left = Some(call);
    let ret_main = ast.push(ret_main);
    let mut block_main = Node::new(NodeKind::Block, 2);
    block_main.left = Some(ret_main);
    let block_main = ast.push(block_main);
    let mut main = Node::new(NodeKind::FuncDef, 2);
    main.name = Some("main".into());
    main.left = Some(main_ret_ty);
    main.body = Some(block_main);
    let main = ast.push(main);

    link(&mut ast, &[f, main]);

    let mut analyzer = SemanticAnalyzer::new(AnalyzerConfig::default()).unwrap();
    analyzer.analyze(&mut ast, Some(f));

    assert_eq!(analyzer.error_count(), 1);
    let diag = &analyzer.handler().diagnostics()[0];
    assert_eq!(diag.message, "Too many arguments");
    assert_eq!(diag.line, 2);
}

/// F. `int main(){ int i; for (i=0; i<3; i=i+1) { } return 0; }` -> no
/// errors; IR contains `L_cond`/`L_body`/`L_end`-shaped labels, an
/// `if i < 3 goto L_body` followed by `goto L_end`, an unconditional
/// `goto` back to the condition label at the loop tail, and the
/// increment emitted between the (empty) body and that back-edge.
#[test]
fn scenario_f_for_loop_label_and_increment_placement() {
    let mut ast = Ast::new();
    let ret_ty = type_node(&mut ast, DataType::Int);
    let i_ty = type_node(&mut ast, DataType::Int);
    let mut decl_i = Node::new(NodeKind::VarDecl, 2);
    decl_i.name = Some("i".into());
    decl_i.left = Some(i_ty);
    let decl_i = ast.push(decl_i);

    // i = 0
    let target_i = {
        let mut n = Node::new(NodeKind::Var, 3);
        n.name = Some("i".into());
        ast.push(n)
    };
    let mut zero = Node::new(NodeKind::ConstInt, 3);
    zero.literal = 0;
    let zero = ast.push(zero);
    let mut init_assign = Node::new(NodeKind::Assign, 3);
    init_assign.left = Some(target_i);
    init_assign.right = Some(zero);
    let init_assign = ast.push(init_assign);

    // i < 3
    let cond_i = {
        let mut n = Node::new(NodeKind::Var, 3);
        n.name = Some("i".into());
        ast.push(n)
    };
    let mut three = Node::new(NodeKind::ConstInt, 3);
    three.literal = 3;
    let three = ast.push(three);
    let mut cond = Node::new(NodeKind::BinOp, 3);
    cond.bin_op = Some(BinOp::Lt);
    cond.left = Some(cond_i);
    cond.right = Some(three);
    let cond = ast.push(cond);

    // i = i + 1
    let incr_target = {
        let mut n = Node::new(NodeKind::Var, 3);
        n.name = Some("i".into());
        ast.push(n)
    };
    let incr_i = {
        let mut n = Node::new(NodeKind::Var, 3);
        n.name = Some("i".into());
        ast.push(n)
    };
    let mut one = Node::new(NodeKind::ConstInt, 3);
    one.literal = 1;
    let one = ast.push(one);
    let mut incr_add = Node::new(NodeKind::BinOp, 3);
    incr_add.bin_op = Some(BinOp::Add);
    incr_add.left = Some(incr_i);
    incr_add.right = Some(one);
    let incr_add = ast.push(incr_add);
    let mut incr = Node::new(NodeKind::Assign, 3);
    incr.left = Some(incr_target);
    incr.right = Some(incr_add);
    let incr = ast.push(incr);

    let body = ast.push(Node::new(NodeKind::Block, 3));

    let mut for_node = Node::new(NodeKind::For, 3);
    for_node.init = Some(init_assign);
    for_node.cond = Some(cond);
    for_node.incr = Some(incr);
    for_node.body = Some(body);
    let for_node = ast.push(for_node);

    let mut zero_ret = Node::new(NodeKind::ConstInt, 4);
    zero_ret.literal = 0;
    let zero_ret = ast.push(zero_ret);
    let mut ret = Node::new(NodeKind::Return, 4);
    ret.left = Some(zero_ret);
    let ret = ast.push(ret);

    link(&mut ast, &[decl_i, for_node, ret]);
    let mut block = Node::new(NodeKind::Block, 1);
    block.left = Some(decl_i);
    let block = ast.push(block);

    let mut func = Node::new(NodeKind::FuncDef, 1);
    func.name = Some("main".into());
    func.left = Some(ret_ty);
    func.body = Some(block);
    let func = ast.push(func);

    let mut analyzer = SemanticAnalyzer::new(AnalyzerConfig::default()).unwrap();
    analyzer.analyze(&mut ast, Some(func));
    assert_eq!(analyzer.error_count(), 0);

    let mut gen = IrGenerator::new();
    let program = gen.generate(&ast, Some(func)).unwrap();
    let instrs = &program.functions[0].instructions;

    let cond_label = match &instrs[1] {
        Instruction::Label { name } => name.clone(),
        other => panic!("expected L_cond label, got {other:?}"),
    };
    let if_pos = instrs
        .iter()
        .position(|i| matches!(i, Instruction::IfRel { .. }))
        .expect("an if-goto testing i < 3");
    match &instrs[if_pos] {
        Instruction::IfRel { lhs, rel, rhs, .. } => {
            assert_eq!(*lhs, Operand::Name("i".into()));
            assert_eq!(*rel, cc_ir::RelOp::Lt);
            assert_eq!(*rhs, Operand::Const(3));
        }
        _ => unreachable!(),
    }
    assert!(matches!(instrs[if_pos + 1], Instruction::Goto { .. }));

    // The increment is emitted after the (empty) body and before the
    // unconditional back-edge to L_cond.
    let back_edge_pos = instrs
        .iter()
        .rposition(|i| matches!(i, Instruction::Goto { target } if *target == cond_label))
        .expect("an unconditional goto back to L_cond");
    // `i = i + 1` lowers to a BinOp computing the sum, then an Assign
    // storing it back into `i`, both immediately before the back-edge.
    assert!(matches!(&instrs[back_edge_pos - 1], Instruction::Assign { dst, .. } if dst == "i"));
    assert!(matches!(
        instrs[back_edge_pos - 2],
        Instruction::BinOp { op: BinOp::Add, .. }
    ));
}

/// `for(i=0;i<3;){}` with an explicit `NodeKind::Empty` `incr` slot (as
/// opposed to a `None` one) must not panic: an absent increment can be
/// represented either way depending on how a caller builds the tree, and
/// both must lower to "no increment instructions emitted".
#[test]
fn scenario_for_loop_with_empty_increment_node_does_not_panic() {
    let mut ast = Ast::new();
    let ret_ty = type_node(&mut ast, DataType::Int);
    let i_ty = type_node(&mut ast, DataType::Int);
    let mut decl_i = Node::new(NodeKind::VarDecl, 2);
    decl_i.name = Some("i".into());
    decl_i.left = Some(i_ty);
    let decl_i = ast.push(decl_i);

    let target_i = {
        let mut n = Node::new(NodeKind::Var, 3);
        n.name = Some("i".into());
        ast.push(n)
    };
    let mut zero = Node::new(NodeKind::ConstInt, 3);
    zero.literal = 0;
    let zero = ast.push(zero);
    let mut init_assign = Node::new(NodeKind::Assign, 3);
    init_assign.left = Some(target_i);
    init_assign.right = Some(zero);
    let init_assign = ast.push(init_assign);

    let cond_i = {
        let mut n = Node::new(NodeKind::Var, 3);
        n.name = Some("i".into());
        ast.push(n)
    };
    let mut three = Node::new(NodeKind::ConstInt, 3);
    three.literal = 3;
    let three = ast.push(three);
    let mut cond = Node::new(NodeKind::BinOp, 3);
    cond.bin_op = Some(BinOp::Lt);
    cond.left = Some(cond_i);
    cond.right = Some(three);
    let cond = ast.push(cond);

    let incr = ast.push(Node::new(NodeKind::Empty, 3));
    let body = ast.push(Node::new(NodeKind::Block, 3));

    let mut for_node = Node::new(NodeKind::For, 3);
    for_node.init = Some(init_assign);
    for_node.cond = Some(cond);
    for_node.incr = Some(incr);
    for_node.body = Some(body);
    let for_node = ast.push(for_node);

    link(&mut ast, &[decl_i, for_node]);
    let mut block = Node::new(NodeKind::Block, 1);
    block.left = Some(decl_i);
    let block = ast.push(block);

    let mut func = Node::new(NodeKind::FuncDef, 1);
    func.name = Some("loop".into());
    func.left = Some(ret_ty);
    func.body = Some(block);
    let func = ast.push(func);

    let mut gen = IrGenerator::new();
    let program = gen.generate(&ast, Some(func)).unwrap();
    let instrs = &program.functions[0].instructions;

    // The only `Assign` in the whole function is `i = 0`; lowering the
    // `Empty` increment in expression context produces (and discards) a
    // constant-zero operand without pushing any instruction of its own.
    let assign_count = instrs
        .iter()
        .filter(|i| matches!(i, Instruction::Assign { .. }))
        .count();
    assert_eq!(assign_count, 1);
    assert!(!instrs.iter().any(|i| matches!(i, Instruction::BinOp { .. })));
}

/// D. `void g(){ if (1 && 0) { return; } }` -> no errors; the emitted IR
/// sends control to the false label without ever reaching the `return`
/// inside the then-branch.
#[test]
fn scenario_d_short_circuit_and_skips_then_branch() {
    let mut ast = Ast::new();
    let ret_ty = type_node(&mut ast, DataType::Void);

    let mut one = Node::new(NodeKind::ConstInt, 1);
    one.literal = 1;
    let one = ast.push(one);
    let mut zero = Node::new(NodeKind::ConstInt, 1);
    zero.literal = 0;
    let zero = ast.push(zero);
    let mut and = Node::new(NodeKind::BinOp, 1);
    and.bin_op = Some(BinOp::And);
    and.left = Some(one);
    and.right = Some(zero);
    let and = ast.push(and);

    let ret_stmt = ast.push(Node::new(NodeKind::Return, 1));
    let mut then_block = Node::new(NodeKind::Block, 1);
    then_block.left = Some(ret_stmt);
    let then_block = ast.push(then_block);

    let mut if_node = Node::new(NodeKind::If, 1);
    if_node.cond = Some(and);
    if_node.left = Some(then_block);
    let if_node = ast.push(if_node);

    let mut block = Node::new(NodeKind::Block, 1);
    block.left = Some(if_node);
    let block = ast.push(block);

    let mut func = Node::new(NodeKind::FuncDef, 1);
    func.name = Some("g".into());
    func.left = Some(ret_ty);
    func.body = Some(block);
    let func = ast.push(func);

    let mut analyzer = SemanticAnalyzer::new(AnalyzerConfig::default()).unwrap();
    analyzer.analyze(&mut ast, Some(func));
    assert_eq!(analyzer.error_count(), 0);

    let mut gen = IrGenerator::new();
    let program = gen.generate(&ast, Some(func)).unwrap();
    let instrs = &program.functions[0].instructions;

    let then_label = match &instrs[3] {
        Instruction::Label { name } => name.clone(),
        other => panic!("expected the then-label here, got {other:?}"),
    };
    assert!(instrs
        .iter()
        .all(|i| !matches!(i, Instruction::Goto { target } if *target == then_label)));
    assert!(instrs
        .iter()
        .all(|i| !matches!(i, Instruction::IfRel { target, .. } if *target == then_label)));
}
