//! Name resolution, type checking, and return-coverage analysis. A
//! top-down walk over `cc_ast::Ast`, one method per node kind, mirroring
//! `semantic.c`'s `analyze_*` functions and their exact diagnostic
//! messages and control-flow quirks (noted inline where the source does
//! something a casual reimplementation would not).

use cc_ast::{Ast, DataType, NodeId, NodeKind};
use cc_util::diagnostic::Handler;

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::scope::ScopeTable;
use crate::symbol::{Symbol, SymbolKind};

pub struct SemanticAnalyzer {
    handler: Handler,
    scopes: ScopeTable,
    /// Return type of the function currently being walked; `None` at
    /// global scope.
    current_function: Option<DataType>,
}

impl SemanticAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Ok(Self {
            handler: Handler::new(),
            scopes: ScopeTable::new(config.table_size)?,
            current_function: None,
        })
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    pub fn error_count(&self) -> usize {
        self.handler.error_count()
    }

    /// Walks the top-level sibling list of global declarations.
    pub fn analyze(&mut self, ast: &mut Ast, root: Option<NodeId>) {
        self.analyze_list(ast, root);
    }

    fn analyze_list(&mut self, ast: &mut Ast, head: Option<NodeId>) -> bool {
        let mut returns = false;
        for id in ast.siblings(head).collect::<Vec<_>>() {
            returns = self.analyze_node(ast, id);
            if returns {
                break;
            }
        }
        returns
    }

    /// Dispatches on node kind. Returns whether this node "definitely
    /// returns" on every control path through it (used by callers that
    /// walk a statement list to detect unreachable-after-return and, at a
    /// function's top level, missing-return coverage).
    fn analyze_node(&mut self, ast: &mut Ast, id: NodeId) -> bool {
        match ast.get(id).kind {
            NodeKind::FuncDef => {
                self.analyze_function(ast, id);
                false
            }
            NodeKind::VarDecl => {
                self.analyze_declaration(ast, id);
                false
            }
            NodeKind::Block => self.analyze_block(ast, id),
            NodeKind::If => self.analyze_if(ast, id),
            NodeKind::While => self.analyze_while(ast, id),
            NodeKind::For => self.analyze_for(ast, id),
            NodeKind::Return => self.analyze_return(ast, id),
            NodeKind::Assign => {
                self.analyze_assign(ast, id);
                false
            }
            NodeKind::BinOp => {
                self.analyze_binary(ast, id);
                false
            }
            NodeKind::UnOp => {
                self.analyze_unary(ast, id);
                false
            }
            NodeKind::ConstInt => {
                ast.get_mut(id).data_type = DataType::Int;
                false
            }
            NodeKind::ConstChar => {
                ast.get_mut(id).data_type = DataType::Char;
                false
            }
            NodeKind::StrLit => {
                ast.get_mut(id).data_type = DataType::Char;
                false
            }
            NodeKind::Var => {
                self.analyze_variable(ast, id);
                false
            }
            NodeKind::FuncCall => {
                self.analyze_function_call(ast, id);
                false
            }
            NodeKind::Type | NodeKind::Param | NodeKind::Empty => false,
        }
    }

    fn analyze_function(&mut self, ast: &mut Ast, id: NodeId) {
        let node = ast.get(id);
        let name = node.name.clone().expect("FuncDef missing name");
        let line = node.line;
        let ret_type_node = node.left.expect("FuncDef missing return type node");
        let ret_type = ast.get(ret_type_node).data_type;
        let params_head = node.params;
        let body = node.body;

        let params: Vec<NodeId> = ast.siblings(params_head).collect();
        let param_types: Vec<DataType> = params
            .iter()
            .map(|&p| {
                let type_id = ast.get(p).left.expect("Param missing type node");
                ast.get(type_id).data_type
            })
            .collect();

        let func_sym = Symbol::function(name, ret_type, line, self.scopes.current_level(), param_types);

        // A redeclared function's body is never analyzed: no scope is
        // entered, parameters are never bound, and the earlier
        // declaration's symbol is left untouched.
        if !self.scopes.insert(func_sym) {
            self.handler.error("Function redeclared", line);
            return;
        }

        self.current_function = Some(ret_type);
        self.scopes.enter_scope();

        for &p in &params {
            let param = ast.get(p);
            let pname = param.name.clone().expect("Param missing name");
            let pline = param.line;
            let type_id = param.left.expect("Param missing type node");
            let ptype = ast.get(type_id).data_type;
            let psym = Symbol::parameter(pname, ptype, pline, self.scopes.current_level());
            if !self.scopes.insert(psym) {
                self.handler.error("Parameter redeclared", pline);
            }
        }

        let body_returns = match body {
            Some(b) => self.analyze_node(ast, b),
            None => false,
        };

        if ret_type != DataType::Void && !body_returns {
            self.handler.error("Non-void function must return a value", line);
        }

        self.scopes.exit_scope();
        self.current_function = None;
    }

    fn analyze_declaration(&mut self, ast: &mut Ast, id: NodeId) {
        let node = ast.get(id);
        let name = node.name.clone().expect("VarDecl missing name");
        let line = node.line;
        let type_id = node.left.expect("VarDecl missing type node");
        let decl_type = ast.get(type_id).data_type;
        let init = node.right;

        let sym = Symbol::variable(name, decl_type, line, self.scopes.current_level());
        // Redeclaration does not skip the initializer: the reference
        // implementation still type-checks it, it just also reports the
        // redeclaration.
        if !self.scopes.insert(sym) {
            self.handler.error("Variable redeclared", line);
        }

        if let Some(rhs) = init {
            self.analyze_node(ast, rhs);
            let rhs_type = ast.get(rhs).data_type;
            if rhs_type != decl_type {
                self.handler.error("Type mismatch in initialization", line);
            }
        }
    }

    fn analyze_block(&mut self, ast: &mut Ast, id: NodeId) -> bool {
        self.scopes.enter_scope();
        let head = ast.get(id).left;
        let returns = self.analyze_list(ast, head);
        self.scopes.exit_scope();
        returns
    }

    fn analyze_if(&mut self, ast: &mut Ast, id: NodeId) -> bool {
        let node = ast.get(id);
        let cond = node.cond.expect("If missing condition");
        let then_branch = node.left.expect("If missing then-branch");
        let else_branch = node.right;
        let line = node.line;

        self.analyze_node(ast, cond);
        self.check_condition_type(ast, cond, line);

        let then_returns = self.analyze_node(ast, then_branch);
        let else_returns = match else_branch {
            Some(e) => self.analyze_node(ast, e),
            None => false,
        };
        then_returns && else_returns
    }

    fn analyze_while(&mut self, ast: &mut Ast, id: NodeId) -> bool {
        let node = ast.get(id);
        let cond = node.cond.expect("While missing condition");
        let body = node.body.expect("While missing body");
        let line = node.line;

        self.analyze_node(ast, cond);
        self.check_condition_type(ast, cond, line);
        self.analyze_node(ast, body);
        // A loop never guarantees a return: the reference treats zero
        // iterations as always reachable, even for `while (1)`.
        false
    }

    fn analyze_for(&mut self, ast: &mut Ast, id: NodeId) -> bool {
        let node = ast.get(id);
        let init = node.init;
        let cond = node.cond;
        let incr = node.incr;
        let body = node.body.expect("For missing body");
        let line = node.line;

        if let Some(i) = init {
            self.analyze_node(ast, i);
        }
        if let Some(c) = cond {
            self.analyze_node(ast, c);
            self.check_condition_type(ast, c, line);
        }
        if let Some(inc) = incr {
            self.analyze_node(ast, inc);
        }
        self.analyze_node(ast, body);
        false
    }

    fn analyze_return(&mut self, ast: &mut Ast, id: NodeId) -> bool {
        let node = ast.get(id);
        let line = node.line;
        let expr = node.left;

        match self.current_function {
            None => self.handler.error("Return outside function", line),
            Some(ret_type) => match expr {
                Some(e) => {
                    self.analyze_node(ast, e);
                    if ast.get(e).data_type != ret_type {
                        self.handler.error("Return type mismatch", line);
                    }
                }
                None => {
                    if ret_type != DataType::Void {
                        self.handler.error("Return type mismatch", line);
                    }
                }
            },
        }
        true
    }

    fn analyze_assign(&mut self, ast: &mut Ast, id: NodeId) {
        let node = ast.get(id);
        let target = node.left.expect("Assign missing target");
        let value = node.right.expect("Assign missing value");
        let line = node.line;

        self.analyze_node(ast, target);
        self.analyze_node(ast, value);

        let lhs_type = ast.get(target).data_type;
        let rhs_type = ast.get(value).data_type;
        // Void on either side means an earlier error already fired for
        // that operand; suppress the cascade instead of also reporting a
        // mismatch here.
        if lhs_type == DataType::Void || rhs_type == DataType::Void {
            return;
        }
        if lhs_type != rhs_type {
            self.handler.error("Assignment type mismatch", line);
        }
        ast.get_mut(id).data_type = lhs_type;
    }

    fn analyze_binary(&mut self, ast: &mut Ast, id: NodeId) {
        let node = ast.get(id);
        let left = node.left.expect("BinOp missing left operand");
        let right = node.right.expect("BinOp missing right operand");
        let line = node.line;

        self.analyze_node(ast, left);
        self.analyze_node(ast, right);

        let lt = ast.get(left).data_type;
        let rt = ast.get(right).data_type;
        if lt == DataType::Void || rt == DataType::Void {
            return;
        }
        if lt != rt {
            self.handler.error("Binary operand type mismatch", line);
        }
        ast.get_mut(id).data_type = lt;
    }

    fn analyze_unary(&mut self, ast: &mut Ast, id: NodeId) {
        let operand = ast.get(id).left.expect("UnOp missing operand");
        self.analyze_node(ast, operand);
        let t = ast.get(operand).data_type;
        ast.get_mut(id).data_type = t;
    }

    fn analyze_variable(&mut self, ast: &mut Ast, id: NodeId) {
        let node = ast.get(id);
        let name = node.name.clone().expect("Var missing name");
        let line = node.line;

        match self.scopes.lookup(&name) {
            Some(sym) => {
                let t = sym.data_type;
                ast.get_mut(id).data_type = t;
            }
            None => {
                self.handler.error("Undeclared variable", line);
                // The reference defaults an unresolved variable to `int`
                // rather than leaving it untyped, so a later binary or
                // assignment involving it doesn't also report a spurious
                // type mismatch.
                ast.get_mut(id).data_type = DataType::Int;
            }
        }
    }

    fn analyze_function_call(&mut self, ast: &mut Ast, id: NodeId) {
        let node = ast.get(id);
        let name = node.name.clone().expect("FuncCall missing name");
        let line = node.line;
        let args_head = node.left;

        let func = self
            .scopes
            .lookup(&name)
            .filter(|s| s.kind == SymbolKind::Function)
            .cloned();

        let Some(func) = func else {
            self.handler.error("Undeclared function", line);
            // Unlike an undeclared variable, the call's type is left
            // unset here: there is no return type to default to.
            return;
        };

        let args: Vec<NodeId> = ast.siblings(args_head).collect();
        for (i, &arg) in args.iter().enumerate() {
            self.analyze_node(ast, arg);
            let arg_type = ast.get(arg).data_type;
            if i >= func.param_types.len() {
                self.handler.error("Too many arguments", line);
            } else if arg_type != func.param_types[i] {
                self.handler.error("Argument type mismatch", line);
            }
        }
        if args.len() < func.param_types.len() {
            self.handler.error("Too few arguments", line);
        }
        ast.get_mut(id).data_type = func.data_type;
    }

    fn check_condition_type(&self, ast: &Ast, cond: NodeId, line: u32) {
        if ast.get(cond).data_type == DataType::Void {
            self.handler.error("Invalid condition type", line);
        }
    }
}
