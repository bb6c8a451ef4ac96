use crate::scope::BindingKind;
use crate::scope::Scope;
use crate::scope::ScopeType;
use derive_visitor::VisitorMut;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::FuncExpr;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::func::Func;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::decl::FuncDecl;
use parse_js::ast::stmt::decl::ParamDecl;
use parse_js::ast::stmt::decl::VarDecl;
use parse_js::ast::stmt::BlockStmt;
use parse_js::ast::stmt::CatchBlock;
use parse_js::ast::stmt::DoWhileStmt;
use parse_js::ast::stmt::ForInStmt;
use parse_js::ast::stmt::ForOfStmt;
use parse_js::ast::stmt::ForTripleStmt;
use parse_js::ast::stmt::WhileStmt;

type BlockStmtNode = Node<BlockStmt>;
type CatchBlockNode = Node<CatchBlock>;
type DoWhileStmtNode = Node<DoWhileStmt>;
type ForInStmtNode = Node<ForInStmt>;
type ForOfStmtNode = Node<ForOfStmt>;
type ForTripleStmtNode = Node<ForTripleStmt>;
type FuncDeclNode = Node<FuncDecl>;
type FuncExprNode = Node<FuncExpr>;
type FuncNode = Node<Func>;
type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;
type ParamDeclNode = Node<ParamDecl>;
type VarDeclNode = Node<VarDecl>;
type WhileStmtNode = Node<WhileStmt>;

/// Builds the scope tree and declares every binding. Every `VarDecl`, `IdPat`, `IdExpr` and
/// declared function name gets the scope it appears in attached as associated data.
///
/// References are not resolved here, since a reference may precede its declaration.
#[derive(VisitorMut)]
#[visitor(
  BlockStmtNode(enter, exit),
  CatchBlockNode(enter, exit),
  DoWhileStmtNode(enter, exit),
  ForInStmtNode(enter, exit),
  ForOfStmtNode(enter, exit),
  ForTripleStmtNode(enter, exit),
  FuncDeclNode(enter),
  FuncExprNode(enter, exit),
  FuncNode(enter, exit),
  IdExprNode(enter),
  IdPatNode(enter),
  ParamDeclNode(enter, exit),
  VarDeclNode(enter, exit),
  WhileStmtNode(enter, exit)
)]
pub struct DeclVisitor {
  scope_stack: Vec<Scope>,
  // Kind of the declaration whose patterns are currently being visited.
  kind_stack: Vec<BindingKind>,
}

impl DeclVisitor {
  pub fn new(top_level_scope: Scope) -> DeclVisitor {
    DeclVisitor {
      scope_stack: vec![top_level_scope],
      kind_stack: Vec::new(),
    }
  }

  fn scope(&self) -> &Scope {
    // The top level scope is never popped.
    &self.scope_stack[self.scope_stack.len() - 1]
  }

  fn push_scope(&mut self, typ: ScopeType) {
    let scope = self.scope().create_child_scope(typ);
    self.scope_stack.push(scope);
  }

  // A `var` of the same name hoisted past `scope` would assign to this binding instead of
  // declaring a new one, so the name is marked as used in the hoist target.
  fn shield_from_hoisting(scope: &Scope, name: &str) {
    if !scope.typ().is_hoist_target() {
      scope.closest_hoist_target().mark_propagated(name);
    };
  }

  fn pop_scope(&mut self) {
    debug_assert!(self.scope_stack.len() > 1);
    self.scope_stack.pop();
  }

  pub fn enter_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.push_scope(ScopeType::Block);
  }

  pub fn exit_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.pop_scope();
  }

  pub fn enter_catch_block_node(&mut self, _node: &mut CatchBlockNode) {
    self.push_scope(ScopeType::Block);
    self.kind_stack.push(BindingKind::Catch);
  }

  pub fn exit_catch_block_node(&mut self, _node: &mut CatchBlockNode) {
    self.kind_stack.pop();
    self.pop_scope();
  }

  pub fn enter_do_while_stmt_node(&mut self, _node: &mut DoWhileStmtNode) {
    self.push_scope(ScopeType::Loop);
  }

  pub fn exit_do_while_stmt_node(&mut self, _node: &mut DoWhileStmtNode) {
    self.pop_scope();
  }

  pub fn enter_for_in_stmt_node(&mut self, _node: &mut ForInStmtNode) {
    self.push_scope(ScopeType::Loop);
  }

  pub fn exit_for_in_stmt_node(&mut self, _node: &mut ForInStmtNode) {
    self.pop_scope();
  }

  pub fn enter_for_of_stmt_node(&mut self, _node: &mut ForOfStmtNode) {
    self.push_scope(ScopeType::Loop);
  }

  pub fn exit_for_of_stmt_node(&mut self, _node: &mut ForOfStmtNode) {
    self.pop_scope();
  }

  pub fn enter_for_triple_stmt_node(&mut self, _node: &mut ForTripleStmtNode) {
    self.push_scope(ScopeType::Loop);
  }

  pub fn exit_for_triple_stmt_node(&mut self, _node: &mut ForTripleStmtNode) {
    self.pop_scope();
  }

  pub fn enter_while_stmt_node(&mut self, _node: &mut WhileStmtNode) {
    self.push_scope(ScopeType::Loop);
  }

  pub fn exit_while_stmt_node(&mut self, _node: &mut WhileStmtNode) {
    self.pop_scope();
  }

  // The name belongs to the enclosing scope; the function's own scope is created when its `Func`
  // is entered.
  pub fn enter_func_decl_node(&mut self, node: &mut FuncDeclNode) {
    let scope = self.scope().clone();
    if let Some(name) = node.stx.name.as_mut() {
      scope.add_binding(&name.stx.name, BindingKind::Function, name.id, name.loc.1);
      Self::shield_from_hoisting(&scope, &name.stx.name);
      name.assoc.set(scope);
    };
  }

  // A named function expression's name is visible only inside it, so it gets a scope of its own
  // between the enclosing scope and the function scope.
  pub fn enter_func_expr_node(&mut self, node: &mut FuncExprNode) {
    self.push_scope(ScopeType::Block);
    let scope = self.scope().clone();
    if let Some(name) = node.stx.name.as_mut() {
      scope.add_binding(&name.stx.name, BindingKind::Function, name.id, name.loc.1);
      name.assoc.set(scope);
    };
  }

  pub fn exit_func_expr_node(&mut self, _node: &mut FuncExprNode) {
    self.pop_scope();
  }

  pub fn enter_func_node(&mut self, _node: &mut FuncNode) {
    self.push_scope(ScopeType::Function);
  }

  pub fn exit_func_node(&mut self, _node: &mut FuncNode) {
    self.pop_scope();
  }

  pub fn enter_param_decl_node(&mut self, _node: &mut ParamDeclNode) {
    self.kind_stack.push(BindingKind::Param);
  }

  pub fn exit_param_decl_node(&mut self, _node: &mut ParamDeclNode) {
    self.kind_stack.pop();
  }

  pub fn enter_var_decl_node(&mut self, node: &mut VarDeclNode) {
    node.assoc.set(self.scope().clone());
    self.kind_stack.push(node.stx.mode.into());
  }

  pub fn exit_var_decl_node(&mut self, _node: &mut VarDeclNode) {
    self.kind_stack.pop();
  }

  pub fn enter_id_expr_node(&mut self, node: &mut IdExprNode) {
    node.assoc.set(self.scope().clone());
  }

  pub fn enter_id_pat_node(&mut self, node: &mut IdPatNode) {
    let scope = self.scope().clone();
    if let Some(&kind) = self.kind_stack.last() {
      let target = match kind {
        BindingKind::Var => scope.closest_hoist_target(),
        _ => scope.clone(),
      };
      target.add_binding(&node.stx.name, kind, node.id, node.loc.1);
      if kind == BindingKind::Catch {
        Self::shield_from_hoisting(&target, &node.stx.name);
      };
    };
    node.assoc.set(scope);
  }
}
