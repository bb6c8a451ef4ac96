use declare::DeclVisitor;
use derive_visitor::DriveMut;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::TopLevel;
use resolve::ResolveVisitor;
use scope::Scope;
use scope::ScopeType;

pub mod declare;
pub mod identifiers;
pub mod resolve;
pub mod scope;

/// Builds the scope tree for a program and resolves every reference in it, returning the global
/// scope. Scopes, `RefToScope` and `Declaration` are attached to nodes as associated data.
pub fn compute_scopes(top_level_node: &mut Node<TopLevel>) -> Scope {
  let top_level_scope = Scope::new_root(ScopeType::Global);
  let mut decl_visitor = DeclVisitor::new(top_level_scope.clone());
  top_level_node.drive_mut(&mut decl_visitor);
  let mut resolve_visitor = ResolveVisitor::default();
  top_level_node.drive_mut(&mut resolve_visitor);
  top_level_scope
}
