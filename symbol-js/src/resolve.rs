use crate::scope::Scope;
use derive_visitor::VisitorMut;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::node::Node;
use parse_js::ast::node::NodeId;

type IdExprNode = Node<IdExpr>;

/// The scope a reference resolved to. Later passes may repoint it when they move the binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefToScope(pub Scope);

/// The node that declares the binding a reference resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Declaration(pub NodeId);

/// Resolves every `IdExpr` against the declared scope tree. The reference's name is marked as
/// propagating through every scope between the reference and the declaring scope, or up to and
/// including the root if it does not resolve.
#[derive(Default, VisitorMut)]
#[visitor(IdExprNode(enter))]
pub struct ResolveVisitor {
  unresolved: usize,
}

impl ResolveVisitor {
  pub fn unresolved(&self) -> usize {
    self.unresolved
  }

  pub fn enter_id_expr_node(&mut self, node: &mut IdExprNode) {
    let Some(usage_scope) = node.assoc.get::<Scope>().cloned() else {
      return;
    };
    let name = node.stx.name.as_str();
    let resolved = usage_scope.find_binding(name);
    for scope in usage_scope.self_and_ancestors() {
      if resolved.as_ref().is_some_and(|(decl_scope, _)| decl_scope == &scope) {
        break;
      };
      scope.mark_propagated(name);
    }
    match resolved {
      Some((decl_scope, binding)) => {
        node.assoc.set(RefToScope(decl_scope));
        node.assoc.set(Declaration(binding.node));
      }
      None => {
        self.unresolved += 1;
      }
    };
  }
}
