use derive_visitor::Drive;
use derive_visitor::Visitor;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::node::Node;
use parse_js::ast::node::NodeId;
use parse_js::parse;
use symbol_js::compute_scopes;
use symbol_js::resolve::Declaration;
use symbol_js::resolve::RefToScope;
use symbol_js::scope::BindingKind;
use symbol_js::scope::Scope;
use symbol_js::scope::ScopeType;

type IdPatNode = Node<IdPat>;
type IdExprNode = Node<IdExpr>;

#[derive(Default, Visitor)]
#[visitor(IdPatNode(enter), IdExprNode(enter))]
struct ScopeCollector {
  name: &'static str,
  decl_scope: Option<Scope>,
  decl_node: Option<NodeId>,
  use_scope: Option<Scope>,
  resolved: Option<(Scope, NodeId)>,
}

impl ScopeCollector {
  fn new(name: &'static str) -> ScopeCollector {
    ScopeCollector {
      name,
      ..Default::default()
    }
  }

  pub fn enter_id_pat_node(&mut self, node: &IdPatNode) {
    if node.stx.name == self.name {
      self.decl_scope = Some(node.assoc.get::<Scope>().unwrap().clone());
      self.decl_node = Some(node.id);
    }
  }

  pub fn enter_id_expr_node(&mut self, node: &IdExprNode) {
    if node.stx.name == self.name {
      self.use_scope = Some(node.assoc.get::<Scope>().unwrap().clone());
      self.resolved = node.assoc.get::<RefToScope>().map(|r| {
        (r.0.clone(), node.assoc.get::<Declaration>().unwrap().0)
      });
    }
  }
}

struct T {
  typ: ScopeType,
  bindings: Vec<(&'static str, BindingKind)>,
  children: Vec<T>,
}

fn t(typ: ScopeType, bindings: Vec<(&'static str, BindingKind)>, children: Vec<T>) -> T {
  T {
    typ,
    bindings,
    children,
  }
}

fn check_scope_tree(s: &Scope, m: &T) {
  let sd = s.data();
  assert_eq!(sd.typ(), m.typ);
  let names = sd.binding_names().cloned().collect::<Vec<_>>();
  let expected = m.bindings.iter().map(|(n, _)| n.to_string()).collect::<Vec<_>>();
  assert_eq!(names, expected);
  for (name, kind) in m.bindings.iter() {
    assert_eq!(sd.get_binding(name).unwrap().kind, *kind, "kind of {name}");
  }
  assert_eq!(sd.children().len(), m.children.len());
  for (i, c) in sd.children().iter().enumerate() {
    check_scope_tree(c, &m.children[i]);
  }
}

#[test]
fn resolves_outer_let_with_declaration_scope() {
  let mut top_level = parse(
    r#"
      function outer() {
        let value = 1;
        return function inner() {
          return value;
        };
      }
    "#,
  )
  .unwrap();

  compute_scopes(&mut top_level);

  let mut collector = ScopeCollector::new("value");
  top_level.drive(&mut collector);

  let decl_scope = collector.decl_scope.expect("declaration scope captured");
  let use_scope = collector.use_scope.expect("usage scope captured");
  assert_ne!(decl_scope, use_scope, "declaration should be in an outer closure");

  let (resolved_scope, decl_node) = collector.resolved.expect("reference should resolve");
  assert_eq!(resolved_scope, decl_scope, "should resolve to the declaration scope");
  assert_eq!(Some(decl_node), collector.decl_node);
  assert!(use_scope.is_propagated("value"));
  assert!(!decl_scope.is_propagated("value"));
}

#[test]
fn builds_scope_tree() {
  let mut top_level = parse(
    r#"
      var a;
      function f(p, {q}) {
        for (let i = 0; i < p; i++) {
          const c = i;
          var v;
        }
        try {} catch (e) { let d; }
        (function g() {});
        while (p) p--;
      }
      { let b; }
    "#,
  )
  .unwrap();
  let global = compute_scopes(&mut top_level);

  use BindingKind::*;
  use ScopeType::*;
  check_scope_tree(
    &global,
    &t(Global, vec![("a", Var), ("f", Function)], vec![
      t(ScopeType::Function, vec![("p", Param), ("q", Param), ("v", Var)], vec![
        t(Loop, vec![("i", Let)], vec![t(Block, vec![("c", Const)], vec![])]),
        t(Block, vec![], vec![]),
        t(Block, vec![("e", Catch), ("d", Let)], vec![]),
        t(Block, vec![("g", Function)], vec![t(ScopeType::Function, vec![], vec![])]),
        t(Loop, vec![], vec![]),
      ]),
      t(Block, vec![("b", Let)], vec![]),
    ]),
  );
}

#[test]
fn unresolved_references_propagate_to_root() {
  let mut top_level = parse(
    r#"
      function f() {
        { let x; }
        g(function () { return x; });
      }
    "#,
  )
  .unwrap();
  let global = compute_scopes(&mut top_level);

  let mut collector = ScopeCollector::new("x");
  top_level.drive(&mut collector);
  assert!(collector.resolved.is_none());

  let f = global.data().children()[0].clone();
  let block = f.data().children()[0].clone();
  let closure = collector.use_scope.unwrap();
  assert!(global.is_propagated("x"));
  assert!(f.is_propagated("x"));
  assert!(closure.is_propagated("x"));
  assert!(!block.is_propagated("x"));
  assert!(block.owns_binding("x"));
}

#[test]
fn resolves_forward_references() {
  let mut top_level = parse(
    r#"
      {
        function read() { return later; }
        let later = 1;
      }
    "#,
  )
  .unwrap();
  compute_scopes(&mut top_level);

  let mut collector = ScopeCollector::new("later");
  top_level.drive(&mut collector);
  let (resolved_scope, _) = collector.resolved.expect("forward reference should resolve");
  assert_eq!(Some(resolved_scope), collector.decl_scope);
  assert_eq!(collector.decl_scope.unwrap().typ(), ScopeType::Block);
}

#[test]
fn catch_params_and_block_functions_are_reserved_in_hoist_target() {
  let mut top_level = parse(
    r#"
      function f() {
        try {} catch (e) {}
        { function h() {} }
        var outer = function named() {};
      }
    "#,
  )
  .unwrap();
  let global = compute_scopes(&mut top_level);

  let f = global.data().children()[0].clone();
  assert!(f.is_propagated("e"));
  assert!(!f.owns_binding("e"));
  assert!(f.is_propagated("h"));
  // Function declarations directly in a hoist target are ordinary bindings there.
  assert!(!global.is_propagated("f"));
  // A function expression's name is only visible inside the expression.
  assert!(!f.is_propagated("named"));
}
