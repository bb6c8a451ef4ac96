use derive_visitor::visitor_enter_fn;
use derive_visitor::Drive;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::pat::Pat;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::node::Node;
use parse_js::ast::node::NodeId;
use parse_js::ast::stmt::decl::VarDeclMode;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::TopLevel;
use parse_js::loc::Loc;
use parse_js::parse;
use similar::ChangeTag;
use similar::TextDiff;
use symbol_js::compute_scopes;
use symbol_js::identifiers::Identifiers;
use symbol_js::resolve::RefToScope;
use symbol_js::scope::BindingKind;
use symbol_js::scope::Scope;
use symbol_js::scope::ScopeType;
use varify_js::err::VarifyError;
use varify_js::let_const::LetConst;
use varify_js::let_const::Moves;
use varify_js::let_const::RenameTarget;
use varify_js::options::Options;
use varify_js::options::ScopeOptions;
use varify_js::patch::Patches;
use varify_js::stats::Stats;
use varify_js::varify;

fn assert_same(expected: &str, actual: &str) {
  if expected == actual {
    return;
  };
  let mut msg = "output differs:\n".to_string();
  let diff = TextDiff::from_lines(expected, actual);
  for change in diff.iter_all_changes() {
    let sign = match change.tag() {
      ChangeTag::Delete => "-",
      ChangeTag::Insert => "+",
      ChangeTag::Equal => " ",
    };
    msg.push_str(sign);
    msg.push_str(change.as_str().unwrap());
    if change.missing_newline() {
      msg.push('\n');
    };
  }
  panic!("{}", msg);
}

fn check(source: &str, expected: &str) {
  let output = varify(source, &Options::default()).unwrap();
  assert_same(expected, &output.code);
}

struct Run {
  top_level: Node<TopLevel>,
  top_scope: Scope,
  let_const: LetConst,
  patches: Patches,
  stats: Stats,
  result: Result<(), VarifyError>,
}

impl Run {
  fn output(&self, source: &str) -> String {
    self.result.clone().unwrap();
    self.patches.apply(source).unwrap()
  }
}

// Runs one pass with full control over the tree, scopes and transform state.
fn run_with(source: &str, prepare: impl FnOnce(&Node<TopLevel>, &Scope, &mut LetConst)) -> Run {
  let mut top_level = parse(source).unwrap();
  let top_scope = compute_scopes(&mut top_level);
  let mut identifiers = Identifiers::from_top_level(&top_level);
  let mut let_const = LetConst::new(Options::default());
  prepare(&top_level, &top_scope, &mut let_const);
  let mut patches = Patches::new();
  let mut stats = Stats::default();
  let result = let_const
    .setup(&mut patches, &mut stats, &mut identifiers, source)
    .run(&mut top_level, &top_scope);
  Run {
    top_level,
    top_scope,
    let_const,
    patches,
    stats,
    result,
  }
}

fn all_scopes(top_scope: &Scope) -> Vec<Scope> {
  let mut scopes = vec![top_scope.clone()];
  scopes.extend(top_scope.descendants());
  scopes
}

fn no_moves_left(top_scope: &Scope) -> bool {
  all_scopes(top_scope)
    .iter()
    .all(|s| s.data().get_assoc::<Moves>().is_none())
}

fn id_pat(top_level: &Node<TopLevel>, name: &str) -> NodeId {
  let mut found = None;
  top_level.drive(&mut visitor_enter_fn(|node: &Node<IdPat>| {
    if node.stx.name == name {
      found = Some(node.id);
    };
  }));
  found.unwrap()
}

#[test]
fn scenario_loop_body_let_is_renamed_and_initialized() {
  let source = r#"function f(x) {
  for (var i = 0; i < 3; i++) {
    let x;
    if (x === void 0) x = i;
    g(x);
  }
  return x;
}"#;
  let output = varify(source, &Options::default()).unwrap();
  assert_same(
    r#"function f(x) {
  for (var i = 0; i < 3; i++) {
    var x$1 = void 0;
    if (x$1 === void 0) x$1 = i;
    g(x$1);
  }
  return x;
}"#,
    &output.code,
  );
  assert_eq!(output.stats.lets, 1);
  assert_eq!(output.stats.consts, 0);
  assert_eq!(output.stats.renames.len(), 1);
  assert_eq!(output.stats.renames[0].old, "x");
  assert_eq!(output.stats.renames[0].new, "x$1");
  assert_eq!(output.stats.renames[0].line, 3);
}

#[test]
fn scenario_function_top_level_destructuring_is_left_in_place() {
  let source = r#"function f(obj) {
  const {a, b} = obj;
  return a + b;
}"#;
  let run = run_with(source, |_, _, _| {});
  assert_same(
    r#"function f(obj) {
  var {a, b} = obj;
  return a + b;
}"#,
    &run.output(source),
  );
  let func = run.top_scope.data().children()[0].clone();
  assert_eq!(func.get_binding("a").unwrap().kind, BindingKind::Var);
  assert_eq!(func.get_binding("b").unwrap().kind, BindingKind::Var);
  assert!(run.stats.renames.is_empty());
  assert_eq!(run.stats.consts, 2);
  assert_eq!(
    run.let_const.original_kind(id_pat(&run.top_level, "a")),
    Some(VarDeclMode::Const)
  );
}

#[test]
fn hoisted_bindings_move_out_of_block() {
  let source = "function f() { { let p, q = 1; g(p, q); } }";
  let run = run_with(source, |_, _, _| {});
  assert_same(
    "function f() { { var p, q = 1; g(p, q); } }",
    &run.output(source),
  );
  let func = run.top_scope.data().children()[0].clone();
  let block = func.data().children()[0].clone();
  assert_eq!(block.typ(), ScopeType::Block);
  assert_eq!(block.data().binding_count(), 0);
  let names = func.data().binding_names().cloned().collect::<Vec<_>>();
  assert_eq!(names, vec!["p", "q"]);
}

#[test]
fn loop_hazard_initializer() {
  check(
    "while (c) { let x; g(x); }",
    "while (c) { var x = void 0; g(x); }",
  );
  check(
    "for (let i = 0, j; i < 2; i++) {}",
    "for (var i = 0, j = void 0; i < 2; i++) {}",
  );
  check(
    "for (const k in o) { let v = o[k]; }",
    "for (var k in o) { var v = o[k]; }",
  );
  check("{ let x; g(x); }", "{ var x; g(x); }");
  check(
    "do { let x; g(x); } while (c);",
    "do { var x = void 0; g(x); } while (c);",
  );
  check(
    "while (n) { let half = n >>> 1, rest; n >>= 1; g(half << 1, rest); }",
    "while (n) { var half = n >>> 1, rest = void 0; n >>= 1; g(half << 1, rest); }",
  );
}

#[test]
fn intermediate_scope_bindings_force_rename() {
  let source = r#"function f() {
  try { throw 1; } catch (e) {
    { let e = 2; g(e); }
    return e;
  }
}"#;
  check(
    source,
    r#"function f() {
  try { throw 1; } catch (e) {
    { var e$1 = 2; g(e$1); }
    return e;
  }
}"#,
  );
  check(
    "function f() { { function h() {} { let h = 1; g(h); } h(); } }",
    "function f() { { function h() {} { var h$1 = 1; g(h$1); } h(); } }",
  );
}

#[test]
fn destructuring_leaves_rename_independently() {
  check(
    r#"let a = 1, c = 2;
function f(o) {
  {
    const {a, b: c} = o;
    g(a, c);
  }
  return [a, c];
}"#,
    r#"var a = 1, c = 2;
function f(o) {
  {
    var {a: a$1, b: c$1} = o;
    g(a$1, c$1);
  }
  return [a, c];
}"#,
  );
  check(
    "function f(a, o) { if (a) { const {a = 1, ...r} = o; g(a, r); } }",
    "function f(a, o) { if (a) { var {a: a$1 = 1, ...r} = o; g(a$1, r); } }",
  );
  check(
    "var y;\nfor (const x of xs) { let [y, , ...z] = x; h(y, z); }",
    "var y;\nfor (var x of xs) { var [y$1, , ...z] = x; h(y$1, z); }",
  );
}

#[test]
fn forward_references_are_rewritten() {
  check(
    r#"function f(v) {
  {
    function read() { return v; }
    let v = 1;
    return read();
  }
}"#,
    r#"function f(v) {
  {
    function read() { return v$1; }
    var v$1 = 1;
    return read();
  }
}"#,
  );
}

#[test]
fn shorthand_members_keep_their_key() {
  check(
    "function f(x) { if (x) { const x = 2; return {x, y: x}; } }",
    "function f(x) { if (x) { var x$1 = 2; return {x: x$1, y: x$1}; } }",
  );
  check(
    "function f(x) { { const o = () => ({x}); let x = 1; } }",
    "function f(x) { { var o = () => ({x: x$1}); var x$1 = 1; } }",
  );
}

#[test]
fn captured_outer_names_force_rename() {
  check(
    "function f() { { let x = 1; g(x); } return function () { return x; }; }",
    "function f() { { var x$1 = 1; g(x$1); } return function () { return x; }; }",
  );
}

#[test]
fn references_point_at_hoist_scope() {
  let source = "function f(x) { while (x) { let x = 0; x++; g(x); } }";
  let run = run_with(source, |_, _, _| {});
  assert_same(
    "function f(x) { while (x) { var x$1 = 0; x$1++; g(x$1); } }",
    &run.output(source),
  );
  let func = run.top_scope.data().children()[0].clone();
  let mut renamed = 0;
  run.top_level.drive(&mut visitor_enter_fn(|node: &Node<IdExpr>| {
    if node.stx.name == "x$1" {
      renamed += 1;
      assert_eq!(node.assoc.get::<RefToScope>(), Some(&RefToScope(func.clone())));
    };
  }));
  assert_eq!(renamed, 2);
  assert!(func.owns_binding("x$1"));
}

#[test]
fn scope_options_opt_out() {
  let source = r#"function f(x) { { let x = 1; g(x); } }
function h(y) { { let y = 1; g(y); } }"#;
  let run = run_with(source, |_, top_scope, _| {
    let f = top_scope.data().children()[0].clone();
    f.data_mut().set_assoc(ScopeOptions {
      let_const: Some(false),
    });
  });
  assert_same(
    r#"function f(x) { { let x = 1; g(x); } }
function h(y) { { var y$1 = 1; g(y$1); } }"#,
    &run.output(source),
  );

  let source = "{ let a; }";
  let options = Options {
    let_const: false,
    ..Options::default()
  };
  assert_eq!(varify(source, &options).unwrap().code, source);
}

#[test]
fn rename_separator_option() {
  let options = Options::from_json(r#"{"rename-separator": "_"}"#).unwrap();
  let output = varify("function f(a) { { let a; } }", &options).unwrap();
  assert_eq!(output.code, "function f(a) { { var a_1; } }");
}

#[test]
fn forced_renames() {
  let source = "function f() { let a = 1, b = 2; return a + b; }";
  let run = run_with(source, |top_level, _, let_const| {
    let b = id_pat(top_level, "b");
    let_const
      .mark_for_renaming(RenameTarget::Declaration(b))
      .unwrap();
    top_level.drive(&mut visitor_enter_fn(|node: &Node<IdExpr>| {
      if node.stx.name == "a" {
        let_const
          .mark_for_renaming(RenameTarget::Reference(node))
          .unwrap();
      };
    }));
    assert!(let_const.is_marked_for_renaming(b));
    assert!(let_const.is_marked_for_renaming(id_pat(top_level, "a")));
  });
  assert_same(
    "function f() { var a$1 = 1, b$1 = 2; return a$1 + b$1; }",
    &run.output(source),
  );
  assert_eq!(run.stats.renames.len(), 2);
}

#[test]
fn forced_rename_of_unresolved_reference_is_fatal() {
  let mut top_level = parse("g();").unwrap();
  compute_scopes(&mut top_level);
  let mut let_const = LetConst::new(Options::default());
  let mut result = None;
  top_level.drive(&mut visitor_enter_fn(|node: &Node<IdExpr>| {
    result = Some(let_const.mark_for_renaming(RenameTarget::Reference(node)));
  }));
  assert_eq!(
    result.unwrap(),
    Err(VarifyError::UnresolvedReference(Loc(0, 1)))
  );
}

#[test]
fn missing_scope_is_fatal() {
  let source = "let x = 1;";
  let mut top_level = parse(source).unwrap();
  let top_scope = Scope::new_root(ScopeType::Global);
  let mut identifiers = Identifiers::new();
  let mut let_const = LetConst::new(Options::default());
  let mut patches = Patches::new();
  let mut stats = Stats::default();
  let err = let_const
    .setup(&mut patches, &mut stats, &mut identifiers, source)
    .run(&mut top_level, &top_scope)
    .unwrap_err();
  assert!(matches!(err, VarifyError::MissingScope(_)));
  assert_eq!(err.loc().map(|l| l.0), Some(0));
}

#[test]
fn non_binding_declarator_is_fatal() {
  let source = "let x = 1; let y = x;";
  let mut top_level = parse(source).unwrap();
  let top_scope = compute_scopes(&mut top_level);
  // Swap the first binding for an assignment target, as a broken upstream pass might.
  let Stmt::VarDecl(decl) = top_level.stx.body[0].stx.as_mut() else {
    panic!("expected declaration");
  };
  let pat = &mut decl.stx.declarators[0].pattern.stx.pat;
  let loc = pat.loc;
  *pat = Node::new(
    loc,
    Pat::AssignTarget(Node::new(loc, IdExpr { name: "x".to_string() }).into_wrapped()),
  );

  let mut identifiers = Identifiers::from_top_level(&top_level);
  let mut let_const = LetConst::new(Options::default());
  let mut patches = Patches::new();
  let mut stats = Stats::default();
  let err = let_const
    .setup(&mut patches, &mut stats, &mut identifiers, source)
    .run(&mut top_level, &top_scope)
    .unwrap_err();
  assert_eq!(err, VarifyError::NotABinding(loc));
  // Later declarations are not visited after the error.
  assert_eq!(stats.lets, 0);
  assert!(no_moves_left(&top_scope));
}

#[test]
fn non_binding_shorthand_property_is_fatal() {
  let source = "{ let {a} = o; }";
  let mut top_level = parse(source).unwrap();
  let top_scope = compute_scopes(&mut top_level);
  let Stmt::Block(block) = top_level.stx.body[0].stx.as_mut() else {
    panic!("expected block");
  };
  let Stmt::VarDecl(decl) = block.stx.body[0].stx.as_mut() else {
    panic!("expected declaration");
  };
  let Pat::Obj(obj) = decl.stx.declarators[0].pattern.stx.pat.stx.as_mut() else {
    panic!("expected object pattern");
  };
  let target = &mut obj.stx.properties[0].stx.target;
  let loc = target.loc;
  *target = Node::new(
    loc,
    Pat::AssignTarget(Node::new(loc, IdExpr { name: "a".to_string() }).into_wrapped()),
  );

  let mut identifiers = Identifiers::from_top_level(&top_level);
  let mut let_const = LetConst::new(Options::default());
  let mut patches = Patches::new();
  let mut stats = Stats::default();
  let err = let_const
    .setup(&mut patches, &mut stats, &mut identifiers, source)
    .run(&mut top_level, &top_scope)
    .unwrap_err();
  assert_eq!(err, VarifyError::NotABinding(loc));
  assert_eq!(err.loc(), Some(Loc(7, 8)));
}

#[test]
fn reference_rename_can_be_deactivated() {
  let source = "function f(x) { { let x = 1; g(x); x++; } }";
  let mut run = run_with(source, |_, _, _| {});
  let mut references = Vec::new();
  run.top_level.drive(&mut visitor_enter_fn(|node: &Node<IdExpr>| {
    if node.stx.name == "x$1" {
      references.push(node.id);
    };
  }));
  assert_eq!(references.len(), 2);
  let rename = run.let_const.reference_rename(references[1]).unwrap();
  assert_eq!(rename.original_name, "x");
  assert!(run.patches.is_active(rename.patch));

  // Another transform takes over spelling the second reference.
  assert!(run
    .let_const
    .deactivate_reference_rename(references[1], &mut run.patches));
  assert!(!run
    .let_const
    .deactivate_reference_rename(id_pat(&run.top_level, "x$1"), &mut run.patches));
  assert_same(
    "function f(x) { { var x$1 = 1; g(x$1); x++; } }",
    &run.output(source),
  );
}

#[test]
fn repeated_passes_leave_no_moves() {
  let source = "function f(x) { for (;;) { let x; g(x); } }";
  let mut top_level = parse(source).unwrap();
  let top_scope = compute_scopes(&mut top_level);
  let mut identifiers = Identifiers::from_top_level(&top_level);
  let mut let_const = LetConst::new(Options::default());
  let_const.reset(&top_scope);
  assert!(no_moves_left(&top_scope));

  let mut first = Patches::new();
  let mut stats = Stats::default();
  let mut pass = let_const.setup(&mut first, &mut stats, &mut identifiers, source);
  pass.before(&top_scope);
  assert!(no_moves_left(&top_scope));
  pass.run(&mut top_level, &top_scope).unwrap();
  assert!(no_moves_left(&top_scope));
  assert_eq!(
    first.apply(source).unwrap(),
    "function f(x) { for (;;) { var x$1 = void 0; g(x$1); } }"
  );

  let mut second = Patches::new();
  let mut stats = Stats::default();
  let_const
    .setup(&mut second, &mut stats, &mut identifiers, source)
    .run(&mut top_level, &top_scope)
    .unwrap();
  assert!(no_moves_left(&top_scope));
  assert!(second.is_empty());
  assert_eq!(stats, Stats::default());
}

#[test]
fn syntax_errors_are_reported() {
  let err = varify("let = ;", &Options::default()).unwrap_err();
  assert!(matches!(err, VarifyError::Syntax(_)));
  assert!(err.loc().is_some());
}
