use super::Parser;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::TopLevel;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::parse;
use crate::token::TT;
use serde_json::json;

fn parse_ok(source: &str) -> Node<TopLevel> {
  parse(source).unwrap()
}

fn only_stmt(top: &Node<TopLevel>) -> &Stmt {
  assert_eq!(top.stx.body.len(), 1);
  top.stx.body[0].stx.as_ref()
}

fn only_expr(top: &Node<TopLevel>) -> &Expr {
  match only_stmt(top) {
    Stmt::Expr(e) => e.stx.expr.stx.as_ref(),
    s => panic!("expected expression statement, got {s:?}"),
  }
}

#[test]
fn test_parser() {
  let mut p = Parser::new("let x = 1;").unwrap();
  let cp = p.checkpoint();
  assert_eq!(p.next_tok_i, 0);

  // Peeking doesn't advance.
  let t = p.peek();
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(t.typ, TT::KeywordLet);

  let t = p.consume();
  assert_eq!(p.next_tok_i, 1);
  assert_eq!(t.typ, TT::KeywordLet);

  let t = p.consume();
  assert_eq!(t.typ, TT::Identifier);
  assert_eq!(p.since_checkpoint(&cp), Loc(0, 5));

  p.restore_checkpoint(cp);
  assert_eq!(p.next_tok_i, 0);

  // Reading past the end keeps returning EOF.
  for _ in 0..10 {
    p.consume();
  }
  assert_eq!(p.peek().typ, TT::EOF);
}

#[test]
fn test_var_decl_locations() {
  let source = "function f() {\n  const {a, b: c} = obj;\n}";
  let top = parse_ok(source);
  let Stmt::FunctionDecl(func) = only_stmt(&top) else {
    panic!("expected function");
  };
  let crate::ast::func::FuncBody::Block(body) = &func.stx.function.stx.body else {
    panic!("expected block body");
  };
  let Stmt::VarDecl(decl) = body[0].stx.as_ref() else {
    panic!("expected declaration");
  };
  assert_eq!(decl.stx.mode, VarDeclMode::Const);
  assert_eq!(&source[decl.loc.0..decl.loc.0 + 5], "const");
  let Pat::Obj(obj) = decl.stx.declarators[0].pattern.stx.pat.stx.as_ref() else {
    panic!("expected object pattern");
  };
  let props = &obj.stx.properties;
  assert!(props[0].stx.shorthand);
  assert!(!props[1].stx.shorthand);
  let Pat::Id(c) = props[1].stx.target.stx.as_ref() else {
    panic!("expected identifier target");
  };
  assert_eq!(c.stx.name, "c");
  assert_eq!(&source[c.loc.0..c.loc.1], "c");
}

#[test]
fn test_asi() {
  let top = parse_ok("let a = 1\nlet b = a\nb++\n++a");
  assert_eq!(top.stx.body.len(), 4);
  let top = parse_ok("x = y\n(z)");
  // A parenthesis on the next line continues the expression as a call.
  assert!(matches!(only_expr(&top), Expr::Binary(_)));
}

#[test]
fn test_operator_precedence() {
  let top = parse_ok("a = b + c * d;");
  let Expr::Binary(assign) = only_expr(&top) else {
    panic!("expected assignment");
  };
  assert_eq!(assign.stx.operator, OperatorName::Assignment);
  let Expr::Binary(add) = assign.stx.right.stx.as_ref() else {
    panic!("expected addition");
  };
  assert_eq!(add.stx.operator, OperatorName::Addition);
  assert!(matches!(add.stx.right.stx.as_ref(), Expr::Binary(b) if b.stx.operator == OperatorName::Multiplication));
}

#[test]
fn test_shift_operators() {
  let top = parse_ok("x = a >> 1 + b << c >>> d < e;");
  let Expr::Binary(assign) = only_expr(&top) else {
    panic!("expected assignment");
  };
  // `(((a >> (1 + b)) << c) >>> d) < e`
  let Expr::Binary(lt) = assign.stx.right.stx.as_ref() else {
    panic!("expected comparison");
  };
  assert_eq!(lt.stx.operator, OperatorName::LessThan);
  let Expr::Binary(ushr) = lt.stx.left.stx.as_ref() else {
    panic!("expected unsigned shift");
  };
  assert_eq!(ushr.stx.operator, OperatorName::BitwiseUnsignedRightShift);
  let Expr::Binary(shl) = ushr.stx.left.stx.as_ref() else {
    panic!("expected left shift");
  };
  assert_eq!(shl.stx.operator, OperatorName::BitwiseLeftShift);
  let Expr::Binary(shr) = shl.stx.left.stx.as_ref() else {
    panic!("expected right shift");
  };
  assert_eq!(shr.stx.operator, OperatorName::BitwiseRightShift);
  assert!(matches!(shr.stx.right.stx.as_ref(), Expr::Binary(b) if b.stx.operator == OperatorName::Addition));
}

#[test]
fn test_compound_assignment_operators() {
  for (source, operator) in [
    ("x <<= 1;", OperatorName::AssignmentBitwiseLeftShift),
    ("x >>= 1;", OperatorName::AssignmentBitwiseRightShift),
    ("x >>>= 1;", OperatorName::AssignmentBitwiseUnsignedRightShift),
    ("x **= 2;", OperatorName::AssignmentExponentiation),
    ("x &&= y;", OperatorName::AssignmentLogicalAnd),
    ("x ||= y;", OperatorName::AssignmentLogicalOr),
    ("x ??= y;", OperatorName::AssignmentNullishCoalescing),
  ] {
    let top = parse_ok(source);
    let Expr::Binary(assign) = only_expr(&top) else {
      panic!("expected assignment in {source}");
    };
    assert_eq!(assign.stx.operator, operator, "{source}");
    assert!(matches!(assign.stx.left.stx.as_ref(), Expr::Id(_)), "{source}");
  }
}

#[test]
fn test_destructuring_assignment() {
  let top = parse_ok("[a, {b, c: d = 1}] = e;");
  let Expr::Binary(assign) = only_expr(&top) else {
    panic!("expected assignment");
  };
  let Expr::ArrPat(arr) = assign.stx.left.stx.as_ref() else {
    panic!("expected array pattern target");
  };
  let first = arr.stx.elements[0].as_ref().unwrap();
  assert!(matches!(first.target.stx.as_ref(), Pat::AssignTarget(t) if matches!(t.stx.as_ref(), Expr::Id(_))));
  let second = arr.stx.elements[1].as_ref().unwrap();
  let Pat::Obj(obj) = second.target.stx.as_ref() else {
    panic!("expected nested object pattern");
  };
  assert!(obj.stx.properties[0].stx.shorthand);
  assert!(!obj.stx.properties[1].stx.shorthand);
  assert!(obj.stx.properties[1].stx.default_value.is_some());
}

#[test]
fn test_shorthand_with_default_assignment() {
  let top = parse_ok("({a = 1} = b);");
  let Expr::Binary(assign) = only_expr(&top) else {
    panic!("expected assignment");
  };
  let Expr::ObjPat(obj) = assign.stx.left.stx.as_ref() else {
    panic!("expected object pattern target");
  };
  let prop = &obj.stx.properties[0].stx;
  assert!(prop.shorthand);
  assert!(prop.default_value.is_some());
}

#[test]
fn test_object_literal_members() {
  let top = parse_ok("x = {a, b: 1, c() {}, [d]: 2, ...e};");
  let Expr::Binary(assign) = only_expr(&top) else {
    panic!("expected assignment");
  };
  let Expr::LitObj(obj) = assign.stx.right.stx.as_ref() else {
    panic!("expected object literal");
  };
  let members = &obj.stx.members;
  assert!(matches!(members[0].stx.typ, ObjMemberType::Shorthand { .. }));
  assert!(matches!(members[1].stx.typ, ObjMemberType::Valued { .. }));
  assert!(matches!(members[2].stx.typ, ObjMemberType::Method { .. }));
  assert!(matches!(members[3].stx.typ, ObjMemberType::Valued { .. }));
  assert!(matches!(members[4].stx.typ, ObjMemberType::Rest { .. }));
}

#[test]
fn test_for_statements() {
  let top = parse_ok("for (let i = 0, n = 2; i < n; i++) {}");
  let Stmt::ForTriple(f) = only_stmt(&top) else {
    panic!("expected for");
  };
  let ForTripleStmtInit::Decl(decl) = &f.stx.init else {
    panic!("expected declaration init");
  };
  assert_eq!(decl.stx.declarators.len(), 2);

  let top = parse_ok("for (const k in o) f(k);");
  assert!(matches!(only_stmt(&top), Stmt::ForIn(f) if matches!(f.stx.lhs, ForInOfLhs::Decl(_))));

  let top = parse_ok("for (const [k, v] of entries) {}");
  assert!(matches!(only_stmt(&top), Stmt::ForOf(_)));

  let top = parse_ok("for (x of xs) {}");
  assert!(matches!(only_stmt(&top), Stmt::ForOf(f) if matches!(f.stx.lhs, ForInOfLhs::Assign(_))));

  let top = parse_ok("for (;;) break;");
  assert!(matches!(only_stmt(&top), Stmt::ForTriple(_)));
}

#[test]
fn test_arrow_functions() {
  let top = parse_ok("f = (a, {b} = {}, ...c) => a + b;");
  let Expr::Binary(assign) = only_expr(&top) else {
    panic!("expected assignment");
  };
  let Expr::ArrowFunc(arrow) = assign.stx.right.stx.as_ref() else {
    panic!("expected arrow");
  };
  assert_eq!(arrow.stx.func.stx.parameters.len(), 3);
  assert!(arrow.stx.func.stx.parameters[2].stx.rest);

  let top = parse_ok("g = x => { return x };");
  assert!(matches!(only_expr(&top), Expr::Binary(_)));

  // Parenthesised expressions are still groupings.
  let top = parse_ok("(a, b);");
  assert!(matches!(only_expr(&top), Expr::Binary(b) if b.stx.operator == OperatorName::Comma));
}

#[test]
fn test_try_catch() {
  let top = parse_ok("try { a() } catch ({message}) { log(message) } finally { done() }");
  let Stmt::Try(t) = only_stmt(&top) else {
    panic!("expected try");
  };
  assert!(t.stx.catch.as_ref().unwrap().stx.parameter.is_some());
  assert!(t.stx.finally.is_some());
  let err = parse("try {}").unwrap_err();
  assert_eq!(err.typ, SyntaxErrorType::TryStatementHasNoCatchOrFinally);
}

#[test]
fn test_syntax_errors() {
  assert_eq!(
    parse("1 = 2;").unwrap_err().typ,
    SyntaxErrorType::InvalidAssigmentTarget
  );
  assert_eq!(
    parse("let x = ;").unwrap_err().typ,
    SyntaxErrorType::ExpectedSyntax("expression operand")
  );
  assert_eq!(
    parse("do x(); y").unwrap_err().typ,
    SyntaxErrorType::RequiredTokenNotFound(TT::KeywordWhile)
  );
  assert_eq!(parse("if (a) {").unwrap_err().typ, SyntaxErrorType::UnexpectedEnd);
  assert_eq!(parse("a b").unwrap_err().typ, SyntaxErrorType::ExpectedSyntax("expression operator"));
}

#[test]
fn test_serialize() {
  let top = parse_ok("let x = 1;");
  let value = serde_json::to_value(&top).unwrap();
  assert_eq!(
    value,
    json!({
      "body": [{
        "$t": "VarDecl",
        "mode": "Let",
        "declarators": [{
          "pattern": { "pat": { "$t": "Id", "name": "x" } },
          "initializer": { "$t": "LitNum", "value": 1.0 },
        }],
      }],
    })
  );
}
