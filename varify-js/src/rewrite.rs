//! Edits that change the tree and the source text together. Each function performs one tree
//! mutation and records the text patch producing the same change, so the two never disagree.

use crate::patch::PatchId;
use crate::patch::Patches;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::class_or_object::ClassOrObjMemberDirectKey;
use parse_js::ast::class_or_object::ObjMember;
use parse_js::ast::class_or_object::ObjMemberType;
use parse_js::ast::expr::lit::LitNumExpr;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::pat::ObjPatProp;
use parse_js::ast::expr::pat::Pat;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::expr::UnaryExpr;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::decl::VarDecl;
use parse_js::ast::stmt::decl::VarDeclMode;
use parse_js::ast::stmt::decl::VarDeclarator;
use parse_js::loc::Loc;
use parse_js::operator::OperatorName;
use parse_js::token::TT;

pub(crate) const VOID_INIT: &str = " = void 0";

/// `let`/`const` becomes `var`.
pub fn hoist_keyword(decl: &mut Node<VarDecl>, patches: &mut Patches) {
  let start = decl.loc.0;
  patches.replace(start, start + decl.stx.mode.keyword().len(), VarDeclMode::Var.keyword());
  decl.stx.mode = VarDeclMode::Var;
}

pub fn rename_id_pat(node: &mut Node<IdPat>, name: &str, patches: &mut Patches) {
  patches.replace(node.loc.0, node.loc.1, name);
  node.stx.name = name.to_string();
}

/// `{a}` becomes `{a: a$1}`, so the property read stays `a`.
pub fn rename_shorthand_prop(prop: &mut Node<ObjPatProp>, name: &str, patches: &mut Patches) {
  prop.stx.shorthand = false;
  if let Pat::Id(id) = prop.stx.target.stx.as_mut() {
    let key = std::mem::replace(&mut id.stx.name, name.to_string());
    patches.replace(id.loc.0, id.loc.1, format!("{key}: {name}"));
  };
}

pub fn rename_id_expr(node: &mut Node<IdExpr>, name: &str, patches: &mut Patches) -> PatchId {
  let patch = patches.replace(node.loc.0, node.loc.1, name);
  node.stx.name = name.to_string();
  patch
}

/// `{x}` becomes `{x: x}`. The value stays the same `IdExpr` node so it can be renamed after.
pub fn expand_shorthand_member(member: &mut Node<ObjMember>, patches: &mut Patches) {
  let ObjMemberType::Shorthand { id } = &member.stx.typ else {
    return;
  };
  let placeholder = ObjMemberType::Shorthand {
    id: Node::new(id.loc, IdExpr {
      name: String::new(),
    }),
  };
  let ObjMemberType::Shorthand { id } = std::mem::replace(&mut member.stx.typ, placeholder) else {
    return;
  };
  patches.insert(id.loc.0, format!("{}: ", id.stx.name));
  let key = Node::new(id.loc, ClassOrObjMemberDirectKey {
    key: id.stx.name.clone(),
    tt: TT::Identifier,
  });
  member.stx.typ = ObjMemberType::Valued {
    key: ClassOrObjKey::Direct(key),
    val: id.into_wrapped(),
  };
}

/// Gives a declarator without an initializer an explicit `= void 0` right after `binding`.
pub fn add_void_initializer(declarator: &mut VarDeclarator, binding: Loc, patches: &mut Patches) {
  let at = Loc(binding.1, binding.1);
  patches.insert(at.0, VOID_INIT);
  let zero = Node::new(at, LitNumExpr { value: 0.0 }).into_wrapped();
  declarator.initializer = Some(
    Node::new(at, UnaryExpr {
      operator: OperatorName::Void,
      argument: zero,
    })
    .into_wrapped(),
  );
}
