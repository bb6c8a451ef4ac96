use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ObjMember;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitArrExpr;
use crate::ast::expr::lit::LitObjExpr;
use crate::ast::expr::pat::ArrPat;
use crate::ast::expr::pat::ArrPatElem;
use crate::ast::expr::pat::ObjPat;
use crate::ast::expr::pat::ObjPatProp;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::token::TT;

/// Builds the cover form of `{ a = 1 }` as `a = 1`, which only becomes valid once the literal is
/// reinterpreted as a pattern.
pub fn shorthand_with_default(id: Node<IdExpr>, default_value: Node<Expr>) -> Node<Expr> {
  let loc = id.loc + default_value.loc;
  Node::new(loc, BinaryExpr {
    operator: OperatorName::Assignment,
    left: id.into_wrapped(),
    right: default_value,
  })
  .into_wrapped()
}

// Splits `target = default` found inside a literal.
fn split_default(node: Node<Expr>) -> SyntaxResult<(Node<Expr>, Option<Node<Expr>>)> {
  match *node.stx {
    Expr::Binary(n) if n.stx.operator == OperatorName::Assignment => {
      let BinaryExpr { left, right, .. } = *n.stx;
      Ok((left, Some(right)))
    }
    Expr::Binary(n) => Err(n.error(SyntaxErrorType::InvalidAssigmentTarget)),
    stx => Ok((
      Node {
        id: node.id,
        loc: node.loc,
        stx: Box::new(stx),
        assoc: node.assoc,
      },
      None,
    )),
  }
}

fn lit_arr_to_pat(loc: Loc, arr: LitArrExpr) -> SyntaxResult<Node<ArrPat>> {
  let mut elements = Vec::<Option<ArrPatElem>>::new();
  let mut rest = None;
  for element in arr.elements {
    if rest.is_some() {
      return Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
    };
    match element {
      LitArrElem::Single(elem) => {
        let (target, default_value) = split_default(elem)?;
        elements.push(Some(ArrPatElem {
          target: lit_to_pat(target)?,
          default_value,
        }));
      }
      LitArrElem::Rest(expr) => rest = Some(lit_to_pat(expr)?),
      LitArrElem::Empty => elements.push(None),
    };
  }
  Ok(Node::new(loc, ArrPat { elements, rest }))
}

fn lit_obj_to_pat(loc: Loc, obj: LitObjExpr) -> SyntaxResult<Node<ObjPat>> {
  let mut properties = Vec::new();
  let mut rest = None;
  for member in obj.members {
    let member_loc = member.loc;
    if rest.is_some() {
      return Err(member_loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
    };
    let ObjMember { typ } = *member.stx;
    match typ {
      ObjMemberType::Valued { key, val } => {
        let (target, default_value) = split_default(val)?;
        // The cover form of `{ a = 1 }` reuses the identifier's location for the key.
        let shorthand = matches!(&key, ClassOrObjKey::Direct(k) if k.loc == target.loc);
        properties.push(Node::new(member_loc, ObjPatProp {
          key,
          target: lit_to_pat(target)?,
          shorthand,
          default_value,
        }));
      }
      ObjMemberType::Shorthand { id } => {
        let key = ClassOrObjKey::Direct(Node::new(id.loc, ClassOrObjMemberDirectKey {
          key: id.stx.name.clone(),
          tt: TT::Identifier,
        }));
        let target_loc = id.loc;
        properties.push(Node::new(member_loc, ObjPatProp {
          key,
          target: Node::new(target_loc, Pat::AssignTarget(id.into_wrapped())),
          shorthand: true,
          default_value: None,
        }));
      }
      ObjMemberType::Rest { val } => rest = Some(lit_to_pat(val)?),
      ObjMemberType::Method { .. } => {
        return Err(member_loc.error(SyntaxErrorType::InvalidAssigmentTarget, None));
      }
    };
  }
  Ok(Node::new(loc, ObjPat { properties, rest }))
}

/// Converts a literal expression subtree into a pattern (assignment target).
/// `{ a: [b] }` could be an object literal or object pattern; this reinterprets a misparsed
/// literal without needing to rewind and reparse.
pub fn lit_to_pat(node: Node<Expr>) -> SyntaxResult<Node<Pat>> {
  let loc = node.loc;
  match *node.stx {
    Expr::LitArr(n) => Ok(lit_arr_to_pat(loc, *n.stx)?.into_wrapped()),
    Expr::LitObj(n) => Ok(lit_obj_to_pat(loc, *n.stx)?.into_wrapped()),
    // Nested targets already converted while parsing an inner `=`, e.g. `[[a] = b] = c`.
    Expr::ArrPat(n) => Ok(n.into_wrapped()),
    Expr::ObjPat(n) => Ok(n.into_wrapped()),
    stx @ (Expr::Id(_) | Expr::Member(_) | Expr::ComputedMember(_)) => {
      let target = Node {
        id: node.id,
        loc,
        stx: Box::new(stx),
        assoc: node.assoc,
      };
      Ok(Node::new(loc, Pat::AssignTarget(target)))
    }
    _ => Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None)),
  }
}

// Checking every operand up front is wasteful, so the LHS of an assignment is transformed
// retroactively, raising an error if it isn't a valid target. A valid target is:
// - An identifier, member, or computed member expression.
// - An array or object literal that can be reinterpreted as a pattern (plain `=` only).
pub fn lhs_expr_to_assign_target(
  lhs: Node<Expr>,
  operator_name: OperatorName,
) -> SyntaxResult<Node<Expr>> {
  let loc = lhs.loc;
  match *lhs.stx {
    Expr::LitArr(n) if operator_name == OperatorName::Assignment => {
      Ok(lit_arr_to_pat(loc, *n.stx)?.into_wrapped())
    }
    Expr::LitObj(n) if operator_name == OperatorName::Assignment => {
      Ok(lit_obj_to_pat(loc, *n.stx)?.into_wrapped())
    }
    stx @ (Expr::Id(_) | Expr::Member(_) | Expr::ComputedMember(_)) => Ok(Node {
      id: lhs.id,
      loc,
      stx: Box::new(stx),
      assoc: lhs.assoc,
    }),
    stx @ (Expr::ArrPat(_) | Expr::ObjPat(_)) if operator_name == OperatorName::Assignment => {
      Ok(Node {
        id: lhs.id,
        loc,
        stx: Box::new(stx),
        assoc: lhs.assoc,
      })
    }
    _ => Err(loc.error(SyntaxErrorType::InvalidAssigmentTarget, None)),
  }
}
