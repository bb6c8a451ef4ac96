use super::expr::Expr;
use super::expr::IdExpr;
use super::func::Func;
use super::node::Node;
use crate::token::TT;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// This is a node as the key may not be the same as source[node.loc], due to decoding.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjMemberDirectKey {
  #[drive(skip)]
  pub key: String,
  // The original token type, to tell identifiers apart from string and number keys.
  #[drive(skip)]
  pub tt: TT,
}

// Direct keys must not be represented as IdExpr, as they're not a usage of a variable.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ClassOrObjKey {
  // Identifier, keyword, string, or number.
  Direct(Node<ClassOrObjMemberDirectKey>),
  Computed(Node<Expr>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ObjMemberType {
  Valued {
    key: ClassOrObjKey,
    val: Node<Expr>,
  },
  Method {
    key: ClassOrObjKey,
    func: Node<Func>,
  },
  // `{ a }`. The identifier is a reference.
  Shorthand {
    id: Node<IdExpr>,
  },
  Rest {
    val: Node<Expr>,
  },
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ObjMember {
  pub typ: ObjMemberType,
}
