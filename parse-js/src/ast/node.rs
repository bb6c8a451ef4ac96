use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use ahash::HashMap;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;
use serde::Serializer;
use std::any::Any;
use std::any::TypeId;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-wide unique identity of a node. Survives moves of the node within the tree, so it can
/// key side tables that outlive a traversal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct NodeId(u32);

impl NodeId {
  pub fn next() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(self) -> u32 {
    self.0
  }
}

#[derive(Default)]
pub struct NodeAssocData {
  // Bounded by Send + Sync so nodes can move across threads.
  map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl NodeAssocData {
  pub fn get<T: Any>(&self) -> Option<&T> {
    let t = TypeId::of::<T>();
    self.map.get(&t).and_then(|v| v.downcast_ref())
  }

  pub fn set<T: Any + Send + Sync>(&mut self, v: T) {
    let t = TypeId::of::<T>();
    self.map.insert(t, Box::from(v));
  }

  pub fn remove<T: Any>(&mut self) -> Option<T> {
    let t = TypeId::of::<T>();
    self
      .map
      .remove(&t)
      .and_then(|v| v.downcast().ok())
      .map(|v| *v)
  }
}

#[derive(Drive, DriveMut)]
pub struct Node<S: Drive + DriveMut> {
  #[drive(skip)]
  pub id: NodeId,
  // Synthesized nodes reuse the location of the source construct they were derived from.
  #[drive(skip)]
  pub loc: Loc,
  pub stx: Box<S>,
  #[drive(skip)]
  pub assoc: NodeAssocData,
}

impl<S: Drive + DriveMut> Node<S> {
  pub fn new(loc: Loc, stx: S) -> Node<S> {
    Node {
      id: NodeId::next(),
      loc,
      stx: Box::new(stx),
      assoc: NodeAssocData::default(),
    }
  }

  /// Maps the syntax, keeping the identity, location, and associated data.
  pub fn map_stx<T: Drive + DriveMut, F: FnOnce(S) -> T>(self, f: F) -> Node<T> {
    Node {
      id: self.id,
      loc: self.loc,
      stx: Box::new(f(*self.stx)),
      assoc: self.assoc,
    }
  }

  /// Wraps the node inside another node with the same loc, e.g. `Node<IdExpr>` into `Node<Expr>`.
  pub fn into_wrapped<T: Drive + DriveMut + From<Node<S>>>(self) -> Node<T> {
    let loc = self.loc;
    Node::new(loc, T::from(self))
  }

  /// Create an error at this node's location.
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, None)
  }
}

impl<S: Debug + Drive + DriveMut> Debug for Node<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.stx.fmt(f)
  }
}

impl<S: Serialize + Drive + DriveMut> Serialize for Node<S> {
  fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
    self.stx.serialize(serializer)
  }
}

#[cfg(test)]
mod tests {
  use super::NodeAssocData;
  use super::NodeId;

  #[test]
  fn test_node_assoc_data() {
    struct MyType(u32);
    let mut assoc = NodeAssocData::default();
    assoc.set(MyType(32));
    let v = assoc.get::<MyType>().unwrap();
    assert_eq!(v.0, 32);
    assert_eq!(assoc.remove::<MyType>().map(|v| v.0), Some(32));
    assert!(assoc.get::<MyType>().is_none());
  }

  #[test]
  fn test_node_ids_are_unique() {
    let a = NodeId::next();
    let b = NodeId::next();
    assert_ne!(a, b);
  }
}
