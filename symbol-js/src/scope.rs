use ahash::HashMap;
use ahash::HashSet;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use parse_js::ast::node::NodeId;
use parse_js::ast::stmt::decl::VarDeclMode;
use serde::Serialize;
use std::any::Any;
use std::any::TypeId;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;
use std::sync::Weak;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum ScopeType {
  Global,
  Function,
  // Head and body of a `for`, `while` or `do` statement.
  Loop,
  // Braced block, catch clause, or the scope holding a named function expression's own name.
  Block,
}

impl ScopeType {
  /// Whether `var` declarations (and anything hoisted) land in this scope.
  pub fn is_hoist_target(self) -> bool {
    matches!(self, ScopeType::Global | ScopeType::Function)
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum BindingKind {
  Var,
  Let,
  Const,
  Function,
  Param,
  Catch,
}

impl BindingKind {
  pub fn is_lexical(self) -> bool {
    matches!(self, BindingKind::Let | BindingKind::Const)
  }
}

impl From<VarDeclMode> for BindingKind {
  fn from(mode: VarDeclMode) -> Self {
    match mode {
      VarDeclMode::Const => BindingKind::Const,
      VarDeclMode::Let => BindingKind::Let,
      VarDeclMode::Var => BindingKind::Var,
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Binding {
  pub kind: BindingKind,
  /// The declaring node, usually an `IdPat`.
  pub node: NodeId,
  /// Source offset the binding is considered declared at.
  pub pos: usize,
}

pub struct ScopeData {
  typ: ScopeType,
  parent: Option<Weak<RwLock<ScopeData>>>,
  children: Vec<Scope>,
  bindings: HashMap<String, Binding>,
  // Names in declaration order.
  order: Vec<String>,
  propagated: HashSet<String>,
  assoc: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ScopeData {
  pub fn typ(&self) -> ScopeType {
    self.typ
  }

  pub fn parent(&self) -> Option<Scope> {
    self.parent.as_ref().and_then(|p| p.upgrade()).map(Scope)
  }

  pub fn children(&self) -> &[Scope] {
    &self.children
  }

  pub fn get_binding(&self, name: &str) -> Option<Binding> {
    self.bindings.get(name).copied()
  }

  pub fn binding_names(&self) -> impl Iterator<Item = &String> {
    self.order.iter()
  }

  pub fn binding_count(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_propagated(&self, name: &str) -> bool {
    self.propagated.contains(name)
  }

  pub fn get_assoc<T: Any>(&self) -> Option<&T> {
    self
      .assoc
      .get(&TypeId::of::<T>())
      .and_then(|v| v.downcast_ref())
  }

  pub fn get_assoc_mut<T: Any>(&mut self) -> Option<&mut T> {
    self
      .assoc
      .get_mut(&TypeId::of::<T>())
      .and_then(|v| v.downcast_mut())
  }

  pub fn set_assoc<T: Any + Send + Sync>(&mut self, v: T) {
    self.assoc.insert(TypeId::of::<T>(), Box::new(v));
  }

  pub fn get_or_insert_assoc<T: Any + Send + Sync + Default>(&mut self) -> &mut T {
    self
      .assoc
      .entry(TypeId::of::<T>())
      .or_insert_with(|| Box::new(T::default()))
      .downcast_mut()
      // The entry is keyed by the type it holds.
      .unwrap_or_else(|| unreachable!())
  }

  pub fn remove_assoc<T: Any>(&mut self) -> Option<T> {
    self
      .assoc
      .remove(&TypeId::of::<T>())
      .and_then(|v| v.downcast().ok())
      .map(|v| *v)
  }
}

/// Shared handle to a node in the scope tree. Equality is identity.
#[derive(Clone)]
pub struct Scope(Arc<RwLock<ScopeData>>);

impl Scope {
  pub fn new_root(typ: ScopeType) -> Scope {
    Scope(Arc::new(RwLock::new(ScopeData {
      typ,
      parent: None,
      children: Vec::new(),
      bindings: HashMap::default(),
      order: Vec::new(),
      propagated: HashSet::default(),
      assoc: HashMap::default(),
    })))
  }

  pub fn create_child_scope(&self, typ: ScopeType) -> Scope {
    let child = Scope::new_root(typ);
    child.data_mut().parent = Some(Arc::downgrade(&self.0));
    self.data_mut().children.push(child.clone());
    child
  }

  pub fn downgrade(&self) -> WeakScope {
    WeakScope(Arc::downgrade(&self.0))
  }

  pub fn data(&self) -> RwLockReadGuard<'_, ScopeData> {
    self.0.read()
  }

  pub fn data_mut(&self) -> RwLockWriteGuard<'_, ScopeData> {
    self.0.write()
  }

  pub fn typ(&self) -> ScopeType {
    self.data().typ
  }

  pub fn parent(&self) -> Option<Scope> {
    self.data().parent()
  }

  pub fn self_and_ancestors(&self) -> Ancestors {
    Ancestors {
      next: Some(self.clone()),
    }
  }

  /// All scopes below this one, depth first in creation order.
  pub fn descendants(&self) -> Vec<Scope> {
    let mut out = Vec::new();
    let mut stack = self.data().children.iter().rev().cloned().collect::<Vec<_>>();
    while let Some(scope) = stack.pop() {
      stack.extend(scope.data().children.iter().rev().cloned());
      out.push(scope);
    }
    out
  }

  pub fn owns_binding(&self, name: &str) -> bool {
    self.data().bindings.contains_key(name)
  }

  pub fn get_binding(&self, name: &str) -> Option<Binding> {
    self.data().get_binding(name)
  }

  pub fn is_propagated(&self, name: &str) -> bool {
    self.data().is_propagated(name)
  }

  pub fn mark_propagated(&self, name: &str) {
    self.data_mut().propagated.insert(name.to_string());
  }

  /// Adds or replaces a binding. A replaced binding keeps its place in the declaration order.
  pub fn add_binding(&self, name: &str, kind: BindingKind, node: NodeId, pos: usize) {
    let mut data = self.data_mut();
    let binding = Binding { kind, node, pos };
    if data.bindings.insert(name.to_string(), binding).is_none() {
      data.order.push(name.to_string());
    };
  }

  pub fn remove_binding(&self, name: &str) -> Option<Binding> {
    let mut data = self.data_mut();
    let removed = data.bindings.remove(name);
    if removed.is_some() {
      data.order.retain(|n| n != name);
    };
    removed
  }

  /// Nearest self-or-ancestor scope that is a function or the global scope.
  pub fn closest_hoist_target(&self) -> Scope {
    let mut last = self.clone();
    for scope in self.self_and_ancestors() {
      if scope.typ().is_hoist_target() {
        return scope;
      };
      last = scope;
    }
    // Only reachable for a detached tree whose root is not a hoist target.
    last
  }

  /// Whether a loop scope lies on the ancestor chain from this scope up to `other`, excluding
  /// `other`. This scope itself is only considered when `inclusive`.
  pub fn has_loop_scope_between(&self, other: &Scope, inclusive: bool) -> bool {
    let mut chain = self.self_and_ancestors();
    if !inclusive {
      chain.next();
    };
    for scope in chain {
      if &scope == other {
        break;
      };
      if scope.typ() == ScopeType::Loop {
        return true;
      };
    }
    false
  }

  /// Innermost self-or-ancestor scope declaring `name`, with the binding.
  pub fn find_binding(&self, name: &str) -> Option<(Scope, Binding)> {
    self
      .self_and_ancestors()
      .find_map(|scope| scope.get_binding(name).map(|b| (scope, b)))
  }
}

impl PartialEq for Scope {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Scope {}

impl Debug for Scope {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let data = self.data();
    f.debug_struct("Scope")
      .field("typ", &data.typ)
      .field("bindings", &data.order)
      .field("children", &data.children.len())
      .finish()
  }
}

/// Handle that does not keep the scope alive.
#[derive(Clone)]
pub struct WeakScope(Weak<RwLock<ScopeData>>);

impl WeakScope {
  pub fn upgrade(&self) -> Option<Scope> {
    self.0.upgrade().map(Scope)
  }
}

impl Debug for WeakScope {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self.upgrade() {
      Some(scope) => scope.fmt(f),
      None => f.write_str("Scope(dropped)"),
    }
  }
}

pub struct Ancestors {
  next: Option<Scope>,
}

impl Iterator for Ancestors {
  type Item = Scope;

  fn next(&mut self) -> Option<Scope> {
    let cur = self.next.take()?;
    self.next = cur.parent();
    Some(cur)
  }
}
