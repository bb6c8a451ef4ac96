use crate::err::VarifyError;
use crate::options::let_const_enabled;
use crate::options::Options;
use crate::patch::PatchId;
use crate::patch::Patches;
use crate::rewrite;
use crate::stats::StatsSink;
use ahash::HashMap;
use ahash::HashSet;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;
use parse_js::ast::class_or_object::ObjMember;
use parse_js::ast::class_or_object::ObjMemberType;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::pat::Pat;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::node::Node;
use parse_js::ast::node::NodeId;
use parse_js::ast::stmt::decl::VarDecl;
use parse_js::ast::stmt::decl::VarDeclMode;
use parse_js::ast::stmt::ForInOfLhs;
use parse_js::ast::stmt::ForInStmt;
use parse_js::ast::stmt::ForOfStmt;
use parse_js::ast::stmt::TopLevel;
use parse_js::loc::LineIndex;
use symbol_js::identifiers::Identifiers;
use symbol_js::resolve::Declaration;
use symbol_js::resolve::RefToScope;
use symbol_js::scope::BindingKind;
use symbol_js::scope::Scope;
use symbol_js::scope::WeakScope;
use tracing::debug;
use tracing::debug_span;
use tracing::trace;

type ForInStmtNode = Node<ForInStmt>;
type ForOfStmtNode = Node<ForOfStmt>;
type IdExprNode = Node<IdExpr>;
type ObjMemberNode = Node<ObjMember>;
type VarDeclNode = Node<VarDecl>;

/// Where a binding went when its declaration was hoisted.
#[derive(Clone, Debug)]
pub struct Move {
  pub name: String,
  pub scope: WeakScope,
  pub original_kind: VarDeclMode,
}

/// Moves out of one scope keyed by original name, stored in that scope's associated data. Only
/// valid during a traversal.
#[derive(Debug, Default)]
pub struct Moves(HashMap<String, Move>);

impl Moves {
  pub fn get(&self, name: &str) -> Option<&Move> {
    self.0.get(name)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

pub fn find_move(scope: &Scope, name: &str) -> Option<Move> {
  scope
    .data()
    .get_assoc::<Moves>()
    .and_then(|moves| moves.get(name))
    .cloned()
}

pub fn clear_moves(top_scope: &Scope) {
  top_scope.data_mut().remove_assoc::<Moves>();
  for scope in top_scope.descendants() {
    scope.data_mut().remove_assoc::<Moves>();
  }
}

pub enum RenameTarget<'n> {
  /// The `IdPat` declaring the binding.
  Declaration(NodeId),
  /// A reference, which is followed to its declaration.
  Reference(&'n Node<IdExpr>),
}

/// A reference renamed by a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceRename {
  pub original_name: String,
  /// The edit spelling the new name. Another transform that rewrites the reference's text itself
  /// can deactivate it.
  pub patch: PatchId,
}

// A declaration group being rewritten.
struct Group {
  origin: Scope,
  hoist: Scope,
  kind: VarDeclMode,
}

/// The `let`/`const` to `var` transform. Its state outlives individual passes: sibling transforms
/// may ask for renames before the pass runs, and original kinds are kept afterwards.
#[derive(Debug, Default)]
pub struct LetConst {
  options: Options,
  forced: HashSet<NodeId>,
  original_kinds: HashMap<NodeId, VarDeclMode>,
  reference_renames: HashMap<NodeId, ReferenceRename>,
}

impl LetConst {
  pub fn new(options: Options) -> LetConst {
    LetConst {
      options,
      ..Default::default()
    }
  }

  pub fn options(&self) -> &Options {
    &self.options
  }

  pub fn reset(&mut self, top_scope: &Scope) {
    clear_moves(top_scope);
  }

  pub fn setup<'a>(
    &'a mut self,
    patches: &'a mut Patches,
    stats: &'a mut dyn StatsSink,
    identifiers: &'a mut Identifiers,
    source: &str,
  ) -> LetConstPass<'a> {
    LetConstPass {
      transform: self,
      patches,
      stats,
      identifiers,
      lines: LineIndex::new(source),
      loop_heads: HashSet::default(),
      deferred: HashSet::default(),
      deferred_only: false,
      error: None,
    }
  }

  /// Forces the binding to be renamed when hoisted, even if nothing would collide with it.
  pub fn mark_for_renaming(&mut self, target: RenameTarget<'_>) -> Result<(), VarifyError> {
    let decl = match target {
      RenameTarget::Declaration(id) => id,
      RenameTarget::Reference(node) => match node.assoc.get::<Declaration>() {
        Some(decl) => decl.0,
        None => return Err(VarifyError::UnresolvedReference(node.loc)),
      },
    };
    self.forced.insert(decl);
    Ok(())
  }

  pub fn is_marked_for_renaming(&self, decl: NodeId) -> bool {
    self.forced.contains(&decl)
  }

  /// The keyword a hoisted leaf binding was originally declared with.
  pub fn original_kind(&self, decl: NodeId) -> Option<VarDeclMode> {
    self.original_kinds.get(&decl).copied()
  }

  pub fn reference_rename(&self, reference: NodeId) -> Option<&ReferenceRename> {
    self.reference_renames.get(&reference)
  }

  /// Leaves the reference renamed in the tree but drops its text edit. Returns false if the
  /// reference was never renamed.
  pub fn deactivate_reference_rename(&self, reference: NodeId, patches: &mut Patches) -> bool {
    let Some(rename) = self.reference_renames.get(&reference) else {
      return false;
    };
    patches.set_active(rename.patch, false);
    true
  }
}

/// One full traversal of a program. Declarations are rewritten as they're entered and record
/// moves in their scope; references consult those moves.
#[derive(VisitorMut)]
#[visitor(
  ForInStmtNode(enter),
  ForOfStmtNode(enter),
  IdExprNode(enter),
  ObjMemberNode(enter),
  VarDeclNode(enter)
)]
pub struct LetConstPass<'a> {
  transform: &'a mut LetConst,
  patches: &'a mut Patches,
  stats: &'a mut dyn StatsSink,
  identifiers: &'a mut Identifiers,
  lines: LineIndex,
  // Declarations heading a `for…in` or `for…of`, which are assigned every iteration.
  loop_heads: HashSet<NodeId>,
  // References visited before the declaration they resolve to.
  deferred: HashSet<NodeId>,
  deferred_only: bool,
  // Once set, all further visits do nothing.
  error: Option<VarifyError>,
}

impl LetConstPass<'_> {
  pub fn before(&mut self, top_scope: &Scope) {
    clear_moves(top_scope);
    self.loop_heads.clear();
    self.deferred.clear();
    self.deferred_only = false;
    self.error = None;
  }

  pub fn after(&mut self, top_scope: &Scope) {
    clear_moves(top_scope);
  }

  pub fn run(&mut self, top_level: &mut Node<TopLevel>, top_scope: &Scope) -> Result<(), VarifyError> {
    let _span = debug_span!("let_const").entered();
    self.before(top_scope);
    top_level.drive_mut(self);
    if self.error.is_none() && !self.deferred.is_empty() {
      debug!(count = self.deferred.len(), "rewriting forward references");
      self.deferred_only = true;
      top_level.drive_mut(self);
      self.deferred_only = false;
    };
    self.after(top_scope);
    match self.error.take() {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }

  pub fn rewrite_declaration(&mut self, decl: &mut Node<VarDecl>) -> Result<(), VarifyError> {
    if !decl.stx.mode.is_lexical() {
      return Ok(());
    };
    let Some(origin) = decl.assoc.get::<Scope>().cloned() else {
      return Err(VarifyError::MissingScope(decl.loc));
    };
    if !let_const_enabled(&origin, &self.transform.options) {
      return Ok(());
    };
    let group = Group {
      hoist: origin.closest_hoist_target(),
      origin,
      kind: decl.stx.mode,
    };
    let loop_head = self.loop_heads.contains(&decl.id);
    rewrite::hoist_keyword(decl, self.patches);

    let mut loop_between = None;
    for declarator in decl.stx.declarators.iter_mut() {
      self.rewrite_pat(&group, &mut declarator.pattern.stx.pat)?;
      if declarator.initializer.is_some() || loop_head {
        continue;
      };
      let Pat::Id(id) = declarator.pattern.stx.pat.stx.as_ref() else {
        continue;
      };
      let binding = id.loc;
      let hazard = *loop_between
        .get_or_insert_with(|| group.origin.has_loop_scope_between(&group.hoist, true));
      if hazard {
        rewrite::add_void_initializer(declarator, binding, self.patches);
      };
    }
    Ok(())
  }

  fn rewrite_pat(&mut self, group: &Group, pat: &mut Node<Pat>) -> Result<(), VarifyError> {
    match pat.stx.as_mut() {
      Pat::Id(id) => {
        if let Some(name) = self.hoist_leaf(group, id) {
          rewrite::rename_id_pat(id, &name, self.patches);
        };
      }
      Pat::Obj(obj) => {
        for prop in obj.stx.properties.iter_mut() {
          if !prop.stx.shorthand {
            self.rewrite_pat(group, &mut prop.stx.target)?;
            continue;
          };
          let target_loc = prop.stx.target.loc;
          let renamed = match prop.stx.target.stx.as_mut() {
            Pat::Id(id) => self.hoist_leaf(group, id),
            _ => return Err(VarifyError::NotABinding(target_loc)),
          };
          if let Some(name) = renamed {
            rewrite::rename_shorthand_prop(prop, &name, self.patches);
          };
        }
        if let Some(rest) = obj.stx.rest.as_mut() {
          self.rewrite_pat(group, rest)?;
        };
      }
      Pat::Arr(arr) => {
        for elem in arr.stx.elements.iter_mut().flatten() {
          self.rewrite_pat(group, &mut elem.target)?;
        }
        if let Some(rest) = arr.stx.rest.as_mut() {
          self.rewrite_pat(group, rest)?;
        };
      }
      Pat::AssignTarget(target) => return Err(VarifyError::NotABinding(target.loc)),
    };
    Ok(())
  }

  // Moves the binding to the hoist scope. Returns the new name if it had to be renamed; the
  // caller patches the spelling, which depends on where the leaf sits.
  fn hoist_leaf(&mut self, group: &Group, id: &Node<IdPat>) -> Option<String> {
    let name = id.stx.name.clone();
    self.stats.declarator(group.kind);

    let rename = self.transform.forced.contains(&id.id)
      || (group.origin != group.hoist
        && (group.hoist.owns_binding(&name) || group.hoist.is_propagated(&name)));
    let new_name = if rename {
      self.identifiers.register_and_generate_unique(&name)
    } else {
      name.clone()
    };

    group.origin.remove_binding(&name);
    group
      .hoist
      .add_binding(&new_name, BindingKind::Var, id.id, id.loc.1);
    self.transform.original_kinds.insert(id.id, group.kind);
    group
      .origin
      .data_mut()
      .get_or_insert_assoc::<Moves>()
      .0
      .insert(name.clone(), Move {
        name: new_name.clone(),
        scope: group.hoist.downgrade(),
        original_kind: group.kind,
      });
    self.identifiers.add(&new_name);

    if new_name == name {
      debug!(%name, "hoisted binding");
      return None;
    };
    let line = self.lines.line(id.loc.0);
    self.stats.rename(&name, &new_name, line);
    debug!(%name, %new_name, line, "hoisted and renamed binding");
    Some(new_name)
  }

  // The new name a reference must take, if its binding was hoisted under another name.
  fn pending_rename(&self, node: &Node<IdExpr>) -> Option<String> {
    let RefToScope(scope) = node.assoc.get::<RefToScope>()?;
    find_move(scope, &node.stx.name)
      .map(|mv| mv.name)
      .filter(|name| name != &node.stx.name)
  }

  pub fn rewrite_reference(&mut self, node: &mut Node<IdExpr>) {
    let Some(RefToScope(scope)) = node.assoc.get::<RefToScope>().cloned() else {
      return;
    };
    let Some(mv) = find_move(&scope, &node.stx.name) else {
      let forward = scope
        .get_binding(&node.stx.name)
        .is_some_and(|b| b.kind.is_lexical());
      if forward && !self.deferred_only {
        self.deferred.insert(node.id);
      };
      return;
    };
    let Some(target) = mv.scope.upgrade() else {
      return;
    };
    node.assoc.set(RefToScope(target));
    if mv.name != node.stx.name {
      trace!(from = %node.stx.name, to = %mv.name, at = node.loc.0, "renaming reference");
      let original_name = node.stx.name.clone();
      let patch = rewrite::rename_id_expr(node, &mv.name, self.patches);
      self
        .transform
        .reference_renames
        .insert(node.id, ReferenceRename {
          original_name,
          patch,
        });
    };
  }

  fn should_visit(&self, id: NodeId) -> bool {
    self.error.is_none() && (!self.deferred_only || self.deferred.contains(&id))
  }

  fn enter_for_in_stmt_node(&mut self, node: &mut ForInStmtNode) {
    if let ForInOfLhs::Decl(decl) = &node.stx.lhs {
      self.loop_heads.insert(decl.id);
    };
  }

  fn enter_for_of_stmt_node(&mut self, node: &mut ForOfStmtNode) {
    if let ForInOfLhs::Decl(decl) = &node.stx.lhs {
      self.loop_heads.insert(decl.id);
    };
  }

  fn enter_id_expr_node(&mut self, node: &mut IdExprNode) {
    if self.should_visit(node.id) {
      self.rewrite_reference(node);
    };
  }

  fn enter_obj_member_node(&mut self, node: &mut ObjMemberNode) {
    let ObjMemberType::Shorthand { id } = &node.stx.typ else {
      return;
    };
    if self.should_visit(id.id) && self.pending_rename(id).is_some() {
      rewrite::expand_shorthand_member(node, self.patches);
    };
  }

  fn enter_var_decl_node(&mut self, node: &mut VarDeclNode) {
    if self.error.is_some() || self.deferred_only {
      return;
    };
    if let Err(err) = self.rewrite_declaration(node) {
      self.error = Some(err);
    };
  }
}
