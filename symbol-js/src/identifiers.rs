use ahash::HashSet;
use derive_visitor::Drive;
use derive_visitor::Visitor;
use parse_js::ast::class_or_object::ClassOrObjMemberDirectKey;
use parse_js::ast::expr::pat::ClassOrFuncName;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::expr::MemberExpr;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::TopLevel;
use parse_js::token::TT;

type ClassOrFuncNameNode = Node<ClassOrFuncName>;
type ClassOrObjMemberDirectKeyNode = Node<ClassOrObjMemberDirectKey>;
type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;
type MemberExprNode = Node<MemberExpr>;

pub const DEFAULT_SEPARATOR: &str = "$";

#[derive(Default, Visitor)]
#[visitor(
  ClassOrFuncNameNode(enter),
  ClassOrObjMemberDirectKeyNode(enter),
  IdExprNode(enter),
  IdPatNode(enter),
  MemberExprNode(enter)
)]
struct NameCollector {
  names: HashSet<String>,
}

impl NameCollector {
  fn enter_class_or_func_name_node(&mut self, node: &ClassOrFuncNameNode) {
    self.names.insert(node.stx.name.clone());
  }

  fn enter_class_or_obj_member_direct_key_node(&mut self, node: &ClassOrObjMemberDirectKeyNode) {
    if node.stx.tt != TT::LiteralString && node.stx.tt != TT::LiteralNumber {
      self.names.insert(node.stx.key.clone());
    };
  }

  fn enter_id_expr_node(&mut self, node: &IdExprNode) {
    self.names.insert(node.stx.name.clone());
  }

  fn enter_id_pat_node(&mut self, node: &IdPatNode) {
    self.names.insert(node.stx.name.clone());
  }

  fn enter_member_expr_node(&mut self, node: &MemberExprNode) {
    self.names.insert(node.stx.right.clone());
  }
}

/// Every identifier spelled anywhere in a program, including property names. Fresh names handed
/// out are added, so no two requests ever receive the same name.
#[derive(Debug)]
pub struct Identifiers {
  names: HashSet<String>,
  separator: String,
}

impl Identifiers {
  pub fn new() -> Identifiers {
    Identifiers {
      names: HashSet::default(),
      separator: DEFAULT_SEPARATOR.to_string(),
    }
  }

  pub fn from_top_level(top_level_node: &Node<TopLevel>) -> Identifiers {
    let mut collector = NameCollector::default();
    top_level_node.drive(&mut collector);
    let mut ids = Identifiers::new();
    ids.names = collector.names;
    ids
  }

  pub fn with_separator(mut self, separator: impl Into<String>) -> Identifiers {
    self.separator = separator.into();
    self
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.contains(name)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  pub fn add(&mut self, name: &str) {
    self.names.insert(name.to_string());
  }

  /// `<base><separator><n>` for the smallest `n` from 1 that isn't taken. The result is registered
  /// before returning.
  pub fn register_and_generate_unique(&mut self, base: &str) -> String {
    let mut n = 1usize;
    loop {
      let candidate = format!("{base}{}{n}", self.separator);
      if self.names.insert(candidate.clone()) {
        return candidate;
      };
      n += 1;
    }
  }
}

impl Default for Identifiers {
  fn default() -> Self {
    Identifiers::new()
  }
}
