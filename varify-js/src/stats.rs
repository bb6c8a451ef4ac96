use parse_js::ast::stmt::decl::VarDeclMode;
use serde::Serialize;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// Write-only sink for what the pass did.
pub trait StatsSink {
  /// One leaf binding of a `let` or `const` group was hoisted.
  fn declarator(&mut self, kind: VarDeclMode);
  /// A hoisted binding had to be renamed. `line` is 1-based.
  fn rename(&mut self, old: &str, new: &str, line: usize);
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Rename {
  pub old: String,
  pub new: String,
  pub line: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
  pub consts: usize,
  pub lets: usize,
  pub renames: Vec<Rename>,
}

impl StatsSink for Stats {
  fn declarator(&mut self, kind: VarDeclMode) {
    match kind {
      VarDeclMode::Const => self.consts += 1,
      VarDeclMode::Let => self.lets += 1,
      VarDeclMode::Var => {}
    };
  }

  fn rename(&mut self, old: &str, new: &str, line: usize) {
    self.renames.push(Rename {
      old: old.to_string(),
      new: new.to_string(),
      line,
    });
  }
}

impl Display for Stats {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    writeln!(f, "consts: {}", self.consts)?;
    writeln!(f, "lets: {}", self.lets)?;
    if !self.renames.is_empty() {
      writeln!(f, "renames:")?;
      for r in self.renames.iter() {
        writeln!(f, "  line {}: {} => {}", r.line, r.old, r.new)?;
      }
    };
    Ok(())
  }
}
