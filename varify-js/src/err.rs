use crate::patch::PatchError;
use parse_js::error::SyntaxError;
use parse_js::loc::Loc;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarifyError {
  /// A declaration target that does not declare anything, such as a member expression.
  NotABinding(Loc),
  /// A declaration the scope builder never saw.
  MissingScope(Loc),
  /// A rename was requested through a reference that does not resolve to a declaration.
  UnresolvedReference(Loc),
  Syntax(SyntaxError),
  Patch(PatchError),
}

impl VarifyError {
  pub fn loc(&self) -> Option<Loc> {
    match self {
      VarifyError::NotABinding(loc)
      | VarifyError::MissingScope(loc)
      | VarifyError::UnresolvedReference(loc) => Some(*loc),
      VarifyError::Syntax(err) => Some(err.loc),
      VarifyError::Patch(PatchError::Overlap { second, .. }) => Some(*second),
      VarifyError::Patch(PatchError::OutOfBounds(loc)) => Some(*loc),
    }
  }
}

impl Display for VarifyError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      VarifyError::NotABinding(loc) => {
        write!(f, "declaration target at [{}:{}] is not a binding", loc.0, loc.1)
      }
      VarifyError::MissingScope(loc) => {
        write!(f, "declaration at [{}:{}] has no scope", loc.0, loc.1)
      }
      VarifyError::UnresolvedReference(loc) => write!(
        f,
        "reference at [{}:{}] has no declaration to rename",
        loc.0, loc.1
      ),
      VarifyError::Syntax(err) => write!(f, "{err}"),
      VarifyError::Patch(err) => write!(f, "{err}"),
    }
  }
}

impl Error for VarifyError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      VarifyError::Syntax(err) => Some(err),
      VarifyError::Patch(err) => Some(err),
      _ => None,
    }
  }
}

impl From<SyntaxError> for VarifyError {
  fn from(err: SyntaxError) -> Self {
    VarifyError::Syntax(err)
  }
}

impl From<PatchError> for VarifyError {
  fn from(err: PatchError) -> Self {
    VarifyError::Patch(err)
  }
}
