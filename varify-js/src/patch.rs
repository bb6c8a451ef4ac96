use parse_js::loc::Loc;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Patch {
  start: usize,
  // Equal to `start` for insertions.
  end: usize,
  insert: bool,
  text: String,
  // Submission order, to keep insertions at the same offset stable.
  seq: usize,
  active: bool,
}

/// Handle to a submitted edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatchId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchError {
  Overlap { first: Loc, second: Loc },
  OutOfBounds(Loc),
}

impl Display for PatchError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      PatchError::Overlap { first, second } => write!(
        f,
        "edit at [{}:{}] overlaps edit at [{}:{}]",
        second.0, second.1, first.0, first.1
      ),
      PatchError::OutOfBounds(loc) => write!(f, "edit at [{}:{}] is outside the source", loc.0, loc.1),
    }
  }
}

impl Error for PatchError {}

/// Offset-keyed edits against the original source, materialized in one go by `apply`.
#[derive(Clone, Debug, Default)]
pub struct Patches {
  patches: Vec<Patch>,
}

impl Patches {
  pub fn new() -> Patches {
    Patches::default()
  }

  pub fn len(&self) -> usize {
    self.patches.len()
  }

  pub fn is_empty(&self) -> bool {
    self.patches.is_empty()
  }

  fn push(&mut self, start: usize, end: usize, insert: bool, text: String) -> PatchId {
    let seq = self.patches.len();
    self.patches.push(Patch {
      start,
      end,
      insert,
      text,
      seq,
      active: true,
    });
    PatchId(seq)
  }

  pub fn replace(&mut self, start: usize, end: usize, text: impl Into<String>) -> PatchId {
    self.push(start, end, false, text.into())
  }

  pub fn insert(&mut self, pos: usize, text: impl Into<String>) -> PatchId {
    self.push(pos, pos, true, text.into())
  }

  pub fn is_active(&self, id: PatchId) -> bool {
    self.patches.get(id.0).is_some_and(|p| p.active)
  }

  /// An inactive edit stays recorded but is skipped by `apply`.
  pub fn set_active(&mut self, id: PatchId, active: bool) {
    if let Some(p) = self.patches.get_mut(id.0) {
      p.active = active;
    };
  }

  /// Produces the edited source. Insertions at the start of a replaced range go before the
  /// replacement; otherwise no edit may touch bytes another edit replaces.
  pub fn apply(&self, source: &str) -> Result<String, PatchError> {
    let mut sorted = self.patches.iter().filter(|p| p.active).collect::<Vec<_>>();
    sorted.sort_by_key(|p| (p.start, !p.insert, p.seq));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    let mut last: Option<Loc> = None;
    for p in sorted {
      let loc = Loc(p.start, p.end);
      if p.start < cursor {
        return Err(PatchError::Overlap {
          first: last.unwrap_or(loc),
          second: loc,
        });
      };
      let Some(kept) = source.get(cursor..p.start) else {
        return Err(PatchError::OutOfBounds(loc));
      };
      if p.end < p.start || source.get(p.start..p.end).is_none() {
        return Err(PatchError::OutOfBounds(loc));
      };
      out.push_str(kept);
      out.push_str(&p.text);
      cursor = p.end;
      last = Some(loc);
    }
    out.push_str(&source[cursor..]);
    Ok(out)
  }
}
