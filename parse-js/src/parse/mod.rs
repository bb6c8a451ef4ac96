use crate::ast::node::Node;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::lex_all;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use derive_visitor::Drive;
use derive_visitor::DriveMut;

pub mod class_or_object;
pub mod expr;
pub mod func;
pub mod operator;
pub mod stmt;
#[cfg(test)]
mod tests;
pub mod toplevel;

// Almost every parse_* function takes these field values as parameters, so we pass this struct
// around by value. The with_* methods create an altered copy for nested calls.
#[derive(Clone, Copy, Default)]
pub struct ParseCtx {
  // Whether `in` must not be parsed as an operator, e.g. in a `for` initializer.
  pub no_in: bool,
}

impl ParseCtx {
  pub fn with_no_in(&self, no_in: bool) -> ParseCtx {
    ParseCtx { no_in, ..*self }
  }
}

#[derive(Debug)]
#[must_use]
pub struct MaybeToken {
  typ: TT,
  loc: Loc,
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<Loc> {
    if self.matched {
      Some(self.loc)
    } else {
      None
    }
  }

  pub fn error(&self, err: SyntaxErrorType) -> SyntaxError {
    debug_assert!(!self.matched);
    self.loc.error(err, Some(self.typ))
  }

  pub fn and_then<R, F: FnOnce() -> SyntaxResult<R>>(self, f: F) -> SyntaxResult<Option<R>> {
    Ok(if self.matched { Some(f()?) } else { None })
  }
}

pub struct ParserCheckpoint {
  next_tok_i: usize,
}

pub struct Parser<'a> {
  source: &'a str,
  // Always ends with exactly one EOF token.
  tokens: Vec<Token>,
  next_tok_i: usize,
}

// We extend this struct with added methods in the various submodules, instead of using free
// functions and passing `&mut Parser` around.
impl<'a> Parser<'a> {
  pub fn new(source: &'a str) -> SyntaxResult<Parser<'a>> {
    Ok(Parser {
      source,
      tokens: lex_all(source)?,
      next_tok_i: 0,
    })
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.source.len())
  }

  pub fn str(&self, loc: Loc) -> &'a str {
    &self.source[loc.0..loc.1]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      next_tok_i: self.next_tok_i,
    }
  }

  /// Range from the first token consumed since `checkpoint` to the last one.
  pub fn since_checkpoint(&self, checkpoint: &ParserCheckpoint) -> Loc {
    let start = self.token_at(checkpoint.next_tok_i).loc.0;
    if self.next_tok_i <= checkpoint.next_tok_i {
      return Loc(start, start);
    };
    Loc(start, self.token_at(self.next_tok_i - 1).loc.1)
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.next_tok_i = checkpoint.next_tok_i;
  }

  /// Runs `f` and wraps its result in a node spanning the tokens it consumed.
  pub fn with_loc<S: Drive + DriveMut>(
    &mut self,
    f: impl FnOnce(&mut Self) -> SyntaxResult<S>,
  ) -> SyntaxResult<Node<S>> {
    let start = self.checkpoint();
    let stx = f(self)?;
    Ok(Node::new(self.since_checkpoint(&start), stx))
  }

  // Reading past the end keeps yielding the EOF token.
  fn token_at(&self, i: usize) -> Token {
    let last = self.tokens.len() - 1;
    self.tokens[i.min(last)].clone()
  }

  fn forward<K: FnOnce(&Token) -> bool>(&mut self, keep: K) -> (bool, Token) {
    let t = self.token_at(self.next_tok_i);
    let k = keep(&t);
    if k {
      self.next_tok_i += 1;
    };
    (k, t)
  }

  pub fn consume(&mut self) -> Token {
    self.forward(|_| true).1
  }

  /// Consumes the next token regardless of type, and returns its raw source code as a string.
  pub fn consume_as_string(&mut self) -> String {
    let loc = self.consume().loc;
    self.string(loc)
  }

  pub fn peek(&mut self) -> Token {
    self.forward(|_| false).1
  }

  pub fn peek_n<const N: usize>(&self) -> [Token; N] {
    std::array::from_fn(|i| self.token_at(self.next_tok_i + i))
  }

  pub fn consume_if(&mut self, typ: TT) -> MaybeToken {
    let (matched, t) = self.forward(|t| t.typ == typ);
    MaybeToken {
      typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn consume_if_pred<F: FnOnce(&Token) -> bool>(&mut self, pred: F) -> MaybeToken {
    let (matched, t) = self.forward(pred);
    MaybeToken {
      typ: t.typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn require_predicate<P: FnOnce(TT) -> bool>(
    &mut self,
    pred: P,
    expected: &'static str,
  ) -> SyntaxResult<Token> {
    let t = self.consume();
    if !pred(t.typ) {
      Err(t.error(SyntaxErrorType::ExpectedSyntax(expected)))
    } else {
      Ok(t)
    }
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    let t = self.consume();
    if t.typ != typ {
      Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }
}
