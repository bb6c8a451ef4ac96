use crate::loc::Loc;
use crate::token::TT;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedNotFound,
  ExpectedSyntax(&'static str),
  InvalidAssigmentTarget,
  InvalidCharacter,
  LineTerminatorInString,
  MalformedLiteralNumber,
  RequiredTokenNotFound(TT),
  TryStatementHasNoCatchOrFinally,
  UnexpectedEnd,
  UnterminatedComment,
}

impl SyntaxErrorType {
  pub fn message(&self) -> String {
    match self {
      SyntaxErrorType::ExpectedNotFound => "expected syntax not found".to_string(),
      SyntaxErrorType::ExpectedSyntax(expected) => format!("expected {expected}"),
      SyntaxErrorType::InvalidAssigmentTarget => "invalid assignment target".to_string(),
      SyntaxErrorType::InvalidCharacter => "invalid character".to_string(),
      SyntaxErrorType::LineTerminatorInString => "line terminator in string".to_string(),
      SyntaxErrorType::MalformedLiteralNumber => "malformed number literal".to_string(),
      SyntaxErrorType::RequiredTokenNotFound(tt) => format!("expected token {tt:?}"),
      SyntaxErrorType::TryStatementHasNoCatchOrFinally => {
        "try statement has no catch or finally".to_string()
      }
      SyntaxErrorType::UnexpectedEnd => "unexpected end of input".to_string(),
      SyntaxErrorType::UnterminatedComment => "unterminated comment".to_string(),
    }
  }
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} around loc [{}:{}]", self, self.loc.0, self.loc.1)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.typ.message())?;
    if let Some(actual) = self.actual_token {
      write!(f, " (found {actual:?})")?;
    };
    Ok(())
  }
}

impl Error for SyntaxError {}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
