use crate::char::is_id_continue;
use crate::char::is_id_start;
use crate::char::is_line_terminator;
use crate::char::is_whitespace;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use ahash::HashMap;
use ahash::HashMapExt;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use core::ops::Index;
use memchr::memchr;
use memchr::memmem;
use once_cell::sync::Lazy;

#[cfg(test)]
mod tests;

pub static KEYWORDS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::KeywordBreak, "break");
  map.insert(TT::KeywordCatch, "catch");
  map.insert(TT::KeywordConst, "const");
  map.insert(TT::KeywordContinue, "continue");
  map.insert(TT::KeywordDelete, "delete");
  map.insert(TT::KeywordDo, "do");
  map.insert(TT::KeywordElse, "else");
  map.insert(TT::KeywordFinally, "finally");
  map.insert(TT::KeywordFor, "for");
  map.insert(TT::KeywordFunction, "function");
  map.insert(TT::KeywordIf, "if");
  map.insert(TT::KeywordIn, "in");
  map.insert(TT::KeywordInstanceof, "instanceof");
  map.insert(TT::KeywordLet, "let");
  map.insert(TT::KeywordNew, "new");
  map.insert(TT::KeywordOf, "of");
  map.insert(TT::KeywordReturn, "return");
  map.insert(TT::KeywordThis, "this");
  map.insert(TT::KeywordThrow, "throw");
  map.insert(TT::KeywordTry, "try");
  map.insert(TT::KeywordTypeof, "typeof");
  map.insert(TT::KeywordVar, "var");
  map.insert(TT::KeywordVoid, "void");
  map.insert(TT::KeywordWhile, "while");
  map.insert(TT::LiteralFalse, "false");
  map.insert(TT::LiteralNull, "null");
  map.insert(TT::LiteralTrue, "true");
  map
});

static KEYWORD_STRS: Lazy<HashMap<&'static [u8], TT>> = Lazy::new(|| {
  KEYWORDS_MAPPING
    .iter()
    .map(|(tt, kw)| (kw.as_bytes(), *tt))
    .collect()
});

struct Punctuators {
  matcher: AhoCorasick,
  types: Vec<TT>,
}

#[rustfmt::skip]
static PUNCTUATORS: Lazy<Punctuators> = Lazy::new(|| {
  let entries: &[(TT, &str)] = &[
    (TT::Ampersand, "&"),
    (TT::AmpersandAmpersand, "&&"),
    (TT::AmpersandAmpersandEquals, "&&="),
    (TT::AmpersandEquals, "&="),
    (TT::Asterisk, "*"),
    (TT::AsteriskAsterisk, "**"),
    (TT::AsteriskAsteriskEquals, "**="),
    (TT::AsteriskEquals, "*="),
    (TT::Bar, "|"),
    (TT::BarBar, "||"),
    (TT::BarBarEquals, "||="),
    (TT::BarEquals, "|="),
    (TT::BraceClose, "}"),
    (TT::BraceOpen, "{"),
    (TT::BracketClose, "]"),
    (TT::BracketOpen, "["),
    (TT::Caret, "^"),
    (TT::CaretEquals, "^="),
    (TT::ChevronLeft, "<"),
    (TT::ChevronLeftChevronLeft, "<<"),
    (TT::ChevronLeftChevronLeftEquals, "<<="),
    (TT::ChevronLeftEquals, "<="),
    (TT::ChevronRight, ">"),
    (TT::ChevronRightChevronRight, ">>"),
    (TT::ChevronRightChevronRightChevronRight, ">>>"),
    (TT::ChevronRightChevronRightChevronRightEquals, ">>>="),
    (TT::ChevronRightChevronRightEquals, ">>="),
    (TT::ChevronRightEquals, ">="),
    (TT::Colon, ":"),
    (TT::Comma, ","),
    (TT::Dot, "."),
    (TT::DotDotDot, "..."),
    (TT::Equals, "="),
    (TT::EqualsChevronRight, "=>"),
    (TT::EqualsEquals, "=="),
    (TT::EqualsEqualsEquals, "==="),
    (TT::Exclamation, "!"),
    (TT::ExclamationEquals, "!="),
    (TT::ExclamationEqualsEquals, "!=="),
    (TT::Hyphen, "-"),
    (TT::HyphenEquals, "-="),
    (TT::HyphenHyphen, "--"),
    (TT::ParenthesisClose, ")"),
    (TT::ParenthesisOpen, "("),
    (TT::Percent, "%"),
    (TT::PercentEquals, "%="),
    (TT::Plus, "+"),
    (TT::PlusEquals, "+="),
    (TT::PlusPlus, "++"),
    (TT::Question, "?"),
    (TT::QuestionQuestion, "??"),
    (TT::QuestionQuestionEquals, "??="),
    (TT::Semicolon, ";"),
    (TT::Slash, "/"),
    (TT::SlashEquals, "/="),
    (TT::Tilde, "~"),
  ];
  let matcher = AhoCorasickBuilder::new()
    .match_kind(MatchKind::LeftmostLongest)
    .start_kind(StartKind::Anchored)
    .build(entries.iter().map(|(_, pat)| *pat))
    .unwrap();
  Punctuators {
    matcher,
    types: entries.iter().map(|(tt, _)| *tt).collect(),
  }
});

pub struct Lexer<'a> {
  source: &'a [u8],
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(source: &'a str) -> Lexer<'a> {
    Lexer {
      source: source.as_bytes(),
      next: 0,
    }
  }

  pub fn next(&self) -> usize {
    self.next
  }

  pub fn at_end(&self) -> bool {
    self.next >= self.source.len()
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.source.len())
  }

  fn peek_or_eof(&self, n: usize) -> Option<u8> {
    self.source.get(self.next + n).copied()
  }

  fn remaining(&self) -> &'a [u8] {
    &self.source[self.next..]
  }

  fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
    while self.peek_or_eof(0).is_some_and(&pred) {
      self.next += 1;
    }
  }

  fn eof_range(&self) -> Loc {
    Loc(self.source.len(), self.source.len())
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = [u8];

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}

/// Skips whitespace and comments, returning whether a line terminator was crossed.
fn skip_insignificant(lexer: &mut Lexer<'_>) -> SyntaxResult<bool> {
  let mut preceded_by_line_terminator = false;
  loop {
    match (lexer.peek_or_eof(0), lexer.peek_or_eof(1)) {
      (Some(c), _) if is_line_terminator(c) => {
        preceded_by_line_terminator = true;
        lexer.next += 1;
      }
      (Some(c), _) if is_whitespace(c) => lexer.next += 1,
      (Some(b'/'), Some(b'/')) => {
        match memchr(b'\n', lexer.remaining()) {
          Some(i) => lexer.next += i,
          None => lexer.next = lexer.source.len(),
        };
      }
      (Some(b'/'), Some(b'*')) => {
        let start = lexer.next;
        let body = &lexer.remaining()[2..];
        let Some(end) = memmem::find(body, b"*/") else {
          return Err(
            Loc(start, lexer.source.len()).error(SyntaxErrorType::UnterminatedComment, None),
          );
        };
        preceded_by_line_terminator |= body[..end].iter().any(|c| is_line_terminator(*c));
        lexer.next += 2 + end + 2;
      }
      _ => break,
    };
  }
  Ok(preceded_by_line_terminator)
}

fn lex_identifier(lexer: &mut Lexer<'_>) -> TT {
  let start = lexer.next;
  lexer.next += 1;
  lexer.skip_while(is_id_continue);
  KEYWORD_STRS
    .get(&lexer.source[start..lexer.next])
    .copied()
    .unwrap_or(TT::Identifier)
}

fn lex_number(lexer: &mut Lexer<'_>) -> SyntaxResult<TT> {
  let start = lexer.next;
  if lexer.peek_or_eof(0) == Some(b'0') && matches!(lexer.peek_or_eof(1), Some(b'x' | b'X')) {
    lexer.next += 2;
    let digits = lexer.next;
    lexer.skip_while(|c| c.is_ascii_hexdigit());
    if lexer.next == digits {
      return Err(Loc(start, lexer.next).error(SyntaxErrorType::MalformedLiteralNumber, None));
    };
  } else {
    lexer.skip_while(|c| c.is_ascii_digit());
    if lexer.peek_or_eof(0) == Some(b'.') {
      lexer.next += 1;
      lexer.skip_while(|c| c.is_ascii_digit());
    };
    if matches!(lexer.peek_or_eof(0), Some(b'e' | b'E')) {
      lexer.next += 1;
      if matches!(lexer.peek_or_eof(0), Some(b'+' | b'-')) {
        lexer.next += 1;
      };
      let digits = lexer.next;
      lexer.skip_while(|c| c.is_ascii_digit());
      if lexer.next == digits {
        return Err(Loc(start, lexer.next).error(SyntaxErrorType::MalformedLiteralNumber, None));
      };
    };
  };
  // A number must not run directly into an identifier, e.g. `3in` or `1x`.
  if lexer.peek_or_eof(0).is_some_and(is_id_start) {
    return Err(Loc(start, lexer.next + 1).error(SyntaxErrorType::MalformedLiteralNumber, None));
  };
  Ok(TT::LiteralNumber)
}

fn lex_string(lexer: &mut Lexer<'_>) -> SyntaxResult<TT> {
  let start = lexer.next;
  let quote = lexer.source[start];
  lexer.next += 1;
  loop {
    match lexer.peek_or_eof(0) {
      None => return Err(Loc(start, lexer.next).error(SyntaxErrorType::UnexpectedEnd, None)),
      Some(b'\\') => {
        // Line continuations (`\` followed by a line terminator) are allowed.
        lexer.next += 2;
        if lexer.source.get(lexer.next - 1) == Some(&b'\r')
          && lexer.peek_or_eof(0) == Some(b'\n')
        {
          lexer.next += 1;
        };
      }
      Some(c) if c == quote => {
        lexer.next += 1;
        break;
      }
      Some(c) if is_line_terminator(c) => {
        return Err(Loc(start, lexer.next).error(SyntaxErrorType::LineTerminatorInString, None));
      }
      Some(_) => lexer.next += 1,
    };
  }
  Ok(TT::LiteralString)
}

fn lex_punctuator(lexer: &mut Lexer<'_>) -> SyntaxResult<TT> {
  let input = Input::new(lexer.remaining()).anchored(Anchored::Yes);
  let Some(mat) = PUNCTUATORS.matcher.find(input) else {
    return Err(
      Loc(lexer.next, lexer.next + 1).error(SyntaxErrorType::InvalidCharacter, None),
    );
  };
  lexer.next += mat.end();
  Ok(PUNCTUATORS.types[mat.pattern().as_usize()])
}

pub fn lex_next(lexer: &mut Lexer<'_>) -> SyntaxResult<Token> {
  let preceded_by_line_terminator = skip_insignificant(lexer)?;

  // EOF is emitted as a regular token so the parser never has to handle a missing token.
  if lexer.at_end() {
    return Ok(Token {
      loc: lexer.eof_range(),
      typ: TT::EOF,
      preceded_by_line_terminator,
    });
  };

  let start = lexer.next;
  let typ = match (lexer.peek_or_eof(0), lexer.peek_or_eof(1)) {
    (Some(c), _) if is_id_start(c) => lex_identifier(lexer),
    (Some(c), _) if c.is_ascii_digit() => lex_number(lexer)?,
    (Some(b'.'), Some(c)) if c.is_ascii_digit() => lex_number(lexer)?,
    (Some(b'"' | b'\''), _) => lex_string(lexer)?,
    _ => lex_punctuator(lexer)?,
  };
  Ok(Token {
    loc: Loc(start, lexer.next),
    typ,
    preceded_by_line_terminator,
  })
}

/// Lexes the entire source, ending with a single EOF token.
pub fn lex_all(source: &str) -> SyntaxResult<Vec<Token>> {
  let mut lexer = Lexer::new(source);
  let mut tokens = Vec::new();
  loop {
    let token = lex_next(&mut lexer)?;
    let done = token.typ == TT::EOF;
    tokens.push(token);
    if done {
      break;
    };
  }
  Ok(tokens)
}
