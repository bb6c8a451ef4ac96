use crate::error::SyntaxErrorType;
use crate::lex::lex_all;
use crate::lex::lex_next;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::TT;
use crate::token::TT::*;

fn check<const N: usize>(code: &str, expecteds: [TT; N]) {
  let mut lexer = Lexer::new(code);
  for expected in expecteds {
    let t = lex_next(&mut lexer).unwrap();
    assert_eq!(t.typ, expected);
  }
  let t = lex_next(&mut lexer).unwrap();
  assert_eq!(EOF, t.typ);
}

fn check_error(code: &str, expected: SyntaxErrorType) {
  let err = lex_all(code).unwrap_err();
  assert_eq!(err.typ, expected);
}

#[test]
fn test_lex_keywords() {
  check("let", [KeywordLet]);
  check("const", [KeywordConst]);
  check("instanceof", [KeywordInstanceof]);
  check("letter constant", [Identifier, Identifier]);
}

#[test]
fn test_lex_identifiers() {
  check("h929", [Identifier]);
  check("$a _b x$1", [Identifier, Identifier, Identifier]);
}

#[test]
fn test_lex_literal_numbers() {
  check("1", [LiteralNumber]);
  check("929", [LiteralNumber]);
  check(".929", [LiteralNumber]);
  check(". 929", [Dot, LiteralNumber]);
  check(". 929.2.", [Dot, LiteralNumber, Dot]);
  check(".929.2..", [LiteralNumber, LiteralNumber, Dot, Dot]);
  check("0xff 1e10 2.5E-3", [LiteralNumber, LiteralNumber, LiteralNumber]);
  check("?.929", [Question, LiteralNumber]);
  check_error("3in", SyntaxErrorType::MalformedLiteralNumber);
  check_error("0x", SyntaxErrorType::MalformedLiteralNumber);
}

#[test]
fn test_lex_literal_strings() {
  check("'hello world'", [LiteralString]);
  check(r#""it's \"quoted\"""#, [LiteralString]);
  check("'line \\\ncontinued'", [LiteralString]);
  check_error("'hello world\n'", SyntaxErrorType::LineTerminatorInString);
  check_error("'unterminated", SyntaxErrorType::UnexpectedEnd);
}

#[test]
fn test_lex_punctuators() {
  check("=== !== => ...", [
    EqualsEqualsEquals,
    ExclamationEqualsEquals,
    EqualsChevronRight,
    DotDotDot,
  ]);
  check("a+++b", [Identifier, PlusPlus, Plus, Identifier]);
  check("x??=", [Identifier, QuestionQuestionEquals]);
  check("<< <<= >> >>= >>> >>>= >>>>", [
    ChevronLeftChevronLeft,
    ChevronLeftChevronLeftEquals,
    ChevronRightChevronRight,
    ChevronRightChevronRightEquals,
    ChevronRightChevronRightChevronRight,
    ChevronRightChevronRightChevronRightEquals,
    ChevronRightChevronRightChevronRight,
    ChevronRight,
  ]);
  check("a**=b&&=c||=d", [
    Identifier,
    AsteriskAsteriskEquals,
    Identifier,
    AmpersandAmpersandEquals,
    Identifier,
    BarBarEquals,
    Identifier,
  ]);
  check_error("#", SyntaxErrorType::InvalidCharacter);
}

#[test]
fn test_lex_comments() {
  check("// a\nlet /* b */ x", [KeywordLet, Identifier]);
  check_error("/* open", SyntaxErrorType::UnterminatedComment);
}

#[test]
fn test_line_terminator_flag() {
  let tokens = lex_all("a\nb /*\n*/ c d").unwrap();
  let flags = tokens
    .iter()
    .map(|t| t.preceded_by_line_terminator)
    .collect::<Vec<_>>();
  assert_eq!(flags, vec![false, true, true, false, false]);
}

#[test]
fn test_token_locations() {
  let tokens = lex_all("let  foo = 1;").unwrap();
  let locs = tokens.iter().map(|t| t.loc).collect::<Vec<_>>();
  assert_eq!(locs, vec![
    Loc(0, 3),
    Loc(5, 8),
    Loc(9, 10),
    Loc(11, 12),
    Loc(12, 13),
    Loc(13, 13),
  ]);
}
