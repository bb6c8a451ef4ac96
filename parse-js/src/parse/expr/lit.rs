use super::super::ParseCtx;
use super::super::Parser;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitArrExpr;
use crate::ast::expr::lit::LitBoolExpr;
use crate::ast::expr::lit::LitNullExpr;
use crate::ast::expr::lit::LitNumExpr;
use crate::ast::expr::lit::LitObjExpr;
use crate::ast::expr::lit::LitStrExpr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;

fn parse_number(raw: &str) -> Option<f64> {
  match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
    Some(hex) => u64::from_str_radix(hex, 16).ok().map(|v| v as f64),
    None => raw.parse::<f64>().ok(),
  }
}

fn decode_escape(chars: &mut std::str::Chars<'_>, out: &mut String) -> Option<()> {
  let c = chars.next()?;
  match c {
    'b' => out.push('\u{8}'),
    'f' => out.push('\u{c}'),
    'n' => out.push('\n'),
    'r' => out.push('\r'),
    't' => out.push('\t'),
    'v' => out.push('\u{b}'),
    '0' => out.push('\0'),
    // Line continuation.
    '\n' => {}
    '\r' => {
      if chars.clone().next() == Some('\n') {
        chars.next();
      };
    }
    'x' => {
      let hex: String = chars.by_ref().take(2).collect();
      out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
    }
    'u' => {
      let hex: String = if chars.clone().next() == Some('{') {
        chars.next();
        chars.by_ref().take_while(|c| *c != '}').collect()
      } else {
        chars.by_ref().take(4).collect()
      };
      out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
    }
    c => out.push(c),
  };
  Some(())
}

/// Decodes the body of a string literal, excluding the quotes.
pub fn normalise_literal_string(raw: &str) -> Option<String> {
  let mut out = String::with_capacity(raw.len());
  let mut chars = raw.chars();
  while let Some(c) = chars.next() {
    if c == '\\' {
      decode_escape(&mut chars, &mut out)?;
    } else {
      out.push(c);
    };
  }
  Some(out)
}

impl<'a> Parser<'a> {
  pub fn lit_arr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitArrExpr>> {
    let ctx = ctx.with_no_in(false);
    self.with_loc(|p| {
      p.require(TT::BracketOpen)?;
      let mut elements = Vec::<LitArrElem>::new();
      loop {
        if p.consume_if(TT::Comma).is_match() {
          elements.push(LitArrElem::Empty);
          continue;
        };
        if p.peek().typ == TT::BracketClose {
          break;
        };
        let rest = p.consume_if(TT::DotDotDot).is_match();
        let value = p.expr(ctx, [TT::Comma, TT::BracketClose])?;
        elements.push(if rest {
          LitArrElem::Rest(value)
        } else {
          LitArrElem::Single(value)
        });
        if p.peek().typ == TT::BracketClose {
          break;
        };
        p.require(TT::Comma)?;
      }
      p.require(TT::BracketClose)?;
      Ok(LitArrExpr { elements })
    })
  }

  pub fn lit_bool(&mut self) -> SyntaxResult<Node<LitBoolExpr>> {
    self.with_loc(|p| {
      let t = p.require_predicate(
        |t| matches!(t, TT::LiteralTrue | TT::LiteralFalse),
        "boolean",
      )?;
      Ok(LitBoolExpr {
        value: t.typ == TT::LiteralTrue,
      })
    })
  }

  pub fn lit_null(&mut self) -> SyntaxResult<Node<LitNullExpr>> {
    self.with_loc(|p| {
      p.require(TT::LiteralNull)?;
      Ok(LitNullExpr {})
    })
  }

  pub fn lit_num_val(&mut self) -> SyntaxResult<f64> {
    let t = self.require(TT::LiteralNumber)?;
    parse_number(self.str(t.loc))
      .ok_or_else(|| t.loc.error(SyntaxErrorType::MalformedLiteralNumber, None))
  }

  pub fn lit_num(&mut self) -> SyntaxResult<Node<LitNumExpr>> {
    self.with_loc(|p| {
      let value = p.lit_num_val()?;
      Ok(LitNumExpr { value })
    })
  }

  pub fn lit_obj(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitObjExpr>> {
    self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let mut members = Vec::new();
      while p.peek().typ != TT::BraceClose {
        members.push(p.obj_member(ctx)?);
        if !p.consume_if(TT::Comma).is_match() {
          break;
        };
      }
      p.require(TT::BraceClose)?;
      Ok(LitObjExpr { members })
    })
  }

  pub fn lit_str_val(&mut self) -> SyntaxResult<String> {
    let t = self.require(TT::LiteralString)?;
    let body = Loc(t.loc.0 + 1, t.loc.1 - 1);
    normalise_literal_string(self.str(body))
      .ok_or_else(|| t.error(SyntaxErrorType::ExpectedSyntax("valid string escape")))
  }

  pub fn lit_str(&mut self) -> SyntaxResult<Node<LitStrExpr>> {
    self.with_loc(|p| {
      let value = p.lit_str_val()?;
      Ok(LitStrExpr { value })
    })
  }
}
