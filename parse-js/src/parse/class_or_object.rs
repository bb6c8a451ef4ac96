use super::expr::pat::is_valid_pattern_identifier;
use super::ParseCtx;
use super::Parser;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ObjMember;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::KEYWORDS_MAPPING;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Parses an object key like `a`, `'a'`, `"a"`, `1`, `[1]`.
  pub fn class_or_obj_key(&mut self, ctx: ParseCtx) -> SyntaxResult<ClassOrObjKey> {
    Ok(if self.consume_if(TT::BracketOpen).is_match() {
      let key = self.expr(ctx.with_no_in(false), [TT::BracketClose])?;
      self.require(TT::BracketClose)?;
      ClassOrObjKey::Computed(key)
    } else {
      ClassOrObjKey::Direct(self.with_loc(|p| {
        let t = p.peek();
        let key = match t.typ {
          TT::LiteralString => p.lit_str_val()?,
          TT::LiteralNumber => p.lit_num_val()?.to_string(),
          TT::Identifier => p.consume_as_string(),
          // Any keyword is allowed as a key.
          t if KEYWORDS_MAPPING.contains_key(&t) => p.consume_as_string(),
          _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("keyword or identifier"))),
        };
        Ok(ClassOrObjMemberDirectKey { key, tt: t.typ })
      })?)
    })
  }

  /// Parses one member of an object literal: `a: 1`, `a`, `a() {}`, `[k]: v`, or `...rest`.
  pub fn obj_member(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ObjMember>> {
    let ctx = ctx.with_no_in(false);
    self.with_loc(|p| {
      if p.consume_if(TT::DotDotDot).is_match() {
        let val = p.expr(ctx, [TT::Comma, TT::BraceClose])?;
        return Ok(ObjMember {
          typ: ObjMemberType::Rest { val },
        });
      };
      let [t0, t1] = p.peek_n::<2>();
      if is_valid_pattern_identifier(t0.typ) && matches!(t1.typ, TT::Comma | TT::BraceClose | TT::Equals) {
        // `{ a = 1 }` is only valid once reinterpreted as a pattern, which keeps the default.
        let id = p.with_loc(|p| {
          let name = p.consume_as_string();
          Ok(IdExpr { name })
        })?;
        let typ = if p.consume_if(TT::Equals).is_match() {
          let default_value = p.expr(ctx, [TT::Comma, TT::BraceClose])?;
          ObjMemberType::Valued {
            key: ClassOrObjKey::Direct(Node::new(id.loc, ClassOrObjMemberDirectKey {
              key: id.stx.name.clone(),
              tt: TT::Identifier,
            })),
            val: super::expr::util::shorthand_with_default(id, default_value),
          }
        } else {
          ObjMemberType::Shorthand { id }
        };
        return Ok(ObjMember { typ });
      };
      let key = p.class_or_obj_key(ctx)?;
      if p.peek().typ == TT::ParenthesisOpen {
        let func = p.func_params_and_body(ctx, false)?;
        return Ok(ObjMember {
          typ: ObjMemberType::Method { key, func },
        });
      };
      p.require(TT::Colon)?;
      let val = p.expr(ctx, [TT::Comma, TT::BraceClose])?;
      Ok(ObjMember {
        typ: ObjMemberType::Valued { key, val },
      })
    })
  }
}
