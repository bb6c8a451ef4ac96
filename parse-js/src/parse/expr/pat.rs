use super::super::ParseCtx;
use super::super::Parser;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::expr::pat::ArrPat;
use crate::ast::expr::pat::ArrPatElem;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::pat::ObjPat;
use crate::ast::expr::pat::ObjPatProp;
use crate::ast::expr::pat::Pat;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;
use crate::token::UNRESERVED_KEYWORDS;

pub fn is_valid_pattern_identifier(typ: TT) -> bool {
  typ == TT::Identifier || UNRESERVED_KEYWORDS.contains(&typ)
}

impl<'a> Parser<'a> {
  pub fn maybe_class_or_func_name(&mut self) -> Option<Node<ClassOrFuncName>> {
    self
      .consume_if_pred(|t| is_valid_pattern_identifier(t.typ))
      .match_loc()
      .map(|loc| Node::new(loc, ClassOrFuncName {
        name: self.string(loc),
      }))
  }

  /// Parses an identifier pattern.
  pub fn id_pat(&mut self) -> SyntaxResult<Node<IdPat>> {
    self.with_loc(|p| {
      let t = p.consume();
      if !is_valid_pattern_identifier(t.typ) {
        return Err(t.error(SyntaxErrorType::ExpectedSyntax("identifier")));
      }
      Ok(IdPat {
        name: p.string(t.loc),
      })
    })
  }

  /// Parses a declaring pattern: an identifier, object pattern, or array pattern.
  pub fn pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Pat>> {
    Ok(match self.peek().typ {
      TT::BraceOpen => self.obj_pat(ctx)?.into_wrapped(),
      TT::BracketOpen => self.arr_pat(ctx)?.into_wrapped(),
      _ => self.id_pat()?.into_wrapped(),
    })
  }

  /// Parses an object pattern like `{ x, y: z, [computed]: value, ...rest }`.
  /// An object pattern may only contain one rest element, which must not have a trailing comma.
  pub fn obj_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ObjPat>> {
    let ctx = ctx.with_no_in(false);
    self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let mut properties = Vec::new();
      let mut rest = None;
      while p.peek().typ != TT::BraceClose {
        // Check inside loop to ensure that it must come first or after a comma.
        if p.consume_if(TT::DotDotDot).is_match() {
          rest = Some(p.id_pat()?.into_wrapped());
          break;
        };

        let prop = p.with_loc(|p| {
          let key = p.class_or_obj_key(ctx)?;
          let (shorthand, target) = if p.consume_if(TT::Colon).is_match() {
            // There's a colon, so there's a subpattern and it's not a shorthand.
            (false, p.pat(ctx)?)
          } else {
            // There's no colon, so it's a shorthand. The key must be a valid identifier.
            match &key {
              ClassOrObjKey::Computed(name) => {
                return Err(name.error(SyntaxErrorType::ExpectedSyntax(
                  "object pattern property subpattern",
                )));
              }
              ClassOrObjKey::Direct(n) => {
                if !is_valid_pattern_identifier(n.stx.tt) {
                  return Err(n.error(SyntaxErrorType::ExpectedSyntax("identifier")));
                }
                let id_pat = Node::new(n.loc, IdPat {
                  name: n.stx.key.clone(),
                });
                (true, id_pat.into_wrapped())
              }
            }
          };
          let default_value = p
            .consume_if(TT::Equals)
            .and_then(|| p.expr(ctx, [TT::Comma, TT::BraceClose]))?;
          Ok(ObjPatProp {
            key,
            target,
            default_value,
            shorthand,
          })
        })?;
        properties.push(prop);
        // This will break if `}`.
        if !p.consume_if(TT::Comma).is_match() {
          break;
        };
      }
      p.require(TT::BraceClose)?;
      Ok(ObjPat { properties, rest })
    })
  }

  /// Parses an array pattern like `[a, , b = c, ...rest]`.
  pub fn arr_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ArrPat>> {
    let ctx = ctx.with_no_in(false);
    self.with_loc(|p| {
      p.require(TT::BracketOpen)?;
      let mut elements = Vec::<Option<ArrPatElem>>::new();
      let mut rest = None;
      while p.peek().typ != TT::BracketClose {
        if p.consume_if(TT::DotDotDot).is_match() {
          rest = Some(p.pat(ctx)?);
          break;
        };
        // An unnamed element.
        if p.consume_if(TT::Comma).is_match() {
          elements.push(None);
          continue;
        };
        let target = p.pat(ctx)?;
        let default_value = p
          .consume_if(TT::Equals)
          .and_then(|| p.expr(ctx, [TT::Comma, TT::BracketClose]))?;
        elements.push(Some(ArrPatElem {
          target,
          default_value,
        }));
        // This will break if `]`.
        if !p.consume_if(TT::Comma).is_match() {
          break;
        };
      }
      p.require(TT::BracketClose)?;
      Ok(ArrPat { elements, rest })
    })
  }
}
