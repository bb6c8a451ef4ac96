use super::ParseCtx;
use super::Parser;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Parses `(a, b = 1, ...c)`.
  pub fn func_params(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<ParamDecl>>> {
    let ctx = ctx.with_no_in(false);
    self.require(TT::ParenthesisOpen)?;
    let mut parameters = Vec::new();
    while self.peek().typ != TT::ParenthesisClose {
      let param = self.with_loc(|p| {
        let rest = p.consume_if(TT::DotDotDot).is_match();
        let pattern = p.pat_decl(ctx)?;
        let default_value = if rest {
          None
        } else {
          p.consume_if(TT::Equals)
            .and_then(|| p.expr(ctx, [TT::Comma, TT::ParenthesisClose]))?
        };
        Ok(ParamDecl {
          rest,
          pattern,
          default_value,
        })
      })?;
      let rest = param.stx.rest;
      parameters.push(param);
      // A rest parameter must be last.
      if rest || !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    self.require(TT::ParenthesisClose)?;
    Ok(parameters)
  }

  /// Parses `{ ... }` as the statements of a function body.
  pub fn func_block_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<Stmt>>> {
    let ctx = ctx.with_no_in(false);
    self.require(TT::BraceOpen)?;
    let body = self.stmts(ctx, TT::BraceClose)?;
    self.require(TT::BraceClose)?;
    Ok(body)
  }

  /// Parses the parameters and block body of a non-arrow function, starting from `(`.
  pub fn func_params_and_body(&mut self, ctx: ParseCtx, arrow: bool) -> SyntaxResult<Node<Func>> {
    self.with_loc(|p| {
      let parameters = p.func_params(ctx)?;
      let body = FuncBody::Block(p.func_block_body(ctx)?);
      Ok(Func {
        arrow,
        parameters,
        body,
      })
    })
  }
}
