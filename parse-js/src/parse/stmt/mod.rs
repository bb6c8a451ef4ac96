pub mod decl;

use super::expr::util::lhs_expr_to_assign_target;
use super::expr::Asi;
use super::ParseCtx;
use super::Parser;
use crate::ast::node::Node;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::BreakStmt;
use crate::ast::stmt::CatchBlock;
use crate::ast::stmt::ContinueStmt;
use crate::ast::stmt::DoWhileStmt;
use crate::ast::stmt::EmptyStmt;
use crate::ast::stmt::ExprStmt;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForInStmt;
use crate::ast::stmt::ForOfStmt;
use crate::ast::stmt::ForTripleStmt;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::IfStmt;
use crate::ast::stmt::ReturnStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::ThrowStmt;
use crate::ast::stmt::TryStmt;
use crate::ast::stmt::WhileStmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::operator::OperatorName;
use crate::token::TT;
use decl::VarDeclParseMode;

impl<'a> Parser<'a> {
  pub fn stmts(&mut self, ctx: ParseCtx, end: TT) -> SyntaxResult<Vec<Node<Stmt>>> {
    let mut stmts = Vec::new();
    while self.peek().typ != end {
      stmts.push(self.stmt(ctx)?);
    }
    Ok(stmts)
  }

  pub fn stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let t0 = self.peek();
    #[rustfmt::skip]
    let stmt: Node<Stmt> = match t0.typ {
      TT::BraceOpen => self.block_stmt(ctx)?.into_wrapped(),
      TT::KeywordBreak => self.break_stmt()?.into_wrapped(),
      TT::KeywordConst | TT::KeywordLet | TT::KeywordVar => self.var_decl(ctx, VarDeclParseMode::Asi)?.into_wrapped(),
      TT::KeywordContinue => self.continue_stmt()?.into_wrapped(),
      TT::KeywordDo => self.do_while_stmt(ctx)?.into_wrapped(),
      TT::KeywordFor => self.for_stmt(ctx)?,
      TT::KeywordFunction => self.func_decl(ctx)?.into_wrapped(),
      TT::KeywordIf => self.if_stmt(ctx)?.into_wrapped(),
      TT::KeywordReturn => self.return_stmt(ctx)?.into_wrapped(),
      TT::KeywordThrow => self.throw_stmt(ctx)?.into_wrapped(),
      TT::KeywordTry => self.try_stmt(ctx)?.into_wrapped(),
      TT::KeywordWhile => self.while_stmt(ctx)?.into_wrapped(),
      TT::Semicolon => self.empty_stmt()?.into_wrapped(),
      _ => self.expr_stmt(ctx)?.into_wrapped(),
    };
    Ok(stmt)
  }

  /// Consumes the end of a simple statement: a semicolon, or nothing where ASI applies.
  fn stmt_end(&mut self) -> SyntaxResult<()> {
    if self.consume_if(TT::Semicolon).is_match() {
      return Ok(());
    };
    let t = self.peek();
    if t.preceded_by_line_terminator || t.typ == TT::BraceClose || t.typ == TT::EOF {
      // Automatic Semicolon Insertion.
      return Ok(());
    };
    Err(t.error(SyntaxErrorType::RequiredTokenNotFound(TT::Semicolon)))
  }

  pub fn block_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<BlockStmt>> {
    self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let body = p.stmts(ctx, TT::BraceClose)?;
      p.require(TT::BraceClose)?;
      Ok(BlockStmt { body })
    })
  }

  pub fn break_stmt(&mut self) -> SyntaxResult<Node<BreakStmt>> {
    self.with_loc(|p| {
      p.require(TT::KeywordBreak)?;
      p.stmt_end()?;
      Ok(BreakStmt {})
    })
  }

  pub fn continue_stmt(&mut self) -> SyntaxResult<Node<ContinueStmt>> {
    self.with_loc(|p| {
      p.require(TT::KeywordContinue)?;
      p.stmt_end()?;
      Ok(ContinueStmt {})
    })
  }

  pub fn do_while_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<DoWhileStmt>> {
    self.with_loc(|p| {
      p.require(TT::KeywordDo)?;
      let body = p.stmt(ctx)?;
      p.require(TT::KeywordWhile)?;
      let condition = p.grouping(ctx)?;
      // A semicolon is always optional after `do ... while (...)`.
      let _ = p.consume_if(TT::Semicolon);
      Ok(DoWhileStmt { condition, body })
    })
  }

  pub fn empty_stmt(&mut self) -> SyntaxResult<Node<EmptyStmt>> {
    self.with_loc(|p| p.require(TT::Semicolon).map(|_| EmptyStmt {}))
  }

  // WARNING: Do not reuse this function for other statements, as this outputs a statement node, not an expression.
  pub fn expr_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ExprStmt>> {
    self.with_loc(|p| {
      let mut asi = Asi::can();
      let expr = p.expr_with_asi(ctx, [TT::Semicolon], &mut asi)?;
      if !asi.did_end_with_asi {
        p.stmt_end()?;
      };
      Ok(ExprStmt { expr })
    })
  }

  /// Parses `for (...;...;...)`, `for (... in ...)`, and `for (... of ...)`.
  pub fn for_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Type {
      In,
      Of,
      Triple,
    }

    let start = self.checkpoint();
    self.require(TT::KeywordFor)?;
    self.require(TT::ParenthesisOpen)?;
    let header_ctx = ctx.with_no_in(true);
    let (lhs, typ) = match self.peek().typ {
      TT::KeywordVar | TT::KeywordConst | TT::KeywordLet => {
        let decl = self.var_decl(header_ctx, VarDeclParseMode::Leftmost)?;
        let typ = match self.peek().typ {
          TT::KeywordIn => Type::In,
          TT::KeywordOf => Type::Of,
          _ => Type::Triple,
        };
        (Some(ForInOfLhs::Decl(decl)), typ)
      }
      TT::Semicolon => (None, Type::Triple),
      _ => {
        let expr = self.expr(header_ctx, [TT::Semicolon, TT::KeywordOf])?;
        match self.peek().typ {
          TT::KeywordIn => (Some(ForInOfLhs::Assign(expr)), Type::In),
          TT::KeywordOf => (Some(ForInOfLhs::Assign(expr)), Type::Of),
          _ => (Some(ForInOfLhs::Assign(expr)), Type::Triple),
        }
      }
    };

    let stmt: Node<Stmt> = match typ {
      Type::Triple => {
        let init = match lhs {
          None => ForTripleStmtInit::None,
          Some(ForInOfLhs::Decl(decl)) => ForTripleStmtInit::Decl(decl),
          Some(ForInOfLhs::Assign(expr)) => ForTripleStmtInit::Expr(expr),
        };
        self.require(TT::Semicolon)?;
        let cond = if self.peek().typ == TT::Semicolon {
          None
        } else {
          Some(self.expr(ctx, [TT::Semicolon])?)
        };
        self.require(TT::Semicolon)?;
        let post = if self.peek().typ == TT::ParenthesisClose {
          None
        } else {
          Some(self.expr(ctx, [TT::ParenthesisClose])?)
        };
        self.require(TT::ParenthesisClose)?;
        let body = self.stmt(ctx)?;
        let loc = self.since_checkpoint(&start);
        Node::new(loc, ForTripleStmt {
          init,
          cond,
          post,
          body,
        })
        .into_wrapped()
      }
      Type::In | Type::Of => {
        let lhs = match lhs {
          Some(ForInOfLhs::Decl(decl)) => {
            if decl.stx.declarators.len() != 1 {
              return Err(decl.error(SyntaxErrorType::ExpectedSyntax("single declarator")));
            };
            ForInOfLhs::Decl(decl)
          }
          Some(ForInOfLhs::Assign(expr)) => {
            ForInOfLhs::Assign(lhs_expr_to_assign_target(expr, OperatorName::Assignment)?)
          }
          None => return Err(self.peek().error(SyntaxErrorType::ExpectedNotFound)),
        };
        self.consume();
        let rhs = self.expr(ctx, [TT::ParenthesisClose])?;
        self.require(TT::ParenthesisClose)?;
        let body = self.stmt(ctx)?;
        let loc = self.since_checkpoint(&start);
        if typ == Type::In {
          Node::new(loc, ForInStmt { lhs, rhs, body }).into_wrapped()
        } else {
          Node::new(loc, ForOfStmt { lhs, rhs, body }).into_wrapped()
        }
      }
    };
    Ok(stmt)
  }

  pub fn if_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<IfStmt>> {
    self.with_loc(|p| {
      p.require(TT::KeywordIf)?;
      let test = p.grouping(ctx)?;
      let consequent = p.stmt(ctx)?;
      let alternate = p.consume_if(TT::KeywordElse).and_then(|| p.stmt(ctx))?;
      Ok(IfStmt {
        test,
        consequent,
        alternate,
      })
    })
  }

  pub fn return_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ReturnStmt>> {
    self.with_loc(|p| {
      p.require(TT::KeywordReturn)?;
      let t = p.peek();
      let value = if t.preceded_by_line_terminator || t.typ == TT::BraceClose || t.typ == TT::EOF {
        // Automatic Semicolon Insertion.
        None
      } else if p.consume_if(TT::Semicolon).is_match() {
        None
      } else {
        let mut asi = Asi::can();
        let value = p.expr_with_asi(ctx, [TT::Semicolon], &mut asi)?;
        if !asi.did_end_with_asi {
          p.stmt_end()?;
        };
        Some(value)
      };
      Ok(ReturnStmt { value })
    })
  }

  pub fn throw_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ThrowStmt>> {
    self.with_loc(|p| {
      let start = p.require(TT::KeywordThrow)?;
      if p.peek().preceded_by_line_terminator {
        // Illegal under Automatic Semicolon Insertion rules.
        return Err(start.error(SyntaxErrorType::ExpectedSyntax("expression on same line as throw")));
      };
      let mut asi = Asi::can();
      let value = p.expr_with_asi(ctx, [TT::Semicolon], &mut asi)?;
      if !asi.did_end_with_asi {
        p.stmt_end()?;
      };
      Ok(ThrowStmt { value })
    })
  }

  pub fn try_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<TryStmt>> {
    self.with_loc(|p| {
      let start = p.require(TT::KeywordTry)?;
      let wrapped = p.block_stmt(ctx)?;
      let catch = if p.peek().typ == TT::KeywordCatch {
        Some(p.with_loc(|p| {
          p.require(TT::KeywordCatch)?;
          let parameter = p.consume_if(TT::ParenthesisOpen).and_then(|| {
            let pattern = p.pat_decl(ctx)?;
            p.require(TT::ParenthesisClose)?;
            Ok(pattern)
          })?;
          p.require(TT::BraceOpen)?;
          let body = p.stmts(ctx, TT::BraceClose)?;
          p.require(TT::BraceClose)?;
          Ok(CatchBlock { parameter, body })
        })?)
      } else {
        None
      };
      let finally = p.consume_if(TT::KeywordFinally).and_then(|| p.block_stmt(ctx))?;
      if catch.is_none() && finally.is_none() {
        return Err(start.error(SyntaxErrorType::TryStatementHasNoCatchOrFinally));
      };
      Ok(TryStmt {
        wrapped,
        catch,
        finally,
      })
    })
  }

  pub fn while_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<WhileStmt>> {
    self.with_loc(|p| {
      p.require(TT::KeywordWhile)?;
      let condition = p.grouping(ctx)?;
      let body = p.stmt(ctx)?;
      Ok(WhileStmt { condition, body })
    })
  }
}
