use ast::node::Node;
use ast::stmt::TopLevel;
use error::SyntaxResult;
use parse::Parser;

pub mod ast;
pub mod char;
pub mod error;
pub mod lex;
pub mod loc;
pub mod operator;
pub mod parse;
pub mod token;

pub fn parse(source: &str) -> SyntaxResult<Node<TopLevel>> {
  let mut parser = Parser::new(source)?;
  parser.parse_top_level()
}
