//! Lexer, parser, and AST for the Bramble language

pub mod analysis;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::Lexer;
pub use parser::Parser;

use crate::error::SyntaxError;
use ast::Program;

/// Lex and parse a source string into a program.
///
/// Lexer errors are reported without attempting to parse; otherwise all
/// parser errors are collected.
pub fn parse(source: &str) -> Result<Program, Vec<SyntaxError>> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse()
}
