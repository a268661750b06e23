//! SEGC parser: builds a [`Program`](segc_syntax::ast::Program) from tokens.
pub mod parser;

pub use parser::{Parser, MAX_NESTING};

use segc_syntax::ast::Program;
use segc_syntax::error::Result;
use segc_syntax::token::Token;

/// Parse a complete token sequence into a program.
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse_program()
}
