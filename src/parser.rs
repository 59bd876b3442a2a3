use crate::{
    ast::Node,
    error::ParserError,
    lexer::{Lexer, Token},
};
use lalrpop_util::{lalrpop_mod, ParseError};

lalrpop_mod!(grammar);

use self::grammar::TreeParser;

pub type ExprParseError<'a> = ParseError<usize, Token<'a>, ParserError>;

/// Parses a targeting expression into a tree. The parser performs no
/// interning and no config lookups; validate the tree with
/// [`all_variables_in_config`](crate::all_variables_in_config) and
/// [`all_bounded_strings_valid`](crate::all_bounded_strings_valid), then
/// run the compiler passes.
#[inline]
pub fn parse(input: &str) -> Result<Node, ExprParseError<'_>> {
    let lexer = Lexer::new(input);
    TreeParser::new().parse(lexer)
}
