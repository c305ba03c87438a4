pub use crate::parser_diagnostics::{ParseError, SyntaxError, UnsupportedConstructError};
pub use crate::parsing::{parse, parse_block, parse_expression, parse_statement};

pub mod ast;
pub mod builder;
pub mod parser_diagnostics;
pub mod parsing;
pub mod pos;
pub mod simplify;
