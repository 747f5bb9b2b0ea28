//! Surface syntax: text to tree and back.

pub mod format;
pub mod lexeme;
pub mod lexer;
pub mod parser;
pub mod span;
