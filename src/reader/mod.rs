pub mod detect;
pub(crate) mod lexer;
pub mod parser;
