pub mod ast;
pub mod error;
pub mod lexer;
pub mod quote;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Expr, Expression, Node, Token};
pub use error::{LexError, Position};
pub use lexer::{Lexer, tokenize};
pub use quote::{is_bare_ident, quote, quote_ident};
