//! # Filter Language - Abstract Syntax Tree
//!
//! This module defines the expression tree of the filter language and its
//! canonical text rendering.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens; operators double as node operators
//! - **[expressions]** - The [`Expr`] sum type, constructors and rendering
//! - **[node]** - The [`Node`] contract and the [`Expression`] marker
//!
//! ## Rendering
//!
//! Every node renders through [`Display`](std::fmt::Display) (or
//! [`Expr::render`]). Rendering is total: an operator node missing one of its
//! operands renders as the empty string instead of failing.
//!
//! | Variant             | Output                         |
//! |---------------------|--------------------------------|
//! | `Group`             | children concatenated          |
//! | `Binary`            | `lhs op rhs`                   |
//! | `Unary`             | `op operand`                   |
//! | `Ternary`           | `lhs op rhs rhs2`              |
//! | `VariableReference` | identifier, quoted when needed |
//! | `NumberLiteral`     | `3.000`                        |
//! | `BooleanLiteral`    | `true` / `false`               |
//! | `StringLiteral`     | `'text'`                       |
//! | `TimeLiteral`       | `2021-01-02 03:04:05.250` UTC  |
//!
//! ## Example
//!
//! ```
//! use filter_ast::ast::{Expr, Token};
//!
//! let expr = Expr::binary(
//!     Token::And,
//!     Some(Expr::binary(Token::Gt, Some(Expr::var("cpu")), Some(Expr::number(80.0)))),
//!     Some(Expr::unary(Token::Not, Some(Expr::var("idle")))),
//! );
//!
//! assert_eq!(expr.render(), "cpu > 80.000 AND NOT idle");
//! ```
pub mod expressions;
pub mod node;
pub mod tokens;

pub use expressions::Expr;
pub use node::{Expression, Node};
pub use tokens::{Token, UnknownOperator};
