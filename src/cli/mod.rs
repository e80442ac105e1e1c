//! CLI support for filter-ast
//!
//! Programmatic access to the `fexpr` commands so other tools can embed them.

mod render;
mod tokens;

pub use render::{RenderOptions, execute_render};
pub use tokens::{TokensOptions, execute_tokens};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Lex error: {0}")]
    Lex(#[from] crate::LexError),

    #[error("Invalid expression JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
