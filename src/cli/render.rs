//! Render a JSON-encoded expression tree to canonical text

use super::CliError;
use crate::Expr;

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// JSON-encoded tree
    pub input: Option<String>,
}

/// Decode the tree and render it.
///
/// # Example
/// ```
/// use filter_ast::cli::{RenderOptions, execute_render};
///
/// let options = RenderOptions {
///     input: Some(r#"{"type": "unary", "op": "NOT", "operand": {"type": "variable_reference", "name": "idle"}}"#.to_string()),
/// };
/// assert_eq!(execute_render(&options).unwrap(), "NOT idle");
/// ```
#[tracing::instrument(skip_all)]
pub fn execute_render(options: &RenderOptions) -> Result<String, CliError> {
    let json = options.input.as_ref().ok_or(CliError::NoInput)?;
    let expr: Expr = serde_json::from_str(json)?;
    tracing::debug!(id = expr.id(), leaf = expr.is_leaf(), "decoded expression");
    Ok(expr.render())
}
