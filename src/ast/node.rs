use std::fmt;

use crate::ast::Expr;

/// Any node of a filter-language tree.
///
/// `Display` is the rendering entry point. Consumers holding a `&dyn Node`
/// use [`Node::as_expression`] to tell expression nodes apart from other
/// node kinds.
pub trait Node: fmt::Display {
    /// Opaque identity tag, never rendered.
    fn id(&self) -> &str;

    /// Auxiliary string arguments; reserved, empty for every expression.
    fn arguments(&self) -> Vec<String> {
        Vec::new()
    }

    fn as_expression(&self) -> Option<&dyn Expression> {
        None
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

/// Marker for nodes that are expressions.
pub trait Expression: Node {}

impl<Op: fmt::Display> Node for Expr<Op> {
    fn id(&self) -> &str {
        Expr::id(self)
    }

    fn arguments(&self) -> Vec<String> {
        Expr::arguments(self)
    }

    fn as_expression(&self) -> Option<&dyn Expression> {
        Some(self)
    }
}

impl<Op: fmt::Display> Expression for Expr<Op> {}
