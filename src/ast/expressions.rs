use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::ast::Token;
use crate::quote::{quote, quote_ident};

/// Expression node of the filter language.
///
/// `Op` is the operator symbol carried by [`Binary`](Expr::Binary),
/// [`Unary`](Expr::Unary) and [`Ternary`](Expr::Ternary) nodes. The tree never
/// interprets it; it only needs a canonical textual form.
///
/// Every variant carries an opaque `id` that is never rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    bound(deserialize = "Op: Deserialize<'de>")
)]
pub enum Expr<Op = Token> {
    /// Transparent container; present children render back to back with no
    /// separator and no brackets.
    Group {
        #[serde(default)]
        id: String,
        #[serde(default)]
        children: Vec<Option<Expr<Op>>>,
    },

    /// Operation between two expressions
    ///
    /// # Example
    /// ```text
    /// cpu > 80.000
    /// ```
    Binary {
        #[serde(default)]
        id: String,
        op: Op,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lhs: Option<Box<Expr<Op>>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rhs: Option<Box<Expr<Op>>>,
    },

    /// Prefix operation on one expression
    ///
    /// # Example
    /// ```text
    /// NOT active
    /// ```
    Unary {
        #[serde(default)]
        id: String,
        op: Op,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operand: Option<Box<Expr<Op>>>,
    },

    /// Operation over three expressions; the operator sits between the first
    /// two and is not repeated before the third.
    ///
    /// # Example
    /// ```text
    /// load BETWEEN 1.000 5.000
    /// ```
    Ternary {
        #[serde(default)]
        id: String,
        op: Op,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lhs: Option<Box<Expr<Op>>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rhs: Option<Box<Expr<Op>>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rhs2: Option<Box<Expr<Op>>>,
    },

    /// Reference to a variable or field
    VariableReference {
        #[serde(default)]
        id: String,
        name: String,
    },

    /// 64-bit floating point literal
    NumberLiteral {
        #[serde(default)]
        id: String,
        value: f64,
    },

    BooleanLiteral {
        #[serde(default)]
        id: String,
        value: bool,
    },

    StringLiteral {
        #[serde(default)]
        id: String,
        value: String,
    },

    /// Point in time; rendered in UTC
    TimeLiteral {
        #[serde(default)]
        id: String,
        value: DateTime<FixedOffset>,
    },
}

impl<Op> Expr<Op> {
    pub fn group<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Option<Expr<Op>>>,
    {
        Expr::Group {
            id: String::new(),
            children: children.into_iter().collect(),
        }
    }

    pub fn binary(op: Op, lhs: Option<Expr<Op>>, rhs: Option<Expr<Op>>) -> Self {
        Expr::Binary {
            id: String::new(),
            op,
            lhs: lhs.map(Box::new),
            rhs: rhs.map(Box::new),
        }
    }

    pub fn unary(op: Op, operand: Option<Expr<Op>>) -> Self {
        Expr::Unary {
            id: String::new(),
            op,
            operand: operand.map(Box::new),
        }
    }

    pub fn ternary(
        op: Op,
        lhs: Option<Expr<Op>>,
        rhs: Option<Expr<Op>>,
        rhs2: Option<Expr<Op>>,
    ) -> Self {
        Expr::Ternary {
            id: String::new(),
            op,
            lhs: lhs.map(Box::new),
            rhs: rhs.map(Box::new),
            rhs2: rhs2.map(Box::new),
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::VariableReference {
            id: String::new(),
            name: name.into(),
        }
    }

    pub fn number(value: f64) -> Self {
        Expr::NumberLiteral {
            id: String::new(),
            value,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Expr::BooleanLiteral {
            id: String::new(),
            value,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::StringLiteral {
            id: String::new(),
            value: value.into(),
        }
    }

    pub fn time<Tz: chrono::TimeZone>(value: DateTime<Tz>) -> Self {
        Expr::TimeLiteral {
            id: String::new(),
            value: value.fixed_offset(),
        }
    }

    /// Replaces the identity tag.
    pub fn with_id(mut self, new_id: impl Into<String>) -> Self {
        match &mut self {
            Expr::Group { id, .. }
            | Expr::Binary { id, .. }
            | Expr::Unary { id, .. }
            | Expr::Ternary { id, .. }
            | Expr::VariableReference { id, .. }
            | Expr::NumberLiteral { id, .. }
            | Expr::BooleanLiteral { id, .. }
            | Expr::StringLiteral { id, .. }
            | Expr::TimeLiteral { id, .. } => *id = new_id.into(),
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            Expr::Group { id, .. }
            | Expr::Binary { id, .. }
            | Expr::Unary { id, .. }
            | Expr::Ternary { id, .. }
            | Expr::VariableReference { id, .. }
            | Expr::NumberLiteral { id, .. }
            | Expr::BooleanLiteral { id, .. }
            | Expr::StringLiteral { id, .. }
            | Expr::TimeLiteral { id, .. } => id,
        }
    }

    /// Auxiliary string arguments of the node. No variant carries any, so
    /// this is always empty.
    pub fn arguments(&self) -> Vec<String> {
        Vec::new()
    }

    /// True for leaf variants (references and literals).
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            Expr::Group { .. } | Expr::Binary { .. } | Expr::Unary { .. } | Expr::Ternary { .. }
        )
    }
}

impl<Op: fmt::Display> Expr<Op> {
    /// Canonical text of the tree. Never fails: a node missing a required
    /// operand renders as the empty string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl<Op: fmt::Display> fmt::Display for Expr<Op> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Group { children, .. } => {
                for child in children.iter().flatten() {
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
            Expr::Binary {
                op,
                lhs: Some(lhs),
                rhs: Some(rhs),
                ..
            } => write!(f, "{} {} {}", lhs, op, rhs),
            Expr::Unary {
                op,
                operand: Some(operand),
                ..
            } => write!(f, "{} {}", op, operand),
            Expr::Ternary {
                op,
                lhs: Some(lhs),
                rhs: Some(rhs),
                rhs2: Some(rhs2),
                ..
            } => write!(f, "{} {} {} {}", lhs, op, rhs, rhs2),
            Expr::Binary { .. } | Expr::Unary { .. } | Expr::Ternary { .. } => Ok(()),
            Expr::VariableReference { name, .. } => f.write_str(&quote_ident(name)),
            Expr::NumberLiteral { value, .. } => write_number(f, *value),
            Expr::BooleanLiteral { value, .. } => f.write_str(if *value { "true" } else { "false" }),
            Expr::StringLiteral { value, .. } => f.write_str(&quote(value)),
            Expr::TimeLiteral { value, .. } => write_time(f, &value.with_timezone(&Utc)),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "+Inf" } else { "-Inf" })
    } else {
        write!(f, "{:.3}", value)
    }
}

/// `YYYY-MM-DD HH:MM:SS`, plus `.fff` when the millisecond part is non-zero.
pub(crate) fn write_time(f: &mut fmt::Formatter<'_>, utc: &DateTime<Utc>) -> fmt::Result {
    write!(f, "{}", utc.format("%Y-%m-%d %H:%M:%S"))?;
    // Leap seconds report up to 1999ms.
    let millis = utc.timestamp_subsec_millis() % 1000;
    if millis > 0 {
        write!(f, ".{:03}", millis)?;
    }
    Ok(())
}
