use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

/// Lexical tokens of the filter language.
///
/// Operators double as the operator symbols of [`Expr`](crate::ast::Expr)
/// nodes; their [`Display`](fmt::Display) output is the canonical text used
/// when a tree is rendered. In JSON only operator tokens are valid and are
/// written as that text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Token {
    // Literals
    /// Identifier, bare or double-quoted
    ///
    /// # Examples
    /// ```text
    /// host
    /// "cpu load"
    /// ```
    Ident(String),

    /// String literal enclosed in single quotes
    ///
    /// # Examples
    /// ```text
    /// 'eu-west'
    /// 'it\'s'
    /// ```
    String(String),

    /// Unsigned decimal number
    ///
    /// A leading `-` is lexed as [`Token::Minus`].
    Number(f64),

    /// Bare UTC timestamp, as written for time literals
    ///
    /// # Examples
    /// ```text
    /// 2021-01-02 03:04:05
    /// 2021-01-02 03:04:05.250
    /// ```
    Time(DateTime<Utc>),

    // Keywords
    /// Logical AND
    And,
    /// Logical OR
    Or,
    /// Logical NOT
    Not,
    /// Set membership
    In,
    /// Pattern match
    Like,
    /// Range check, the ternary operator (`x BETWEEN lo hi`)
    Between,
    /// Null check
    Is,
    /// Null value
    Null,
    /// Boolean true
    True,
    /// Boolean false
    False,

    // Comparison
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `=~`
    EqRegex,
    /// `!~`
    NotEqRegex,

    // Arithmetic
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,

    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,

    /// End of input
    Eof,
}

const KEYWORDS: &[(&str, Token)] = &[
    ("AND", Token::And),
    ("OR", Token::Or),
    ("NOT", Token::Not),
    ("IN", Token::In),
    ("LIKE", Token::Like),
    ("BETWEEN", Token::Between),
    ("IS", Token::Is),
    ("NULL", Token::Null),
    ("TRUE", Token::True),
    ("FALSE", Token::False),
];

const SYMBOLS: &[(&str, Token)] = &[
    ("=", Token::Eq),
    ("!=", Token::NotEq),
    ("<", Token::Lt),
    ("<=", Token::LtEq),
    (">", Token::Gt),
    (">=", Token::GtEq),
    ("=~", Token::EqRegex),
    ("!~", Token::NotEqRegex),
    ("+", Token::Plus),
    ("-", Token::Minus),
    ("*", Token::Star),
    ("/", Token::Slash),
    ("%", Token::Percent),
    ("(", Token::LParen),
    (")", Token::RParen),
    (",", Token::Comma),
];

impl Token {
    /// Case-insensitive keyword lookup.
    pub fn keyword(word: &str) -> Option<Token> {
        KEYWORDS
            .iter()
            .find(|(kw, _)| kw.eq_ignore_ascii_case(word))
            .map(|(_, token)| token.clone())
    }

    pub fn is_keyword(&self) -> bool {
        KEYWORDS.iter().any(|(_, token)| token == self)
    }

    /// True for tokens usable as the operator of an expression node.
    pub fn is_operator(&self) -> bool {
        !matches!(
            self,
            Token::Ident(_)
                | Token::String(_)
                | Token::Number(_)
                | Token::Time(_)
                | Token::Null
                | Token::True
                | Token::False
                | Token::LParen
                | Token::RParen
                | Token::Comma
                | Token::Eof
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => f.write_str(&crate::quote::quote_ident(name)),
            Token::String(value) => f.write_str(&crate::quote::quote(value)),
            Token::Number(n) => write!(f, "{}", n),
            Token::Time(t) => crate::ast::expressions::write_time(f, t),
            Token::Eof => f.write_str("EOF"),
            token => {
                let text = KEYWORDS
                    .iter()
                    .chain(SYMBOLS)
                    .find(|(_, t)| t == token)
                    .map(|(text, _)| *text)
                    .unwrap_or_default();
                f.write_str(text)
            }
        }
    }
}

/// Error returned when text does not name an operator or keyword.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown operator '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for Token {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SYMBOLS
            .iter()
            .find(|(symbol, _)| *symbol == s)
            .map(|(_, token)| token.clone())
            .or_else(|| Token::keyword(s))
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

impl TryFrom<String> for Token {
    type Error = UnknownOperator;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_operator() {
            return Err(S::Error::custom(format!("token {:?} is not an operator", self)));
        }
        serializer.collect_str(self)
    }
}
