//! Identifier and string quoting.
//!
//! Identifiers are quoted with `"`, string literals with `'`. Inside either
//! form a backslash escapes the quote character, the backslash itself, and
//! control characters:
//!
//! | Character        | Escape      |
//! |------------------|-------------|
//! | `\`              | `\\`        |
//! | active quote     | `\"` / `\'` |
//! | newline          | `\n`        |
//! | carriage return  | `\r`        |
//! | tab              | `\t`        |
//! | other control    | `\u{XXXX}`  |
//!
//! The [`Lexer`](crate::lexer::Lexer) decodes exactly these sequences, so
//! quoting followed by tokenizing always gives back the input.
//!
//! ```
//! use filter_ast::quote::{quote, quote_ident};
//!
//! assert_eq!(quote_ident("host"), "host");
//! assert_eq!(quote_ident("cpu load"), "\"cpu load\"");
//! assert_eq!(quote("it's"), "'it\\'s'");
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::Token;

pub const IDENT_QUOTE: char = '"';
pub const STRING_QUOTE: char = '\'';
pub const ESCAPE: char = '\\';

static BARE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"));

/// Returns true if `name` can be written without quotes: it matches the
/// identifier grammar and is not a reserved keyword.
pub fn is_bare_ident(name: &str) -> bool {
    BARE_IDENT.is_match(name) && Token::keyword(name).is_none()
}

/// Quotes `name` only if it is not a valid bare identifier.
pub fn quote_ident(name: &str) -> String {
    if is_bare_ident(name) {
        name.to_string()
    } else {
        quote_with(name, IDENT_QUOTE)
    }
}

/// Quotes `value` as a string literal.
pub fn quote(value: &str) -> String {
    quote_with(value, STRING_QUOTE)
}

fn quote_with(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            c if c == quote || c == ESCAPE => {
                out.push(ESCAPE);
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
