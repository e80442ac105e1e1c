//! Tokenize a query and describe the token stream

use super::CliError;
use crate::{Token, tokenize};

/// Options for the tokens command
#[derive(Debug, Clone, Default)]
pub struct TokensOptions {
    /// Query text to tokenize
    pub query: String,
    /// Pretty-print the JSON output
    pub pretty: bool,
}

/// Tokenize the query and return a JSON array of `{"kind", "text"}` objects.
#[tracing::instrument(skip_all)]
pub fn execute_tokens(options: &TokensOptions) -> Result<String, CliError> {
    let tokens = tokenize(&options.query)?;
    let described: Vec<serde_json::Value> = tokens.iter().map(describe).collect();
    let output = if options.pretty {
        serde_json::to_string_pretty(&described)?
    } else {
        serde_json::to_string(&described)?
    };
    Ok(output)
}

fn describe(token: &Token) -> serde_json::Value {
    let kind = match token {
        Token::Ident(_) => "ident",
        Token::String(_) => "string",
        Token::Number(_) => "number",
        Token::Time(_) => "time",
        t if t.is_keyword() => "keyword",
        t if t.is_operator() => "operator",
        _ => "delimiter",
    };
    let text = match token {
        Token::Ident(name) => name.clone(),
        Token::String(value) => value.clone(),
        other => other.to_string(),
    };
    serde_json::json!({ "kind": kind, "text": text })
}
