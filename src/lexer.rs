use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::ast::Token;
use crate::error::{LexError, Position};
use crate::quote::{ESCAPE, IDENT_QUOTE, STRING_QUOTE};

/// Shape of a rendered time literal: `YYYY-MM-DD HH:MM:SS[.fff]`.
static TIME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{1,9})?")
        .expect("valid time pattern")
});

/// Longest text the time shape can match.
const TIME_MAX_LEN: usize = 29;

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Line/column of the character at `index`.
    fn location(&self, index: usize) -> Position {
        let mut line = 1;
        let mut column = 1;
        for ch in self.input.iter().take(index) {
            if *ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position { line, column }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a quoted run starting at the opening `quote` and decodes escapes.
    fn read_quoted(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                ESCAPE => {
                    let escape_at = self.position;
                    self.advance(); // Consume backslash
                    let decoded = match self.current_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(c @ ('"' | '\'' | '\\')) => c,
                        Some('u') => {
                            self.advance();
                            self.read_unicode_escape(escape_at)?
                        }
                        Some(other) => {
                            return Err(LexError::InvalidEscape {
                                sequence: other.to_string(),
                                position: self.location(escape_at),
                            });
                        }
                        None => break,
                    };
                    result.push(decoded);
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        let position = self.location(start);
        if quote == IDENT_QUOTE {
            Err(LexError::UnterminatedIdent { position })
        } else {
            Err(LexError::UnterminatedString { position })
        }
    }

    /// Decodes `{XXXX}` after `\u`, leaving the cursor on the closing brace.
    fn read_unicode_escape(&mut self, escape_at: usize) -> Result<char, LexError> {
        let mut digits = String::new();
        let invalid = |lexer: &Self, digits: &str| LexError::InvalidEscape {
            sequence: format!("u{}", digits),
            position: lexer.location(escape_at),
        };

        if self.current_char() != Some('{') {
            return Err(invalid(self, ""));
        }
        self.advance();
        while let Some(ch) = self.current_char() {
            if ch == '}' {
                break;
            }
            if !ch.is_ascii_hexdigit() || digits.len() >= 6 {
                return Err(invalid(self, &digits));
            }
            digits.push(ch);
            self.advance();
        }
        if self.current_char() != Some('}') {
            return Err(invalid(self, &digits));
        }

        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| invalid(self, &format!("{{{}}}", digits)))
    }

    /// Reads a UTC timestamp if the input at the cursor has the time shape.
    fn read_time(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.position;
        let ahead: String = self.input[start..].iter().take(TIME_MAX_LEN).collect();
        let Some(found) = TIME_SHAPE.find(&ahead) else {
            return Ok(None);
        };
        let text = found.as_str();
        let time = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
            .map_err(|_| LexError::InvalidTime {
                text: text.to_string(),
                position: self.location(start),
            })?
            .and_utc();
        self.position += text.chars().count();
        Ok(Some(Token::Time(time)))
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        number
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| LexError::InvalidNumber {
                text: number.clone(),
                position: self.location(start),
            })
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn double(&mut self, token: Token) -> Token {
        self.advance();
        self.advance();
        token
    }

    /// Consumes one character, or two when the second is `next`.
    fn either(&mut self, next: char, double: Token, single: Token) -> Token {
        if self.peek_char(1) == Some(next) {
            self.double(double)
        } else {
            self.single(single)
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('+') => self.single(Token::Plus),
            Some('-') => self.single(Token::Minus),
            Some('*') => self.single(Token::Star),
            Some('/') => self.single(Token::Slash),
            Some('%') => self.single(Token::Percent),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some(',') => self.single(Token::Comma),
            Some('=') => self.either('~', Token::EqRegex, Token::Eq),
            Some('<') => self.either('=', Token::LtEq, Token::Lt),
            Some('>') => self.either('=', Token::GtEq, Token::Gt),
            Some('!') => match self.peek_char(1) {
                Some('=') => self.double(Token::NotEq),
                Some('~') => self.double(Token::NotEqRegex),
                _ => {
                    return Err(LexError::UnexpectedChar {
                        ch: '!',
                        position: self.location(self.position),
                    });
                }
            },
            Some(IDENT_QUOTE) => Token::Ident(self.read_quoted(IDENT_QUOTE)?),
            Some(STRING_QUOTE) => Token::String(self.read_quoted(STRING_QUOTE)?),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                Token::keyword(&ident).unwrap_or(Token::Ident(ident))
            }
            Some(ch) if ch.is_ascii_digit() => match self.read_time()? {
                Some(time) => time,
                None => self.read_number()?,
            },
            Some(ch) => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    position: self.location(self.position),
                });
            }
        };

        tracing::trace!(?token, "lexed token");
        Ok(token)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to, not including, [`Token::Eof`]. Stops after the
    /// first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.position > self.input.len() {
            return None;
        }
        match self.next_token() {
            Ok(Token::Eof) => None,
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.position = self.input.len() + 1;
                Some(Err(e))
            }
        }
    }
}

/// Tokenizes the whole input, excluding the trailing [`Token::Eof`].
#[tracing::instrument(level = "debug", skip_all, fields(len = input.len()))]
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(input).collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = tokens.len(), "tokenized input");
    Ok(tokens)
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and OR Not between true FALSE null");
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Not);
    assert_eq!(lexer.next_token().unwrap(), Token::Between);
    assert_eq!(lexer.next_token().unwrap(), Token::True);
    assert_eq!(lexer.next_token().unwrap(), Token::False);
    assert_eq!(lexer.next_token().unwrap(), Token::Null);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_comparison() {
    let mut lexer = Lexer::new("cpu >= 80.5 AND host =~ 'web'");
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("cpu".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::GtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Number(80.5));
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("host".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::EqRegex);
    assert_eq!(lexer.next_token().unwrap(), Token::String("web".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_time_then_number() {
    let mut lexer = Lexer::new("2021-01-02 03:04:05.007 9.000");
    assert!(matches!(lexer.next_token().unwrap(), Token::Time(_)));
    assert_eq!(lexer.next_token().unwrap(), Token::Number(9.0));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}
