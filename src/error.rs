use std::fmt;

/// Line and column of a character in the lexer input, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },

    #[error("unterminated string at {position}: missing closing quote")]
    UnterminatedString { position: Position },

    #[error("unterminated identifier at {position}: missing closing quote")]
    UnterminatedIdent { position: Position },

    #[error("invalid escape sequence '\\{sequence}' at {position}")]
    InvalidEscape { sequence: String, position: Position },

    #[error("invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },

    #[error("invalid time '{text}' at {position}")]
    InvalidTime { text: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedChar { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::UnterminatedIdent { position }
            | LexError::InvalidEscape { position, .. }
            | LexError::InvalidNumber { position, .. }
            | LexError::InvalidTime { position, .. } => *position,
        }
    }
}
