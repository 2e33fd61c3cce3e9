use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Error emitted by the regex lexer with a message and column position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} at column {column}")]
pub struct LexError {
    /// Column at which the error occurred (1-indexed).
    pub column: usize,
    /// Human-readable error message.
    pub message: String,
}

impl LexError {
    #[must_use]
    pub fn new(column: usize, message: impl Into<String>) -> Self {
        Self {
            column,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEos,
    #[error("unexpected token {found}")]
    UnexpectedToken { found: String },
    #[error("missing closing parenthesis")]
    MissingRParen,
    #[error("illegal postfix operator usage")]
    MisplacedPostfix,
    #[error("empty alternative")]
    EmptyAlternative,
}

/// Parser error annotated with the offending column and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub column: usize,
    pub kind: ParseErrorKind,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.kind, self.column)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    #[must_use]
    pub fn new(column: usize, kind: ParseErrorKind) -> Self {
        Self { column, kind }
    }
}

/// A malformed regex pattern: lexing or parsing failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegexError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A malformed CFG text body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("malformed production {line:?}: expected \"Head -> body\"")]
    MalformedProduction { line: String },
    #[error("empty head in production {line:?}")]
    EmptyHead { line: String },
}

/// Top-level error returned by this crate's public API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid regex: {0}")]
    BadRegex(#[from] RegexError),
    #[error("invalid grammar: {0}")]
    BadGrammar(#[from] GrammarError),
    #[error("unknown CFPQ algorithm: {0:?} (expected one of hellings, matrix, tensor)")]
    UnknownAlgorithm(String),
}

impl From<LexError> for EngineError {
    fn from(e: LexError) -> Self {
        EngineError::BadRegex(RegexError::Lex(e))
    }
}

impl From<ParseError> for EngineError {
    fn from(e: ParseError) -> Self {
        EngineError::BadRegex(RegexError::Parse(e))
    }
}
