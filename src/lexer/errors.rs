use core::fmt;
use std::error::Error;

use crate::utils;
use crate::debug::{DebugSymbol, SourceError};


// Lexer Errors

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedChar(char),
    UnterminatedString,
    IOError,
}

#[derive(Debug)]
pub struct LexerError {
    kind: ErrorKind,
    symbol: DebugSymbol,
    cause: Option<Box<dyn Error>>,
}

impl LexerError {
    pub fn new(kind: ErrorKind, symbol: DebugSymbol) -> Self {
        Self { kind, symbol, cause: None }
    }

    pub fn caused_by(mut self, cause: Box<dyn Error>) -> Self {
        self.cause.replace(cause); self
    }

    pub fn kind(&self) -> &ErrorKind { &self.kind }
}

impl Error for LexerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_ref().map(|o| o.as_ref())
    }
}

impl SourceError for LexerError {
    fn debug_symbol(&self) -> Option<&DebugSymbol> { Some(&self.symbol) }
}

impl fmt::Display for LexerError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.kind {
            ErrorKind::UnexpectedChar(c) => format!("unexpected character {:?}", c),
            ErrorKind::UnterminatedString => "unterminated string".to_string(),
            ErrorKind::IOError => "error reading source text".to_string(),
        };

        utils::format_error(fmt, "syntax error", Some(&message), self.source())
    }
}
