mod token;
mod errors;

pub use token::*;
pub use errors::*;

use std::io;
use std::collections::VecDeque;

use crate::language::{self, FloatType};
use crate::runtime::Symbol;
use crate::debug::DebugSymbol;
use crate::debug::symbol::TokenIndex;


// Lexer

/// Turns a stream of chars into a stream of tokens.
///
/// Errors are yielded inline and lexing resumes after the offending input.
/// The stream ends after a single `Token::EOF`, or after the source fails to read.
pub struct Lexer<S> where S: Iterator<Item=io::Result<char>> {
    source: S,
    lookahead: VecDeque<char>,

    current: TokenIndex, // one ahead of current char
    lineno: usize,
    done: bool,
}

impl<S> Iterator for Lexer<S> where S: Iterator<Item=io::Result<char>> {
    type Item = Result<TokenMeta, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.next_token();
        match &result {
            Ok(TokenMeta { token: Token::EOF, .. }) => self.done = true,

            // a failed read is not retried
            Err(error) if *error.kind() == ErrorKind::IOError => self.done = true,

            _ => { },
        }
        Some(result)
    }
}

impl<S> Lexer<S> where S: Iterator<Item=io::Result<char>> {

    pub fn new(source: S) -> Self {
        Lexer {
            source,
            lookahead: VecDeque::new(),
            current: 0,
            lineno: 1,
            done: false,
        }
    }

    // make sure at least n+1 chars are buffered, unless the source runs out first
    fn fill_lookahead(&mut self, n: usize) -> Result<(), LexerError> {
        while self.lookahead.len() <= n {
            match self.source.next() {
                None => break,
                Some(Ok(c)) => self.lookahead.push_back(c),
                Some(Err(error)) => {
                    let symbol = DebugSymbol::new(self.current, self.current);
                    return Err(LexerError::new(ErrorKind::IOError, symbol).caused_by(Box::new(error)));
                }
            }
        }
        Ok(())
    }

    fn peek_nth(&mut self, n: usize) -> Result<Option<char>, LexerError> {
        self.fill_lookahead(n)?;
        Ok(self.lookahead.get(n).copied())
    }

    fn peek(&mut self) -> Result<Option<char>, LexerError> {
        self.peek_nth(0)
    }

    fn advance(&mut self) -> Result<Option<char>, LexerError> {
        self.fill_lookahead(0)?;
        let next = self.lookahead.pop_front();
        if let Some(c) = next {
            self.current += 1;
            if c == '\n' {
                self.lineno += 1;
            }
        }
        Ok(next)
    }

    // consume the next char only if it is `expected`
    fn advance_if(&mut self, expected: char) -> Result<bool, LexerError> {
        if self.peek()? == Some(expected) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn at_comment(&mut self) -> Result<bool, LexerError> {
        for (idx, expected) in language::COMMENT_START.chars().enumerate() {
            if self.peek_nth(idx)? != Some(expected) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexerError> {
        loop {
            match self.peek()? {
                Some(c) if c.is_whitespace() => { self.advance()?; },

                Some(..) if self.at_comment()? => {
                    while !matches!(self.advance()?, None | Some('\n')) { }
                },

                _ => break,
            }
        }
        Ok(())
    }

    pub fn next_token(&mut self) -> Result<TokenMeta, LexerError> {
        self.skip_whitespace_and_comments()?;

        // starting a new token
        let token_start = self.current;
        let lineno = self.lineno;

        let next = match self.advance()? {
            Some(c) => c,
            None => return Ok(self.token_data(Token::EOF, token_start, lineno)),
        };

        let token = match next {
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '{' => Token::OpenBrace,
            '}' => Token::CloseBrace,
            ',' => Token::Comma,
            '.' => Token::Dot,
            ';' => Token::Semicolon,
            '+' => Token::OpAdd,
            '-' => Token::OpSub,
            '*' => Token::OpMul,
            '/' => Token::OpDiv,

            '!' => if self.advance_if('=')? { Token::OpNE } else { Token::OpNot },
            '=' => if self.advance_if('=')? { Token::OpEQ } else { Token::OpAssign },
            '<' => if self.advance_if('=')? { Token::OpLE } else { Token::OpLT },
            '>' => if self.advance_if('=')? { Token::OpGE } else { Token::OpGT },

            '"' => self.scan_string(token_start)?,

            c if c.is_ascii_digit() => self.scan_number(c)?,

            c if is_ident_start(c) => self.scan_identifier(c)?,

            c => return Err(self.error(ErrorKind::UnexpectedChar(c), token_start)),
        };

        Ok(self.token_data(token, token_start, lineno))
    }

    // strings may span lines, and have no escape sequences
    fn scan_string(&mut self, token_start: TokenIndex) -> Result<Token, LexerError> {
        let mut buf = String::new();
        loop {
            match self.advance()? {
                None => return Err(self.error(ErrorKind::UnterminatedString, token_start)),
                Some('"') => break,
                Some(c) => buf.push(c),
            }
        }
        Ok(Token::StringLiteral(buf.into()))
    }

    fn scan_number(&mut self, first: char) -> Result<Token, LexerError> {
        let mut buf = String::new();
        buf.push(first);

        self.scan_digits(&mut buf)?;

        // a fractional part needs at least one digit after the dot
        let has_fraction = self.peek()? == Some('.')
            && matches!(self.peek_nth(1)?, Some(c) if c.is_ascii_digit());

        if has_fraction {
            self.advance()?;
            buf.push('.');
            self.scan_digits(&mut buf)?;
        }

        // only ascii digits and a single dot were accepted
        let value = buf.parse::<FloatType>()
            .expect("scanned number literal is a valid float");
        Ok(Token::Number(value))
    }

    fn scan_digits(&mut self, buf: &mut String) -> Result<(), LexerError> {
        while let Some(c) = self.peek()? {
            if !c.is_ascii_digit() {
                break;
            }
            self.advance()?;
            buf.push(c);
        }
        Ok(())
    }

    fn scan_identifier(&mut self, first: char) -> Result<Token, LexerError> {
        let mut buf = String::new();
        buf.push(first);

        while let Some(c) = self.peek()? {
            if !is_ident_char(c) {
                break;
            }
            self.advance()?;
            buf.push(c);
        }

        let token = language::keyword(&buf)
            .unwrap_or_else(|| Token::Identifier(Symbol::intern(&buf)));
        Ok(token)
    }

    fn token_data(&self, token: Token, token_start: TokenIndex, lineno: usize) -> TokenMeta {
        TokenMeta {
            token,
            symbol: DebugSymbol::new(token_start, self.current),
            lineno,
        }
    }

    fn error(&self, kind: ErrorKind, token_start: TokenIndex) -> LexerError {
        LexerError::new(kind, DebugSymbol::new(token_start, self.current))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
