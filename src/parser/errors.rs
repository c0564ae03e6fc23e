use core::fmt;
use std::error::Error;

use crate::utils;
use crate::language;
use crate::lexer::{Token, LexerError};
use crate::debug::{DebugSymbol, SourceError};


pub type ErrorKind = ParserErrorKind;

// Specifies the actual error that occurred
#[derive(Debug, Clone, PartialEq)]
pub enum ParserErrorKind {
    LexerError,
    ExpectedStartOfExpr,   // expected the start of an expression
    ExpectedToken(Token),
    ExpectedIdentifier,
    InvalidAssignmentTarget,   // the LHS of an assignment was not a variable or property
    TooManyArguments,
    TooManyParameters,
}

// Provide information about the type of syntactic construct from which the error originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTag {
    TopLevel,
    VarDecl,
    FunDecl,
    ClassDecl,
    Block,
    ExprStmt,
    PrintStmt,
    ReturnStmt,
    IfStmt,
    WhileStmt,
    ForStmt,
    Expr,
    AssignmentExpr,
    CallExpr,
    MemberAccess,
    SuperAccess,
    Group,
}

impl fmt::Display for ContextTag {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TopLevel => "declaration",
            Self::VarDecl => "variable declaration",
            Self::FunDecl => "function declaration",
            Self::ClassDecl => "class declaration",
            Self::Block => "block",
            Self::ExprStmt => "expression statement",
            Self::PrintStmt => "print statement",
            Self::ReturnStmt => "return statement",
            Self::IfStmt => "if statement",
            Self::WhileStmt => "while statement",
            Self::ForStmt => "for statement",
            Self::Expr => "expression",
            Self::AssignmentExpr => "assignment",
            Self::CallExpr => "call",
            Self::MemberAccess => "property access",
            Self::SuperAccess => "superclass method access",
            Self::Group => "parenthesized expression",
        };
        fmt.write_str(name)
    }
}

// The error context is always available at the base of the recursive descent call stack,
// so errors are created without it and it is added once they reach the top.
#[derive(Debug)]
pub struct ErrorPrototype {
    kind: ErrorKind,
    symbol: Option<DebugSymbol>,
    cause: Option<Box<dyn Error>>,
}

impl ErrorPrototype {
    pub fn new(kind: ErrorKind, symbol: &DebugSymbol) -> Self {
        ErrorPrototype { kind, symbol: Some(*symbol), cause: None }
    }

    pub fn from_lexer_error(error: LexerError) -> Self {
        let symbol = error.debug_symbol().copied();
        ErrorPrototype {
            kind: ErrorKind::LexerError,
            symbol,
            cause: Some(Box::new(error)),
        }
    }
}

#[derive(Debug)]
pub struct ParserError {
    kind: ErrorKind,
    context: ContextTag,
    symbol: Option<DebugSymbol>,
    cause: Option<Box<dyn Error>>,
}

impl ParserError {
    pub fn from_prototype(proto: ErrorPrototype, context: &ErrorContext) -> Self {
        ParserError {
            kind: proto.kind,
            context: context.context(),
            symbol: proto.symbol,
            cause: proto.cause,
        }
    }

    pub fn kind(&self) -> &ErrorKind { &self.kind }
    pub fn context(&self) -> ContextTag { self.context }
}

impl Error for ParserError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_ref().map(|o| o.as_ref())
    }
}

impl SourceError for ParserError {
    fn debug_symbol(&self) -> Option<&DebugSymbol> { self.symbol.as_ref() }
}

impl fmt::Display for ParserError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.kind() {
            // lexer errors already describe themselves
            ErrorKind::LexerError => return match self.source() {
                Some(error) => write!(fmt, "{}", error),
                None => fmt.write_str("syntax error"),
            },
            ErrorKind::ExpectedStartOfExpr => "expected start of expression".to_string(),
            ErrorKind::ExpectedToken(token) => format!("expected '{}' in {}", token, self.context),
            ErrorKind::ExpectedIdentifier => format!("expected identifier in {}", self.context),
            ErrorKind::InvalidAssignmentTarget => "invalid assignment target".to_string(),
            ErrorKind::TooManyArguments => format!("can't have more than {} arguments", language::MAX_ARGS),
            ErrorKind::TooManyParameters => format!("can't have more than {} parameters", language::MAX_ARGS),
        };

        utils::format_error(fmt, "syntax error", Some(&message), self.source())
    }
}


// Structures used by the parser for error handling

/// Tracks which syntactic construct the parser is inside of
#[derive(Debug, Clone)]
pub struct ErrorContext {
    stack: Vec<ContextTag>,
}

impl ErrorContext {
    pub fn new(base: ContextTag) -> Self {
        ErrorContext { stack: vec![ base ] }
    }

    pub fn push(&mut self, tag: ContextTag) { self.stack.push(tag) }

    pub fn pop(&mut self) -> ContextTag {
        assert!(self.stack.len() > 1);
        self.stack.pop().expect("context stack is never empty")
    }

    pub fn context(&self) -> ContextTag {
        *self.stack.last().expect("context stack is never empty")
    }
}
