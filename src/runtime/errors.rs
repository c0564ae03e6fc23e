use std::fmt;
use std::io;
use std::error::Error;

use crate::utils;
use crate::runtime::Value;
use crate::runtime::strings::Symbol;
use crate::debug::{DebugSymbol, SourceError};


pub type ExecResult<T> = Result<T, Box<RuntimeError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UndefinedVariable,
    UndefinedProperty,
    NotCallable,
    ArityMismatch,
    TypeMismatch,  // "unsupported operand types: 'a' and 'b'"
    InvalidValue,
    IOError,
    StackOverflow,
}

#[derive(Debug)]
pub struct RuntimeError {
    kind: ErrorKind,
    message: String,
    symbol: Option<DebugSymbol>,
    cause: Option<Box<dyn Error>>,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Box<Self> {
        Box::new(Self {
            kind,
            message: message.into(),
            symbol: None,
            cause: None,
        })
    }

    pub fn caused_by(mut self: Box<Self>, cause: impl Into<Box<dyn Error>>) -> Box<Self> {
        self.cause.replace(cause.into()); self
    }

    /// Attach a source location, unless a more specific one was already attached
    pub fn with_symbol(mut self: Box<Self>, symbol: &DebugSymbol) -> Box<Self> {
        if self.symbol.is_none() {
            self.symbol.replace(*symbol);
        }
        self
    }

    pub fn kind(&self) -> ErrorKind { self.kind }
    pub fn message(&self) -> &str { self.message.as_str() }

    /// Fatal errors abort the whole run and are never attributed to a single statement
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::StackOverflow)
    }
}

// Error constructor functions

impl RuntimeError {
    pub fn undefined_variable(name: Symbol) -> Box<Self> {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("undefined variable \"{}\"", name),
        )
    }

    pub fn undefined_property(name: Symbol) -> Box<Self> {
        Self::new(
            ErrorKind::UndefinedProperty,
            format!("undefined property \"{}\"", name),
        )
    }

    pub fn not_callable(value: &Value) -> Box<Self> {
        Self::new(
            ErrorKind::NotCallable,
            format!("type '{}' is not callable", value.type_name()),
        )
    }

    pub fn arity_mismatch(callee: &impl fmt::Display, arity: usize, nargs: usize) -> Box<Self> {
        Self::new(
            ErrorKind::ArityMismatch,
            format!(
                "{} takes {} {} but {} {} given",
                callee,
                arity, if arity == 1 { "argument" } else { "arguments" },
                nargs, if nargs == 1 { "was" } else { "were" },
            ),
        )
    }

    pub fn invalid_unary_operand(op: &impl fmt::Display, operand: &Value) -> Box<Self> {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("unsupported operand for '{}': '{}'", op, operand.type_name()),
        )
    }

    pub fn invalid_binary_operands(op: &impl fmt::Display, lhs: &Value, rhs: &Value) -> Box<Self> {
        Self::new(
            ErrorKind::TypeMismatch,
            format!(
                "unsupported operands for '{}': '{}' and '{}'",
                op, lhs.type_name(), rhs.type_name(),
            ),
        )
    }

    pub fn no_properties(value: &Value) -> Box<Self> {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("type '{}' has no properties", value.type_name()),
        )
    }

    pub fn superclass_not_a_class(value: &Value) -> Box<Self> {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("superclass must be a class, not '{}'", value.type_name()),
        )
    }

    pub fn invalid_value(message: impl AsRef<str>) -> Box<Self> {
        Self::new(ErrorKind::InvalidValue, message.as_ref())
    }

    pub fn io_error(error: io::Error) -> Box<Self> {
        Self::new(ErrorKind::IOError, "could not write output").caused_by(error)
    }

    pub fn stack_overflow() -> Box<Self> {
        Self::new(ErrorKind::StackOverflow, "maximum recursion depth exceeded")
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_ref().map(|o| o.as_ref())
    }
}

impl SourceError for RuntimeError {
    fn debug_symbol(&self) -> Option<&DebugSymbol> { self.symbol.as_ref() }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title =
            if self.is_fatal() { "fatal error" }
            else { "runtime error" };

        utils::format_error(fmt, title, Some(self.message()), self.source())
    }
}
