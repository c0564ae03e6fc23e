use std::fmt;
use std::error::Error;

use crate::utils;
use crate::runtime::Symbol;
use crate::debug::{DebugSymbol, SourceError};


pub type ErrorKind = ResolverErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverErrorKind {
    SelfInheritance,
    ReturnFromTopLevel,
    ReturnValueFromInit,
    ThisOutsideClass,
    SuperOutsideClass,
    SuperWithoutSuperclass,
    DuplicateDeclaration(Symbol),
    ReadInOwnInitializer(Symbol),
}

#[derive(Debug)]
pub struct ResolverError {
    kind: ErrorKind,
    symbol: Option<DebugSymbol>,
}

impl ResolverError {
    pub fn new(kind: ErrorKind, symbol: &DebugSymbol) -> Self {
        Self { kind, symbol: Some(*symbol) }
    }

    pub fn kind(&self) -> &ErrorKind { &self.kind }
}

impl Error for ResolverError { }

impl SourceError for ResolverError {
    fn debug_symbol(&self) -> Option<&DebugSymbol> { self.symbol.as_ref() }
}

impl fmt::Display for ResolverError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {

        let message = match self.kind() {
            ErrorKind::SelfInheritance => "a class can't inherit from itself".to_string(),
            ErrorKind::ReturnFromTopLevel => "can't return from top-level code".to_string(),
            ErrorKind::ReturnValueFromInit => "can't return a value from an initializer".to_string(),
            ErrorKind::ThisOutsideClass => "can't use 'this' outside of a class".to_string(),
            ErrorKind::SuperOutsideClass => "can't use 'super' outside of a class".to_string(),
            ErrorKind::SuperWithoutSuperclass => "can't use 'super' in a class with no superclass".to_string(),
            ErrorKind::DuplicateDeclaration(name) => format!("already a variable named \"{}\" in this scope", name),
            ErrorKind::ReadInOwnInitializer(name) => format!("can't read local variable \"{}\" in its own initializer", name),
        };

        utils::format_error(fmt, "error", Some(&message), None)
    }
}
