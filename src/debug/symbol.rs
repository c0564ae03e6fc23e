use std::io;
use std::collections::HashMap;

use crate::source::ModuleSource;


pub type TokenIndex = usize;


// metadata attached to parser output for error handling

/// A span of source text, as indices of the first and one-past-the-last chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebugSymbol {
    start: TokenIndex,
    end: TokenIndex,
}

impl DebugSymbol {
    pub fn new(start: TokenIndex, end: TokenIndex) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn start(&self) -> TokenIndex { self.start }
    pub fn end(&self) -> TokenIndex { self.end }
    pub fn len(&self) -> usize { self.end - self.start }
    pub fn is_empty(&self) -> bool { self.start == self.end }

    /// The smallest span covering both `self` and `other`
    pub fn join(&self, other: &DebugSymbol) -> DebugSymbol {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<(TokenIndex, TokenIndex)> for DebugSymbol {
    fn from(tuple: (TokenIndex, TokenIndex)) -> Self {
        let (start, end) = tuple;
        Self::new(start, end)
    }
}


// Resolved Symbols

#[derive(Debug, Clone)]
pub struct ResolvedSymbol {
    lines: Vec<String>,  // the whole source lines that the symbol touches
    lineno: usize,       // line number at the start of the symbol
    start: usize,        // char offset of the symbol into the first line
    end: usize,          // char offset of the end of the symbol, relative to the start of the first line
}

impl ResolvedSymbol {
    pub fn lineno(&self) -> usize { self.lineno }
    pub fn start(&self) -> usize { self.start }
    pub fn end(&self) -> usize { self.end }

    pub fn is_multiline(&self) -> bool { self.lines.len() > 1 }

    /// iterate the lines of the symbol WITHOUT the newline characters
    pub fn iter_whole_lines(&self) -> impl Iterator<Item=&str> {
        self.lines.iter().map(|line| line.as_str())
    }
}


// Symbol Resolution

pub type ResolvedSymbolTable = HashMap<DebugSymbol, ResolvedSymbol>;

pub trait DebugSymbolResolver {
    fn resolve_symbols<'s, S>(&self, symbols: S) -> io::Result<ResolvedSymbolTable> where S: Iterator<Item=&'s DebugSymbol>;
}

impl DebugSymbolResolver for ModuleSource {
    fn resolve_symbols<'s, S>(&self, symbols: S) -> io::Result<ResolvedSymbolTable> where S: Iterator<Item=&'s DebugSymbol> {
        let text = self.source_text()?.collect::<io::Result<String>>()?;
        Ok(resolve_debug_symbols(&text, symbols))
    }
}

/// Resolves symbols against text held in memory, e.g. REPL input
pub struct BufferedResolver {
    buffer: String,
}

impl BufferedResolver {
    pub fn new(string: impl ToString) -> Self {
        Self { buffer: string.to_string() }
    }
}

impl DebugSymbolResolver for BufferedResolver {
    fn resolve_symbols<'s, S>(&self, symbols: S) -> io::Result<ResolvedSymbolTable> where S: Iterator<Item=&'s DebugSymbol> {
        Ok(resolve_debug_symbols(&self.buffer, symbols))
    }
}

fn resolve_debug_symbols<'s>(text: &str, symbols: impl Iterator<Item=&'s DebugSymbol>) -> ResolvedSymbolTable {
    // char index of the start of each line
    let mut line_starts = vec![0];
    let mut char_count = 0;
    for (index, c) in text.chars().enumerate() {
        if c == '\n' {
            line_starts.push(index + 1);
        }
        char_count = index + 1;
    }

    let lines = text.lines().collect::<Vec<&str>>();

    // lines are numbered from 1
    let line_of = |index: TokenIndex| -> usize {
        match line_starts.binary_search(&index) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    };

    let mut resolved_symbols = ResolvedSymbolTable::new();
    for symbol in symbols {
        let start = symbol.start().min(char_count);
        let end = symbol.end().clamp(start, char_count);

        let first = line_of(start);
        let last = line_of(end.saturating_sub(1).max(start));

        let resolved = ResolvedSymbol {
            lines: (first..=last)
                .map(|lineno| lines.get(lineno).copied().unwrap_or("").to_string())
                .collect(),
            lineno: first + 1,
            start: start - line_starts[first],
            end: end - line_starts[first],
        };

        resolved_symbols.insert(*symbol, resolved);
    }

    resolved_symbols
}
