use std::fs;
use std::path::{PathBuf, Path};
use std::io;

use crate::utils::ReadChars;
use crate::lexer::Lexer;
use crate::parser::{Parser, ParserError};
use crate::parser::expr::ExprIdGen;
use crate::parser::stmt::StmtMeta;


type ReadFileChars = ReadChars<io::BufReader<fs::File>>;

#[derive(Debug, Clone)]
pub enum SourceType {
    String(String),
    File(PathBuf),
}

pub enum SourceText {
    String(std::vec::IntoIter<char>),
    File(ReadFileChars),
}

impl From<String> for SourceText {
    fn from(string: String) -> Self {
        let chars = string.chars().collect::<Vec<char>>();
        Self::String(chars.into_iter())
    }
}

impl Iterator for SourceText {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<io::Result<char>> {
        match self {
            Self::String(chars) => chars.next().map(Ok),
            Self::File(chars) => chars.next(),
        }
    }
}

// Represents a "source" of source code, and provides the means to access the source text as a sequence of chars
#[derive(Debug, Clone)]
pub struct ModuleSource {
    name: String,
    source: SourceType,
}

impl ModuleSource {
    pub fn new(name: impl ToString, source: SourceType) -> Self {
        ModuleSource {
            name: name.to_string(),
            source,
        }
    }

    pub fn name(&self) -> &str { self.name.as_str() }
    pub fn source(&self) -> &SourceType { &self.source }

    // Load the source text
    pub fn source_text(&self) -> io::Result<SourceText> {
        match &self.source {
            SourceType::String(string) => Ok(SourceText::from(string.clone())),
            SourceType::File(ref path) => Ok(SourceText::File(Self::read_source_file(path)?)),
        }
    }

    fn read_source_file(path: &Path) -> io::Result<ReadFileChars> {
        let file = fs::File::open(path)?;
        let reader = io::BufReader::new(file);
        Ok(ReadChars::new(reader))
    }
}


// High-level Parsing Interface

/// Container for state that must outlive a single parse.
///
/// Expression ids handed out by one context never repeat, so a REPL that keeps a single
/// context can feed every input it parses into the same interpreter.
#[derive(Debug, Default)]
pub struct ParseContext {
    ids: ExprIdGen,
}

impl ParseContext {
    pub fn new() -> Self { Self::default() }

    // Returns a Vec of parsed Stmts (if no error occurred) or a Vec or errors
    pub fn parse_ast(&mut self, source: SourceText) -> Result<Vec<StmtMeta>, Vec<ParserError>> {
        let lexer = Lexer::new(source);
        let parser = Parser::new(&mut self.ids, lexer);

        let mut stmts = Vec::new();
        let mut errors = Vec::new();
        for result in parser {
            match result {
                Ok(stmt) => stmts.push(stmt),
                Err(error) => errors.push(error),
            }
        }

        if errors.is_empty() {
            Ok(stmts)
        } else {
            Err(errors)
        }
    }
}
