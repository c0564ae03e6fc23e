use std::io;

#[macro_use]
mod macros;

pub mod utils;
pub mod stack;

pub mod source;
pub mod lexer;
pub mod parser;
pub mod resolver;

pub mod language;
pub mod runtime;
pub mod interpreter;
pub mod builtins;

pub mod frontend;
pub mod debug;


use source::{SourceText, ModuleSource, ParseContext};
use parser::ParserError;
use parser::stmt::StmtMeta;
use resolver::{Resolver, ResolvedAst, ResolverError};
use debug::symbol::DebugSymbolResolver;

#[derive(Debug)]
pub enum BuildErrors {
    // depending on which stage the build failed
    Source(io::Error),
    Syntax(Box<[ParserError]>),
    Resolve(Box<[ResolverError]>),
}

pub fn build_module(parse_ctx: &mut ParseContext, source: &ModuleSource) -> Result<ResolvedAst, BuildErrors> {
    let source_text = source.source_text()
        .map_err(BuildErrors::Source)?;

    build_source(parse_ctx, source_text)
}

/// Parse and resolve source text. Only a tree with no errors of any kind can be executed.
pub fn build_source(parse_ctx: &mut ParseContext, source_text: SourceText) -> Result<ResolvedAst, BuildErrors> {
    let ast = parse_source(parse_ctx, source_text)
        .map_err(|errors| BuildErrors::Syntax(errors.into_boxed_slice()))?;

    resolve_ast(ast)
        .map_err(|errors| BuildErrors::Resolve(errors.into_boxed_slice()))
}


/// Produce AST from SourceText
pub fn parse_source(parse_ctx: &mut ParseContext, source_text: SourceText) -> Result<Vec<StmtMeta>, Vec<ParserError>> {
    parse_ctx.parse_ast(source_text)
}

/// Compute the lexical depth of every local variable reference
pub fn resolve_ast(ast: Vec<StmtMeta>) -> Result<ResolvedAst, Vec<ResolverError>> {
    Resolver::new().resolve_ast(ast)
}


pub fn print_build_errors(errors: &BuildErrors, name: &str, resolver: &impl DebugSymbolResolver) {
    match errors {
        BuildErrors::Source(error) => {
            eprintln!("Error reading source: {}.", error);
        }

        BuildErrors::Syntax(errors) => {
            eprintln!("Errors in {}:\n", name);
            frontend::print_source_errors(resolver, &errors[..]);
        }

        BuildErrors::Resolve(errors) => {
            eprintln!("Errors in {}:\n", name);
            frontend::print_source_errors(resolver, &errors[..]);
        }
    }
}
