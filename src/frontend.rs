//! output/error reporting and formatting

use std::fmt;
use std::iter;
use std::fmt::Formatter;

use crate::utils;
use crate::debug::SourceError;
use crate::debug::symbol::{DebugSymbolResolver, ResolvedSymbol, ResolvedSymbolTable};


/// Print each error, followed by the source lines it refers to when they can be found
pub fn print_source_errors<E>(resolver: &impl DebugSymbolResolver, errors: &[E]) where E: SourceError {
    let symbols = errors.iter().filter_map(|error| error.debug_symbol());

    let resolved_table = match resolver.resolve_symbols(symbols) {
        Ok(table) => table,
        Err(error) => {
            eprintln!("Could not read source to report errors: {}.", error);
            ResolvedSymbolTable::new()
        },
    };

    for error in errors.iter() {
        let resolved = error.debug_symbol()
            .and_then(|symbol| resolved_table.get(symbol));

        match resolved {
            Some(symbol) => eprintln!("{}", render_source_error(error, symbol)),
            None => eprintln!("{}.\n", utils::title_case_string(&error.to_string())),
        }
    }
}

pub fn render_source_error<'a>(error: &'a impl SourceError, symbol: &'a ResolvedSymbol) -> impl fmt::Display + 'a {
    utils::delegate_fmt(move |fmt| fmt_source_error(fmt, error, symbol))
}

fn fmt_source_error(fmt: &mut Formatter<'_>, error: &impl SourceError, symbol: &ResolvedSymbol) -> fmt::Result {
    let message = utils::title_case_string(&error.to_string());
    write!(fmt, "{}.\n\n", message)?;

    fmt_source_lines(fmt, symbol)
}

// each line touched by the symbol, with the symbol itself underlined
fn fmt_source_lines(fmt: &mut Formatter<'_>, symbol: &ResolvedSymbol) -> fmt::Result {
    let mut line_start = 0; // offset of the current line from the start of the first line
    for (num, raw_line) in symbol.iter_whole_lines().enumerate() {
        let source_line = raw_line.trim_end();
        let line_len = source_line.chars().count();

        let start_col = symbol.start().saturating_sub(line_start).min(line_len);
        let end_col = symbol.end().saturating_sub(line_start).clamp(start_col, line_len);

        let margin = format!("{: >3}", num + symbol.lineno());

        let mut marker = String::new();
        marker.extend(iter::repeat(' ').take(margin.len() + 5 + start_col));
        marker.extend(iter::repeat('^').take((end_col - start_col).max(1)));

        writeln!(fmt, "{}|    {}", margin, source_line)?;
        writeln!(fmt, "{}", marker)?;

        line_start += raw_line.chars().count() + 1; // newline
    }

    Ok(())
}
