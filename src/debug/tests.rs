#![cfg(test)]

use test_log::test;

use crate::source::{ModuleSource, SourceType};
use super::symbol::{DebugSymbol, DebugSymbolResolver, BufferedResolver};


#[test]
fn debug_symbols_resolve_to_lines() {
    let text = "first line\nsecond line\nthird";
    let module = ModuleSource::new("<test>", SourceType::String(text.to_string()));

    let symbols = vec![
        DebugSymbol::new(0, 5),    // "first"
        DebugSymbol::new(18, 22),  // "line" on the second line
        DebugSymbol::new(6, 17),   // "line\nsecond"
    ];

    let table = module.resolve_symbols(symbols.iter()).unwrap();

    let first = &table[&symbols[0]];
    assert_eq!(first.lineno(), 1);
    assert_eq!((first.start(), first.end()), (0, 5));
    assert!(!first.is_multiline());

    let second = &table[&symbols[1]];
    assert_eq!(second.lineno(), 2);
    assert_eq!((second.start(), second.end()), (7, 11));
    assert_eq!(second.iter_whole_lines().collect::<Vec<_>>(), ["second line"]);

    let spanning = &table[&symbols[2]];
    assert_eq!(spanning.lineno(), 1);
    assert!(spanning.is_multiline());
    assert_eq!(spanning.iter_whole_lines().collect::<Vec<_>>(), ["first line", "second line"]);
}

#[test]
fn debug_symbols_past_end_of_input() {
    let resolver = BufferedResolver::new("print 1");

    // the end of input marker sits one past the last char
    let symbol = DebugSymbol::new(7, 7);
    let table = resolver.resolve_symbols([symbol].iter()).unwrap();

    let resolved = &table[&symbol];
    assert_eq!(resolved.lineno(), 1);
    assert_eq!((resolved.start(), resolved.end()), (7, 7));
}

#[test]
fn debug_symbol_join() {
    let a = DebugSymbol::new(2, 5);
    let b = DebugSymbol::new(8, 10);
    assert_eq!(a.join(&b), DebugSymbol::new(2, 10));
    assert_eq!(b.join(&a), DebugSymbol::new(2, 10));
    assert_eq!(a.join(&b).len(), 8);
}
