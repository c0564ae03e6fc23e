use core::fmt;
use core::cell::RefCell;
use core::marker::PhantomData;
use string_interner::{self, DefaultBackend, DefaultSymbol};

use crate::runtime::DefaultBuildHasher;


pub type InternSymbol = DefaultSymbol;
pub type InternBackend = DefaultBackend<InternSymbol>;
pub type StringInterner = string_interner::StringInterner<InternBackend, DefaultBuildHasher>;


thread_local! {
    static STRING_TABLE: RefCell<StringInterner> = RefCell::new(
        StringInterner::with_hasher(DefaultBuildHasher::default())
    );
}

// Helper macro for static interned strings
#[macro_export]
macro_rules! static_symbol {
    ($str:expr) => {
        {
            type Symbol = $crate::runtime::strings::Symbol;
            thread_local! {
                static SYMBOL: Symbol = Symbol::intern($str);
            }
            SYMBOL.with(|symbol| *symbol)
        }
    };
}

pub use static_symbol;


// Interned Strings

type PhantomUnsend = PhantomData<*mut ()>;

/// An interned identifier.
///
/// Symbols are only meaningful on the thread that created them, since they
/// resolve through a thread-local string table. For this reason they are not `Send`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(InternSymbol, PhantomUnsend);

impl Symbol {
    /// Interns a string slice, creating a `Symbol`
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.with(|string_table| {
            let symbol = string_table.borrow_mut().get_or_intern(string);
            Self(symbol, PhantomData)
        })
    }

    /// Borrow the text of this symbol from the string table
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        STRING_TABLE.with(|string_table| {
            let string_table = string_table.borrow();
            let string = string_table.resolve(self.0)
                .expect("symbol from another string table");
            f(string)
        })
    }

    pub fn to_string_value(&self) -> std::rc::Rc<str> {
        self.with_str(|s| s.into())
    }
}

impl From<&str> for Symbol {
    fn from(string: &str) -> Self {
        Self::intern(string)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| fmt.write_str(s))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| write!(fmt, "${}", s))
    }
}
