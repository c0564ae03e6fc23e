use std::error::Error;

pub mod symbol;

pub use symbol::DebugSymbol;

mod tests;


/// trait for syntax, resolution, or runtime errors that are directly related to a piece of source code
pub trait SourceError: Error {
    fn debug_symbol(&self) -> Option<&DebugSymbol>;
}
