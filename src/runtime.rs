use ahash::{self, AHasher};

mod value;
pub use value::Value;

pub mod strings;
pub mod environment;
pub mod function;
pub mod class;
pub mod errors;

pub use strings::Symbol;
pub use environment::Environment;
pub use function::{Callable, Invoke, Function, NativeFunction};
pub use class::{Class, Instance};

mod tests;


// Default Hasher

pub type DefaultHasher = AHasher;
pub type DefaultBuildHasher = ahash::RandomState;
