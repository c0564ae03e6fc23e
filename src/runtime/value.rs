use core::fmt;
use std::rc::Rc;
use static_assertions::assert_not_impl_any;

use crate::language::FloatType;
use crate::runtime::function::{Callable, Function, NativeFunction};
use crate::runtime::class::{Class, Instance};


// values share environments through Rc, the interpreter is strictly single-threaded
assert_not_impl_any!(Value: Send, Sync);

// Fundamental data value type
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(FloatType),
    String(Rc<str>),
    Callable(Callable),
    Instance(Rc<Instance>),
}

impl Value {
    /// Only `nil` and `false` are falsy
    pub fn truth_value(&self) -> bool {
        match self {
            Self::Nil => false,
            Self::Bool(value) => *value,
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<FloatType> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }


    pub fn as_class(&self) -> Option<&Rc<Class>> {
        match self {
            Self::Callable(Callable::Class(class)) => Some(class),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Rc<Instance>> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(..) => "boolean",
            Self::Number(..) => "number",
            Self::String(..) => "string",
            Self::Callable(Callable::Class(..)) => "class",
            Self::Callable(..) => "function",
            Self::Instance(..) => "instance",
        }
    }
}

// Numbers and strings compare by value, callables and instances by identity.
// Values of different types are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Callable(a), Self::Callable(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => fmt.write_str("nil"),
            Self::Bool(value) => write!(fmt, "{}", value),
            Self::Number(value) => write!(fmt, "{}", value),
            Self::String(value) => fmt.write_str(value),
            Self::Callable(callable) => write!(fmt, "{}", callable),
            Self::Instance(instance) => write!(fmt, "{}", instance),
        }
    }
}


impl From<bool> for Value {
    fn from(value: bool) -> Self { Self::Bool(value) }
}

impl From<FloatType> for Value {
    fn from(value: FloatType) -> Self { Self::Number(value) }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Self::String(value.into()) }
}

impl From<String> for Value {
    fn from(value: String) -> Self { Self::String(value.into()) }
}

impl From<Rc<str>> for Value {
    fn from(value: Rc<str>) -> Self { Self::String(value) }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self { Self::Callable(callable) }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self { Self::Callable(Callable::Function(Rc::new(function))) }
}

impl From<NativeFunction> for Value {
    fn from(function: NativeFunction) -> Self { Self::Callable(Callable::Native(Rc::new(function))) }
}

impl From<Rc<Class>> for Value {
    fn from(class: Rc<Class>) -> Self { Self::Callable(Callable::Class(class)) }
}

impl From<Rc<Instance>> for Value {
    fn from(instance: Rc<Instance>) -> Self { Self::Instance(instance) }
}
