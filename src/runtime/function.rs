use core::fmt;
use std::rc::Rc;

use crate::language;
use crate::parser::stmt::FunctionDecl;
use crate::interpreter::{Interpreter, ControlFlow};
use crate::runtime::{Value, Environment};
use crate::runtime::class::{Class, Instance};
use crate::runtime::strings::{Symbol, static_symbol};
use crate::runtime::errors::ExecResult;


/// Anything that can appear in the callee position of a call expression
#[derive(Debug, Clone)]
pub enum Callable {
    Native(Rc<NativeFunction>),
    Function(Rc<Function>),
    Class(Rc<Class>),
}

pub trait Invoke {
    fn arity(&self) -> usize;

    /// Arguments have already been checked against `arity()`
    fn invoke(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> ExecResult<Value>;
}

impl Callable {
    pub fn name(&self) -> Symbol {
        match self {
            Self::Native(native) => native.name(),
            Self::Function(function) => function.name(),
            Self::Class(class) => class.name(),
        }
    }

    fn as_invoke(&self) -> &dyn Invoke {
        match self {
            Self::Native(native) => native.as_ref(),
            Self::Function(function) => function.as_ref(),
            Self::Class(class) => class,
        }
    }
}

impl Invoke for Callable {
    fn arity(&self) -> usize { self.as_invoke().arity() }

    fn invoke(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> ExecResult<Value> {
        self.as_invoke().invoke(interpreter, args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(native) => write!(fmt, "{}", native),
            Self::Function(function) => write!(fmt, "{}", function),
            Self::Class(class) => write!(fmt, "{}", class),
        }
    }
}


/// A user-defined function or method, closed over the environment it was declared in
#[derive(Debug)]
pub struct Function {
    decl: Rc<FunctionDecl>,
    closure: Rc<Environment>,
    is_init: bool,
}

impl Function {
    pub fn new(decl: Rc<FunctionDecl>, closure: Rc<Environment>, is_init: bool) -> Self {
        Self { decl, closure, is_init }
    }

    pub fn name(&self) -> Symbol { self.decl.name() }

    /// Produce a copy of this method whose closure has `this` bound to `instance`.
    /// The canonical closure is left untouched.
    pub fn bind(&self, instance: Rc<Instance>) -> Function {
        let env = Environment::new_local(&self.closure);
        env.define(static_symbol!(language::THIS_NAME), Value::from(instance));
        Function::new(self.decl.clone(), env, self.is_init)
    }

    fn bound_this(&self) -> Value {
        self.closure.get_at(0, &static_symbol!(language::THIS_NAME))
    }
}

impl Invoke for Function {
    fn arity(&self) -> usize { self.decl.params().len() }

    fn invoke(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> ExecResult<Value> {
        log::debug!("call {}", self);

        // parameters live in the same frame as the body
        let env = Environment::new_local(&self.closure);
        for (param, arg) in self.decl.params().iter().zip(args.into_iter()) {
            env.define(param.name(), arg);
        }

        let flow = interpreter.exec_block(self.decl.body(), env)?;

        if self.is_init {
            return Ok(self.bound_this());
        }

        match flow {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::None => Ok(Value::Nil),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "<fn {}>", self.name())
    }
}


pub type NativeFn = fn(interpreter: &mut Interpreter, args: &[Value]) -> ExecResult<Value>;

pub struct NativeFunction {
    name: Symbol,
    arity: usize,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: Symbol, arity: usize, func: NativeFn) -> Self {
        Self { name, arity, func }
    }

    pub fn name(&self) -> Symbol { self.name }
}

impl Invoke for NativeFunction {
    fn arity(&self) -> usize { self.arity }

    fn invoke(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> ExecResult<Value> {
        (self.func)(interpreter, args.as_slice())
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "<fn {}>", self.name)
    }
}
