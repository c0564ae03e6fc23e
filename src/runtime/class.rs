use core::fmt;
use std::rc::Rc;
use std::collections::HashMap;

use crate::language;
use crate::interpreter::Interpreter;
use crate::runtime::{Value, Environment, DefaultBuildHasher};
use crate::runtime::function::{Function, Invoke};
use crate::runtime::strings::{Symbol, static_symbol};
use crate::runtime::errors::ExecResult;


pub type MethodTable = HashMap<Symbol, Rc<Function>, DefaultBuildHasher>;

pub fn new_method_table() -> MethodTable {
    MethodTable::with_hasher(DefaultBuildHasher::default())
}


#[derive(Debug)]
pub struct Class {
    name: Symbol,
    superclass: Option<Rc<Class>>,
    methods: MethodTable,
}

impl Class {
    pub fn new(name: Symbol, superclass: Option<Rc<Class>>, methods: MethodTable) -> Self {
        Self { name, superclass, methods }
    }

    pub fn name(&self) -> Symbol { self.name }
    pub fn superclass(&self) -> Option<&Rc<Class>> { self.superclass.as_ref() }

    /// Search this class, then each superclass in turn. The first match wins.
    pub fn find_method(&self, name: &Symbol) -> Option<&Rc<Function>> {
        let mut next_class = Some(self);
        while let Some(class) = next_class {
            if let Some(method) = class.methods.get(name) {
                return Some(method);
            }
            next_class = class.superclass.as_deref();
        }
        None
    }

    pub fn initializer(&self) -> Option<&Rc<Function>> {
        self.find_method(&static_symbol!(language::INIT_NAME))
    }
}

// construction
impl Invoke for Rc<Class> {
    fn arity(&self) -> usize {
        self.initializer().map_or(0, |init| init.arity())
    }

    fn invoke(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> ExecResult<Value> {
        log::debug!("construct {}", self.name);

        let instance = Rc::new(Instance::new(self.clone()));
        if let Some(init) = self.initializer() {
            init.bind(instance.clone()).invoke(interpreter, args)?;
        }
        Ok(Value::from(instance))
    }
}

impl fmt::Display for Class {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.name)
    }
}


#[derive(Debug)]
pub struct Instance {
    class: Rc<Class>,
    // only used as a field table, never part of the lexical chain
    fields: Rc<Environment>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: Environment::new_global(),
        }
    }

    pub fn class(&self) -> &Rc<Class> { &self.class }

    /// Fields shadow methods. Methods come back bound to this instance.
    pub fn get(self: &Rc<Self>, name: &Symbol) -> Option<Value> {
        if let Some(value) = self.fields.lookup_value(name) {
            return Some(value);
        }

        self.class.find_method(name)
            .map(|method| Value::from(method.bind(self.clone())))
    }

    pub fn set(&self, name: Symbol, value: Value) {
        self.fields.define(name, value)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{} instance", self.class.name())
    }
}
