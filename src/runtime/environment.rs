use std::rc::Rc;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::runtime::{Value, DefaultBuildHasher};
use crate::runtime::strings::Symbol;
use crate::runtime::errors::{ExecResult, RuntimeError};


pub type Namespace = HashMap<Symbol, Value, DefaultBuildHasher>;

pub fn new_namespace() -> Namespace {
    Namespace::with_hasher(DefaultBuildHasher::default())
}


/// One level of lexical scope.
///
/// Frames are shared through `Rc`: the interpreter holds the current frame, and every
/// closure created while a frame is live holds it too. The parent link is only ever
/// followed outward, so a frame can never reach one of its descendants.
#[derive(Debug)]
pub struct Environment {
    parent: Option<Rc<Environment>>,
    namespace: RefCell<Namespace>,
}

impl Environment {
    /// Create a frame with no enclosing frame
    pub fn new_global() -> Rc<Self> {
        Rc::new(Self {
            parent: None,
            namespace: RefCell::new(new_namespace()),
        })
    }

    /// Create a new local Environment with `parent` as it's enclosing frame.
    pub fn new_local(parent: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            parent: Some(parent.clone()),
            namespace: RefCell::new(new_namespace()),
        })
    }

    /// Check if the name exists in this frame, without searching enclosing frames
    pub fn has_name(&self, name: &Symbol) -> bool {
        self.namespace.borrow().contains_key(name)
    }

    /// Lookup a value for the given name in this frame only
    pub fn lookup_value(&self, name: &Symbol) -> Option<Value> {
        self.namespace.borrow().get(name).cloned()
    }

    /// Insert or overwrite a binding in this frame. Never touches enclosing frames.
    pub fn define(&self, name: Symbol, value: Value) {
        self.namespace.borrow_mut().insert(name, value);
    }

    /// Find the innermost binding for `name`
    pub fn get(&self, name: &Symbol) -> ExecResult<Value> {
        let mut next_env = Some(self);
        while let Some(env) = next_env {
            if let Some(value) = env.lookup_value(name) {
                return Ok(value);
            }
            next_env = env.parent.as_deref();
        }
        Err(RuntimeError::undefined_variable(*name))
    }

    /// Overwrite the innermost existing binding for `name`. Assignment never creates a binding.
    pub fn assign(&self, name: &Symbol, value: Value) -> ExecResult<()> {
        let mut next_env = Some(self);
        while let Some(env) = next_env {
            if let Some(slot) = env.namespace.borrow_mut().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            next_env = env.parent.as_deref();
        }
        Err(RuntimeError::undefined_variable(*name))
    }

    /// Read a binding from the frame `depth` levels out, as computed by the resolver
    pub fn get_at(&self, depth: usize, name: &Symbol) -> Value {
        self.ancestor(depth).lookup_value(name)
            .unwrap_or_else(|| panic!("resolved name \"{}\" missing at depth {}", name, depth))
    }

    /// Overwrite a binding in the frame `depth` levels out, as computed by the resolver
    pub fn assign_at(&self, depth: usize, name: Symbol, value: Value) {
        self.ancestor(depth).define(name, value)
    }

    fn ancestor(&self, depth: usize) -> &Environment {
        let mut env = self;
        for _ in 0..depth {
            env = env.parent.as_deref()
                .expect("resolved depth walked past the global environment");
        }
        env
    }
}
