// Scope Tracking

use std::collections::HashMap;

use crate::runtime::{Symbol, DefaultBuildHasher};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalState {
    Declared,  // the name exists, but its initializer is still being resolved
    Defined,
}


#[derive(Debug)]
pub struct Scope {
    locals: HashMap<Symbol, LocalState, DefaultBuildHasher>,
}

impl Scope {
    pub fn find_local(&self, name: &Symbol) -> Option<LocalState> {
        self.locals.get(name).copied()
    }
}

/// Mirrors the chain of local environments that the interpreter will build at run time.
/// The global environment is never on the stack.
#[derive(Debug)]
pub struct ScopeTracker {
    scopes: Vec<Scope>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn local_scope(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    pub fn push_scope(&mut self) {
        let scope = Scope {
            locals: HashMap::with_hasher(DefaultBuildHasher::default()),
        };

        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) -> Scope {
        self.scopes.pop().expect("pop global scope")
    }

    /// Returns false if the name was already declared in the innermost scope.
    /// Declarations in the global scope are not tracked.
    pub fn declare(&mut self, name: Symbol) -> bool {
        match self.scopes.last_mut() {
            Some(scope) => scope.locals.insert(name, LocalState::Declared).is_none(),
            None => true,
        }
    }

    pub fn define(&mut self, name: Symbol) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.locals.insert(name, LocalState::Defined);
        }
    }

    pub fn iter_scopes(&self) -> impl Iterator<Item=&Scope> {
        self.scopes.iter().rev()
    }

    /// The number of scopes between the innermost one and the nearest one that contains `name`
    pub fn resolve_local(&self, name: &Symbol) -> Option<usize> {
        self.iter_scopes()
            .position(|scope| scope.find_local(name).is_some())
    }
}
