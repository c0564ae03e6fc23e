//! Static scope resolution.
//!
//! Before a program runs, every variable reference is matched with the scope that declares
//! it. The distance to that scope is recorded by expression id, and the interpreter later
//! walks exactly that many environments out. Names that are not found in any local scope
//! are left unresolved and are looked up in the global environment at run time.

mod scope;
mod errors;
mod tests;

pub use errors::{ResolverError, ResolverErrorKind};

use std::collections::HashMap;

use crate::language;
use crate::stack;
use crate::runtime::{Symbol, DefaultBuildHasher};
use crate::runtime::strings::static_symbol;
use crate::debug::DebugSymbol;
use crate::parser::expr::{ExprMeta, Expr, ExprId};
use crate::parser::stmt::{StmtMeta, Stmt, FunctionDecl, ClassDecl};

use scope::{ScopeTracker, LocalState};
use errors::ErrorKind;


/// Maps variable-reference expressions to the number of environments between use and declaration
pub type ResolutionTable = HashMap<ExprId, usize, DefaultBuildHasher>;

pub fn new_resolution_table() -> ResolutionTable {
    ResolutionTable::with_hasher(DefaultBuildHasher::default())
}


/// A syntax tree that resolved without errors, along with its resolutions.
///
/// Only the resolver can produce one, so a tree with static errors can never be run.
#[derive(Debug)]
pub struct ResolvedAst {
    stmts: Box<[StmtMeta]>,
    resolutions: ResolutionTable,
}

impl ResolvedAst {
    pub fn stmts(&self) -> &[StmtMeta] { &self.stmts }
    pub fn resolutions(&self) -> &ResolutionTable { &self.resolutions }

    pub fn take(self) -> (Box<[StmtMeta]>, ResolutionTable) {
        (self.stmts, self.resolutions)
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}


pub struct Resolver {
    scopes: ScopeTracker,
    resolutions: ResolutionTable,
    function: FunctionKind,
    class: ClassKind,
    errors: Vec<ResolverError>,
}

impl Default for Resolver {
    fn default() -> Self { Self::new() }
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: ScopeTracker::new(),
            resolutions: new_resolution_table(),
            function: FunctionKind::None,
            class: ClassKind::None,
            errors: Vec::new(),
        }
    }

    /// Resolve a whole program. Every error is collected before giving up.
    pub fn resolve_ast(mut self, stmts: Vec<StmtMeta>) -> Result<ResolvedAst, Vec<ResolverError>> {
        self.resolve_stmts(&stmts);

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        Ok(ResolvedAst {
            stmts: stmts.into_boxed_slice(),
            resolutions: self.resolutions,
        })
    }

    fn error(&mut self, kind: ErrorKind, symbol: &DebugSymbol) {
        let error = ResolverError::new(kind, symbol);
        log::debug!("{}", error);
        self.errors.push(error);
    }

    fn declare(&mut self, name: Symbol, symbol: &DebugSymbol) {
        if !self.scopes.declare(name) {
            self.error(ErrorKind::DuplicateDeclaration(name), symbol);
        }
    }

    fn resolve_local(&mut self, id: ExprId, name: &Symbol) {
        match self.scopes.resolve_local(name) {
            Some(depth) => {
                log::debug!("resolved {} at depth {}", name, depth);
                self.resolutions.insert(id, depth);
            },
            None => log::debug!("{} is global", name),
        }
    }

    /*** Statements ***/

    fn resolve_stmts(&mut self, stmts: &[StmtMeta]) {
        for stmt in stmts.iter() {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &StmtMeta) {
        stack::ensure_sufficient_stack(|| {
            match stmt.variant() {
                Stmt::Expression(expr) => self.resolve_expr(expr),

                Stmt::Print(expr) => self.resolve_expr(expr),

                Stmt::Var { name, init } => {
                    self.declare(*name, stmt.debug_symbol());
                    if let Some(init) = init {
                        self.resolve_expr(init);
                    }
                    self.scopes.define(*name);
                },

                Stmt::Block(stmts) => {
                    self.scopes.push_scope();
                    self.resolve_stmts(stmts);
                    self.scopes.pop_scope();
                },

                Stmt::If { condition, then_branch, else_branch } => {
                    self.resolve_expr(condition);
                    self.resolve_stmt(then_branch);
                    if let Some(else_branch) = else_branch {
                        self.resolve_stmt(else_branch);
                    }
                },

                Stmt::While { condition, body } => {
                    self.resolve_expr(condition);
                    self.resolve_stmt(body);
                },

                Stmt::Function(decl) => {
                    // defined eagerly so the function can refer to itself
                    self.declare(decl.name(), decl.debug_symbol());
                    self.scopes.define(decl.name());

                    self.resolve_function(decl, FunctionKind::Function);
                },

                Stmt::Return(value) => {
                    if self.function == FunctionKind::None {
                        self.error(ErrorKind::ReturnFromTopLevel, stmt.debug_symbol());
                    }

                    if let Some(value) = value {
                        if self.function == FunctionKind::Initializer {
                            self.error(ErrorKind::ReturnValueFromInit, stmt.debug_symbol());
                        }
                        self.resolve_expr(value);
                    }
                },

                Stmt::Class(decl) => self.resolve_class(decl),
            }
        })
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionKind) {
        let enclosing = self.function;
        self.function = kind;

        // parameters share a scope with the body
        self.scopes.push_scope();
        for param in decl.params().iter() {
            self.declare(param.name(), param.debug_symbol());
            self.scopes.define(param.name());
        }
        self.resolve_stmts(decl.body());
        self.scopes.pop_scope();

        self.function = enclosing;
    }

    fn resolve_class(&mut self, decl: &ClassDecl) {
        let enclosing = self.class;
        self.class = ClassKind::Class;

        self.declare(decl.name(), decl.debug_symbol());
        self.scopes.define(decl.name());

        if let Some(superclass) = decl.superclass() {
            if matches!(superclass.variant(), Expr::Variable(name) if *name == decl.name()) {
                self.error(ErrorKind::SelfInheritance, superclass.debug_symbol());
            }

            self.class = ClassKind::Subclass;
            self.resolve_expr(superclass);

            self.scopes.push_scope();
            self.scopes.define(static_symbol!(language::SUPER_NAME));
        }

        self.scopes.push_scope();
        self.scopes.define(static_symbol!(language::THIS_NAME));

        let init_name = static_symbol!(language::INIT_NAME);
        for method in decl.methods().iter() {
            let kind =
                if method.name() == init_name { FunctionKind::Initializer }
                else { FunctionKind::Method };

            self.resolve_function(method, kind);
        }

        self.scopes.pop_scope();

        if decl.superclass().is_some() {
            self.scopes.pop_scope();
        }

        self.class = enclosing;
    }

    /*** Expressions ***/

    fn resolve_expr(&mut self, expr: &ExprMeta) {
        stack::ensure_sufficient_stack(|| {
            match expr.variant() {
                Expr::Literal(..) => { },

                Expr::Group(inner) => self.resolve_expr(inner),

                Expr::Variable(name) => {
                    let state = self.scopes.local_scope()
                        .and_then(|scope| scope.find_local(name));

                    if let Some(LocalState::Declared) = state {
                        self.error(ErrorKind::ReadInOwnInitializer(*name), expr.debug_symbol());
                    }

                    self.resolve_local(expr.id(), name);
                },

                Expr::Assign { name, value } => {
                    self.resolve_expr(value);
                    self.resolve_local(expr.id(), name);
                },

                Expr::Unary { operand, .. } => self.resolve_expr(operand),

                Expr::Binary { lhs, rhs, .. } | Expr::Logical { lhs, rhs, .. } => {
                    self.resolve_expr(lhs);
                    self.resolve_expr(rhs);
                },

                Expr::Call { callee, args } => {
                    self.resolve_expr(callee);
                    for arg in args.iter() {
                        self.resolve_expr(arg);
                    }
                },

                // properties are looked up dynamically
                Expr::Get { object, .. } => self.resolve_expr(object),

                Expr::Set { object, value, .. } => {
                    self.resolve_expr(value);
                    self.resolve_expr(object);
                },

                Expr::This => {
                    if self.class == ClassKind::None {
                        self.error(ErrorKind::ThisOutsideClass, expr.debug_symbol());
                        return;
                    }
                    self.resolve_local(expr.id(), &static_symbol!(language::THIS_NAME));
                },

                Expr::Super { .. } => {
                    match self.class {
                        ClassKind::None => self.error(ErrorKind::SuperOutsideClass, expr.debug_symbol()),
                        ClassKind::Class => self.error(ErrorKind::SuperWithoutSuperclass, expr.debug_symbol()),
                        ClassKind::Subclass => { },
                    }
                    self.resolve_local(expr.id(), &static_symbol!(language::SUPER_NAME));
                },
            }
        })
    }
}
