use std::mem;
use std::rc::Rc;

use crate::runtime::Symbol;
use crate::debug::DebugSymbol;
use crate::parser::expr::ExprMeta;


#[derive(Debug, Clone)]
pub enum Stmt {

    Expression(ExprMeta),

    Print(ExprMeta),

    Var {
        name: Symbol,
        init: Option<ExprMeta>,
    },

    Block(Box<[StmtMeta]>),

    If {
        condition: ExprMeta,
        then_branch: Box<StmtMeta>,
        else_branch: Option<Box<StmtMeta>>,
    },

    While {
        condition: ExprMeta,
        body: Box<StmtMeta>,
    },

    Function(Rc<FunctionDecl>),

    Return(Option<ExprMeta>),

    Class(ClassDecl),
}


#[derive(Debug, Clone)]
pub struct Param {
    name: Symbol,
    symbol: DebugSymbol,
}

impl Param {
    pub fn new(name: Symbol, symbol: DebugSymbol) -> Self {
        Self { name, symbol }
    }

    pub fn name(&self) -> Symbol { self.name }
    pub fn debug_symbol(&self) -> &DebugSymbol { &self.symbol }
}


/// A function or method declaration. Shared by every function value created from it.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    name: Symbol,
    params: Box<[Param]>,
    body: Box<[StmtMeta]>,
    symbol: DebugSymbol,  // the function's name
}

impl FunctionDecl {
    pub fn new(name: Symbol, params: Vec<Param>, body: Vec<StmtMeta>, symbol: DebugSymbol) -> Self {
        Self {
            name,
            params: params.into_boxed_slice(),
            body: body.into_boxed_slice(),
            symbol,
        }
    }

    pub fn name(&self) -> Symbol { self.name }
    pub fn params(&self) -> &[Param] { &self.params }
    pub fn body(&self) -> &[StmtMeta] { &self.body }
    pub fn debug_symbol(&self) -> &DebugSymbol { &self.symbol }
}


#[derive(Debug, Clone)]
pub struct ClassDecl {
    name: Symbol,
    superclass: Option<ExprMeta>,  // always an `Expr::Variable`
    methods: Box<[Rc<FunctionDecl>]>,
    symbol: DebugSymbol,  // the class's name
}

impl ClassDecl {
    pub fn new(name: Symbol, superclass: Option<ExprMeta>, methods: Vec<Rc<FunctionDecl>>, symbol: DebugSymbol) -> Self {
        Self {
            name,
            superclass,
            methods: methods.into_boxed_slice(),
            symbol,
        }
    }

    pub fn name(&self) -> Symbol { self.name }
    pub fn superclass(&self) -> Option<&ExprMeta> { self.superclass.as_ref() }
    pub fn methods(&self) -> &[Rc<FunctionDecl>] { &self.methods }
    pub fn debug_symbol(&self) -> &DebugSymbol { &self.symbol }
}


// Stmt + DebugSymbol
#[derive(Debug, Clone)]
pub struct StmtMeta {
    variant: Stmt,
    symbol: DebugSymbol,
}

impl StmtMeta {
    pub fn new(variant: Stmt, symbol: DebugSymbol) -> Self {
        StmtMeta { variant, symbol }
    }

    pub fn variant(&self) -> &Stmt { &self.variant }
    pub fn take_variant(self) -> Stmt { self.take().0 }

    pub fn debug_symbol(&self) -> &DebugSymbol { &self.symbol }

    pub fn take(mut self) -> (Stmt, DebugSymbol) {
        (mem::replace(&mut self.variant, empty_block()), self.symbol)
    }

    // move any nested statements out, leaving an empty block behind
    fn detach_children(&mut self, pending: &mut Vec<StmtMeta>) {
        if !matches!(&self.variant, Stmt::Block(..) | Stmt::If { .. } | Stmt::While { .. }) {
            return;
        }

        match mem::replace(&mut self.variant, empty_block()) {
            Stmt::Block(stmts) => pending.extend(stmts.into_vec()),

            Stmt::If { then_branch, else_branch, .. } => {
                pending.push(*then_branch);
                pending.extend(else_branch.map(|stmt| *stmt));
            },

            Stmt::While { body, .. } => pending.push(*body),

            _ => { },
        }
    }
}

fn empty_block() -> Stmt {
    Stmt::Block(Vec::new().into_boxed_slice())
}

// the default drop glue recurses once per level of nesting
impl Drop for StmtMeta {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);

        while let Some(mut stmt) = pending.pop() {
            stmt.detach_children(&mut pending);
        }
    }
}
