use std::mem;
use std::rc::Rc;

use crate::language::FloatType;
use crate::runtime::Symbol;
use crate::debug::DebugSymbol;
use crate::parser::operator::{BinaryOp, UnaryOp, LogicalOp};


/// Identity of a single expression node, used as the key for resolved depths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(u32);

/// Hands out `ExprId`s. Never produces the same id twice.
#[derive(Debug, Default)]
pub struct ExprIdGen {
    next: u32,
}

impl ExprIdGen {
    pub fn next_id(&mut self) -> ExprId {
        let id = ExprId(self.next);
        self.next = self.next.checked_add(1)
            .expect("expression ids exhausted");
        id
    }
}


#[derive(Debug, Clone)]
pub enum Literal {
    Nil,
    Bool(bool),
    Number(FloatType),
    String(Rc<str>),
}

#[derive(Debug, Clone)]
pub enum Expr {

    Literal(Literal),

    Group(Box<ExprMeta>),

    Variable(Symbol),

    Assign {
        name: Symbol,
        value: Box<ExprMeta>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<ExprMeta>,
    },

    Binary {
        op: BinaryOp,
        lhs: Box<ExprMeta>,
        rhs: Box<ExprMeta>,
    },

    Logical {
        op: LogicalOp,
        lhs: Box<ExprMeta>,
        rhs: Box<ExprMeta>,
    },

    Call {
        callee: Box<ExprMeta>,
        args: Box<[ExprMeta]>,
    },

    // property access
    Get {
        object: Box<ExprMeta>,
        name: Symbol,
    },

    // property assignment
    Set {
        object: Box<ExprMeta>,
        name: Symbol,
        value: Box<ExprMeta>,
    },

    This,

    Super {
        method: Symbol,
    },
}


/// An `Expr` plus a `DebugSymbol` and a unique identity
#[derive(Debug, Clone)]
pub struct ExprMeta {
    id: ExprId,
    variant: Expr,
    symbol: DebugSymbol,
}

impl ExprMeta {
    pub fn new(id: ExprId, variant: Expr, symbol: DebugSymbol) -> Self {
        ExprMeta { id, variant, symbol }
    }

    pub fn id(&self) -> ExprId { self.id }

    pub fn variant(&self) -> &Expr { &self.variant }
    pub fn take_variant(mut self) -> Expr { mem::replace(&mut self.variant, Expr::This) }

    pub fn debug_symbol(&self) -> &DebugSymbol { &self.symbol }

    // move any subexpressions out, leaving a leaf behind
    fn detach_children(&mut self, pending: &mut Vec<ExprMeta>) {
        let variant = match &self.variant {
            Expr::Literal(..) | Expr::Variable(..) | Expr::This | Expr::Super { .. } => return,
            _ => mem::replace(&mut self.variant, Expr::This),
        };

        match variant {
            Expr::Group(inner) => pending.push(*inner),
            Expr::Assign { value, .. } => pending.push(*value),
            Expr::Unary { operand, .. } => pending.push(*operand),
            Expr::Get { object, .. } => pending.push(*object),

            Expr::Binary { lhs, rhs, .. } | Expr::Logical { lhs, rhs, .. } => {
                pending.push(*lhs);
                pending.push(*rhs);
            },

            Expr::Set { object, value, .. } => {
                pending.push(*object);
                pending.push(*value);
            },

            Expr::Call { callee, args } => {
                pending.push(*callee);
                pending.extend(args.into_vec());
            },

            Expr::Literal(..) | Expr::Variable(..) | Expr::This | Expr::Super { .. } => { },
        }
    }
}

// the default drop glue recurses once per level of nesting
impl Drop for ExprMeta {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);

        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}
