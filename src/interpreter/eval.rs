use crate::language;
use crate::stack;
use crate::parser::expr::{ExprMeta, Expr, ExprId, Literal};
use crate::parser::operator::LogicalOp;
use crate::runtime::{Value, Symbol};
use crate::runtime::strings::static_symbol;
use crate::runtime::errors::{ExecResult, RuntimeError};
use crate::interpreter::Interpreter;
use crate::interpreter::ops;


impl Interpreter {
    pub(super) fn eval(&mut self, expr: &ExprMeta) -> ExecResult<Value> {
        stack::ensure_sufficient_stack(|| {
            self.eval_variant(expr.id(), expr.variant())
                .map_err(|error| error.with_symbol(expr.debug_symbol()))
        })
    }

    fn eval_variant(&mut self, id: ExprId, expr: &Expr) -> ExecResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(eval_literal(literal)),

            Expr::Group(inner) => self.eval(inner),

            Expr::Variable(name) => self.lookup_variable(id, name),

            Expr::Assign { name, value } => {
                let value = self.eval(value)?;
                self.assign_variable(id, *name, value.clone())?;
                Ok(value)
            },

            Expr::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                ops::eval_unary(*op, &operand)
            },

            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                ops::eval_binary(*op, &lhs, &rhs)
            },

            Expr::Logical { op, lhs, rhs } => self.eval_short_circuit_logic(*op, lhs, rhs),

            Expr::Call { callee, args } => {
                let callee = self.eval(callee)?;

                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args.iter() {
                    arg_values.push(self.eval(arg)?);
                }

                self.call(&callee, arg_values)
            },

            Expr::Get { object, name } => {
                match self.eval(object)? {
                    Value::Instance(instance) => instance.get(name)
                        .ok_or_else(|| RuntimeError::undefined_property(*name)),

                    other => Err(RuntimeError::no_properties(&other)),
                }
            },

            Expr::Set { object, name, value } => {
                let instance = match self.eval(object)? {
                    Value::Instance(instance) => instance,
                    other => return Err(RuntimeError::no_properties(&other)),
                };

                let value = self.eval(value)?;
                instance.set(*name, value.clone());
                Ok(value)
            },

            Expr::This => self.lookup_variable(id, &static_symbol!(language::THIS_NAME)),

            Expr::Super { method } => self.eval_super(id, method),
        }
    }

    fn eval_short_circuit_logic(&mut self, op: LogicalOp, lhs: &ExprMeta, rhs: &ExprMeta) -> ExecResult<Value> {
        let lhs_value = self.eval(lhs)?;

        let cond = match op {
            LogicalOp::And => !lhs_value.truth_value(),
            LogicalOp::Or => lhs_value.truth_value(),
        };

        if cond {
            Ok(lhs_value)
        } else {
            self.eval(rhs)
        }
    }

    // the method is found starting from the superclass of the class that contains
    // this expression, then bound to the current `this`
    fn eval_super(&mut self, id: ExprId, method: &Symbol) -> ExecResult<Value> {
        let depth = *self.resolutions.get(&id)
            .expect("super expression was not resolved");

        let superclass = self.env.get_at(depth, &static_symbol!(language::SUPER_NAME));
        let superclass = superclass.as_class()
            .expect("super is bound to a class");

        // `this` is always one environment inside of `super`
        let instance = self.env.get_at(depth - 1, &static_symbol!(language::THIS_NAME));
        let instance = instance.as_instance()
            .expect("this is bound to an instance");

        let method = superclass.find_method(method)
            .ok_or_else(|| RuntimeError::undefined_property(*method))?;

        Ok(Value::from(method.bind(instance.clone())))
    }
}

fn eval_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Nil => Value::Nil,
        Literal::Bool(value) => Value::Bool(*value),
        Literal::Number(value) => Value::Number(*value),
        Literal::String(value) => Value::String(value.clone()),
    }
}
