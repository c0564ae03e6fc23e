use std::rc::Rc;

use crate::language;
use crate::stack;
use crate::parser::stmt::{StmtMeta, Stmt, ClassDecl};
use crate::runtime::{Value, Environment, Function, Class};
use crate::runtime::class::new_method_table;
use crate::runtime::strings::static_symbol;
use crate::runtime::errors::{ExecResult, RuntimeError};
use crate::interpreter::{Interpreter, ControlFlow};


impl Interpreter {
    pub(super) fn exec(&mut self, stmt: &StmtMeta) -> ExecResult<ControlFlow> {
        stack::ensure_sufficient_stack(|| {
            self.exec_variant(stmt.variant())
                .map_err(|error| error.with_symbol(stmt.debug_symbol()))
        })
    }

    fn exec_variant(&mut self, stmt: &Stmt) -> ExecResult<ControlFlow> {
        match stmt {
            Stmt::Expression(expr) => {
                // eval an expression just for side effects
                self.eval(expr)?;
            },

            Stmt::Print(expr) => {
                let value = self.eval(expr)?;
                self.print_value(&value)?;
            },

            Stmt::Var { name, init } => {
                let value = match init {
                    Some(init) => self.eval(init)?,
                    None => Value::Nil,
                };
                self.env.define(*name, value);
            },

            Stmt::Block(stmts) => {
                let env = Environment::new_local(&self.env);
                return self.exec_block(stmts, env);
            },

            Stmt::If { condition, then_branch, else_branch } => {
                if self.eval(condition)?.truth_value() {
                    return self.exec(then_branch);
                }
                if let Some(else_branch) = else_branch {
                    return self.exec(else_branch);
                }
            },

            Stmt::While { condition, body } => {
                while self.eval(condition)?.truth_value() {
                    if let ControlFlow::Return(value) = self.exec(body)? {
                        return Ok(ControlFlow::Return(value));
                    }
                }
            },

            Stmt::Function(decl) => {
                let function = Function::new(decl.clone(), self.env.clone(), false);
                self.env.define(decl.name(), Value::from(function));
            },

            Stmt::Return(value) => {
                let value = match value {
                    Some(value) => self.eval(value)?,
                    None => Value::Nil,
                };
                return Ok(ControlFlow::Return(value));
            },

            Stmt::Class(decl) => self.exec_class(decl)?,
        }

        Ok(ControlFlow::None)
    }

    fn exec_class(&mut self, decl: &ClassDecl) -> ExecResult<()> {
        let superclass = match decl.superclass() {
            None => None,
            Some(expr) => {
                let value = self.eval(expr)?;
                match value.as_class() {
                    Some(class) => Some(class.clone()),
                    None => return Err(
                        RuntimeError::superclass_not_a_class(&value)
                            .with_symbol(expr.debug_symbol())
                    ),
                }
            },
        };

        log::debug!("define class {}", decl.name());

        // methods close over an extra environment that holds `super`
        let enclosing = self.env.clone();
        if let Some(superclass) = superclass.as_ref() {
            let env = Environment::new_local(&self.env);
            env.define(static_symbol!(language::SUPER_NAME), Value::from(superclass.clone()));
            self.env = env;
        }

        let init_name = static_symbol!(language::INIT_NAME);
        let mut methods = new_method_table();
        for method in decl.methods().iter() {
            let is_init = method.name() == init_name;
            let function = Function::new(method.clone(), self.env.clone(), is_init);
            methods.insert(method.name(), Rc::new(function));
        }

        self.env = enclosing;

        let class = Class::new(decl.name(), superclass, methods);
        self.env.define(decl.name(), Value::from(Rc::new(class)));

        Ok(())
    }
}
