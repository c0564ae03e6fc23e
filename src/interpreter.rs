use std::io;
use std::rc::Rc;

use crate::language;
use crate::builtins;
use crate::parser::expr::ExprId;
use crate::parser::stmt::StmtMeta;
use crate::resolver::{ResolvedAst, ResolutionTable, new_resolution_table};
use crate::runtime::{Value, Symbol, Environment, Callable, Invoke};
use crate::runtime::errors::{ExecResult, RuntimeError};

mod exec;
mod eval;
mod ops;
mod tests;


/// The outcome of executing a statement.
///
/// `Return` unwinds statement by statement until it reaches the function call that
/// started it. Only `Function::invoke` turns it back into a value.
#[derive(Debug, Clone)]
pub enum ControlFlow {
    None,
    Return(Value),
}


pub struct Interpreter {
    globals: Rc<Environment>,
    env: Rc<Environment>,  // the current environment
    resolutions: ResolutionTable,
    output: Box<dyn io::Write>,
    depth: usize,  // number of active calls
    max_depth: usize,
}

impl Interpreter {
    /// Create an interpreter with the builtins defined in its global environment.
    /// `print` statements write to `output`.
    pub fn new(output: Box<dyn io::Write>) -> Self {
        let globals = Environment::new_global();
        builtins::define_builtins(&globals);
        log::trace!("new global environment");

        Self {
            env: globals.clone(),
            globals,
            resolutions: new_resolution_table(),
            output,
            depth: 0,
            max_depth: language::MAX_CALL_DEPTH,
        }
    }

    pub fn globals(&self) -> &Rc<Environment> { &self.globals }

    /// Change how deeply calls may nest before a run fails with a stack overflow error
    pub fn set_max_call_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Run a whole program.
    ///
    /// The first runtime error stops the program. Globals defined before the error are kept,
    /// so the same interpreter can go on to run more programs.
    pub fn execute(&mut self, ast: ResolvedAst) -> ExecResult<()> {
        let (stmts, resolutions) = ast.take();
        self.resolutions.extend(resolutions);

        let result = self.exec_stmts(&stmts);

        // an error may have unwound out of nested calls
        self.env = self.globals.clone();
        self.depth = 0;

        if let Err(error) = &result {
            log::debug!("{}", error);
        }

        result.map(|_| ())
    }

    /// Execute `stmts` with `env` as the current environment.
    /// The previous environment is restored afterwards, whether or not an error occurred.
    pub fn exec_block(&mut self, stmts: &[StmtMeta], env: Rc<Environment>) -> ExecResult<ControlFlow> {
        let previous = std::mem::replace(&mut self.env, env);
        let result = self.exec_stmts(stmts);
        self.env = previous;
        result
    }

    fn exec_stmts(&mut self, stmts: &[StmtMeta]) -> ExecResult<ControlFlow> {
        for stmt in stmts.iter() {
            if let ControlFlow::Return(value) = self.exec(stmt)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::None)
    }

    fn lookup_variable(&self, id: ExprId, name: &Symbol) -> ExecResult<Value> {
        match self.resolutions.get(&id) {
            Some(&depth) => Ok(self.env.get_at(depth, name)),
            None => self.globals.get(name),
        }
    }

    fn assign_variable(&self, id: ExprId, name: Symbol, value: Value) -> ExecResult<()> {
        match self.resolutions.get(&id) {
            Some(&depth) => {
                self.env.assign_at(depth, name, value);
                Ok(())
            },
            None => self.globals.assign(&name, value),
        }
    }

    /// Invoke `callee` after checking that it can be called with `args`
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> ExecResult<Value> {
        let callable = match callee {
            Value::Callable(callable) => callable,
            _ => return Err(RuntimeError::not_callable(callee)),
        };

        if args.len() != callable.arity() {
            return Err(RuntimeError::arity_mismatch(callable, callable.arity(), args.len()));
        }

        self.invoke_limited(callable, args)
    }

    fn invoke_limited(&mut self, callable: &Callable, args: Vec<Value>) -> ExecResult<Value> {
        if self.depth >= self.max_depth {
            return Err(RuntimeError::stack_overflow());
        }

        self.depth += 1;
        let result = callable.invoke(self, args);
        self.depth -= 1;

        result
    }

    fn print_value(&mut self, value: &Value) -> ExecResult<()> {
        writeln!(self.output, "{}", value)
            .map_err(RuntimeError::io_error)
    }
}
