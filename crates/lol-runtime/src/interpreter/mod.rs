//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation over an arena of scopes.
//! Supports:
//! - Expression evaluation with auto-invocation of zero-parameter callables
//! - Statement execution (declarations, assignments, printing, conditionals)
//! - Function calls, bound methods and instance creation
//! - A configurable call-depth limit

mod expr;
mod scope;
mod stmt;

pub use scope::{Scope, ScopeId, GLOBAL_SCOPE};

use crate::ast::Program;
use crate::output::{stdout_writer, OutputWriter};
use crate::span::Span;
use crate::value::{Callable, Instance, RuntimeError, Value};
use std::rc::Rc;
use tracing::{debug, trace};

/// Default maximum nesting of function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Result of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ControlFlow {
    Normal,
    Return(Value),
}

/// Interpreter state
pub struct Interpreter {
    /// Scope arena, global scope first
    pub(super) scopes: Vec<Scope>,
    /// Innermost scope of the code being executed
    pub(super) current_scope: ScopeId,
    /// Instance bound by the running method, if any
    pub(super) current_instance: Option<Rc<Instance>>,
    pub(super) call_depth: usize,
    pub(super) max_call_depth: usize,
    /// Where `VISIBLE` writes
    pub(super) output: OutputWriter,
}

impl Interpreter {
    /// Create a new interpreter writing to standard output
    pub fn new() -> Self {
        Self::with_output(stdout_writer())
    }

    /// Create a new interpreter writing to `output`
    pub fn with_output(output: OutputWriter) -> Self {
        Self {
            scopes: vec![Scope::new(None)],
            current_scope: GLOBAL_SCOPE,
            current_instance: None,
            call_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            output,
        }
    }

    /// Set the maximum call depth
    pub fn set_max_call_depth(&mut self, depth: usize) {
        self.max_call_depth = depth;
    }

    /// Replace the output writer
    pub fn set_output_writer(&mut self, output: OutputWriter) {
        self.output = output;
    }

    /// Execute a program
    ///
    /// Globals persist across calls, so an embedder can run several programs
    /// against the same interpreter.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        debug!(statements = program.statements.len(), "executing program");

        for stmt in &program.statements {
            if let ControlFlow::Return(_) = self.exec_stmt(stmt)? {
                return Err(RuntimeError::ReturnOutsideFunction { span: stmt.span() });
            }
        }

        Ok(())
    }

    /// Read a global variable
    pub fn global(&self, name: &str) -> Option<Value> {
        self.scopes[GLOBAL_SCOPE].vars.get(name).cloned()
    }

    /// Define a global variable (for embedding and tests)
    pub fn define_global(&mut self, name: impl Into<String>, value: Value) {
        self.scopes[GLOBAL_SCOPE].vars.insert(name.into(), value);
    }

    /// Invoke `callable` with already evaluated arguments
    pub(super) fn call(
        &mut self,
        callable: &Callable,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        if args.len() != callable.arity() {
            return Err(RuntimeError::ArityMismatch {
                name: callable.name().to_string(),
                expected: callable.arity(),
                found: args.len(),
                span,
            });
        }
        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                limit: self.max_call_depth,
                span,
            });
        }

        // Methods see the caller's scope; free functions only see globals
        let parent = if callable.instance.is_some() {
            self.current_scope
        } else {
            GLOBAL_SCOPE
        };

        trace!(function = callable.name(), depth = self.call_depth + 1, "call");
        self.call_depth += 1;
        let def = Rc::clone(&callable.def);
        let result = self.with_frame(parent, callable.instance.clone(), |interp| {
            for (param, value) in def.params.iter().zip(args) {
                interp.define(&param.name, value);
            }
            match interp.exec_block(&def.body)? {
                ControlFlow::Return(value) => Ok(value),
                ControlFlow::Normal => Ok(Value::Noob),
            }
        });
        self.call_depth -= 1;

        result
    }

    /// Run `body` in a fresh scope, restoring scope and instance afterwards
    ///
    /// The arena is truncated back on every exit path, including errors.
    pub(super) fn with_frame<T>(
        &mut self,
        parent: ScopeId,
        instance: Option<Rc<Instance>>,
        body: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let mark = self.scopes.len();
        let saved_scope = self.current_scope;
        let saved_instance = std::mem::replace(&mut self.current_instance, instance);

        self.scopes.push(Scope::new(Some(parent)));
        self.current_scope = mark;
        trace!(scope = mark, parent, "push scope");

        let result = body(self);

        self.scopes.truncate(mark);
        self.current_scope = saved_scope;
        self.current_instance = saved_instance;
        result
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
