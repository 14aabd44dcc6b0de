//! The evaluator: executes statements and evaluates expressions
//!
//! A recursive descent over the AST against the scope stack. Every
//! entry point returns `Result`; on an error the current evaluation
//! unwinds to the top, scoping out along the way so binding lifetimes
//! and the call stack stay consistent.

mod binary;
mod call;
mod expr;
mod stmt;

use std::io::{self, Write};
use std::rc::Rc;

use crate::builtins::BuiltinRegistry;
use crate::context::EvalContext;
use crate::diagnostics::{ConsoleSink, DiagnosticSink};
use crate::environment::Environment;
use crate::error::EvalError;
use crate::syntax::ast::{Block, FnDecl, Program, Span, Stmt};
use crate::value::{CaptureArena, FunctionValue, Value};

/// Result of executing a statement: fallthrough, or an explicit return
/// with or without a value.
///
/// Distinguishing `ReturnedVoid` from `DidntReturn` lets block
/// execution propagate a bare `return;` upward while plain fallthrough
/// continues with the next statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnAction {
    /// Execution fell through without hitting `return`
    DidntReturn,
    /// A `return;` with no expression
    ReturnedVoid,
    /// A `return expr;` (or trailing expression) with its value
    ReturnedValue(Value),
}

/// The tree-walking interpreter.
///
/// Owns the scope stack, the capture arena, the builtin registry, the
/// diagnostic sink, and the output handle `puts` writes to. A single
/// interpreter can run multiple programs in sequence; the scope stack
/// is empty between runs.
pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) arena: CaptureArena,
    pub(crate) builtins: BuiltinRegistry,
    pub(crate) ctx: EvalContext,
    pub(crate) sink: Box<dyn DiagnosticSink>,
    pub(crate) out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter reporting to stderr and writing to stdout.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            arena: CaptureArena::new(),
            builtins: BuiltinRegistry::core(),
            ctx: EvalContext::default(),
            sink: Box::new(ConsoleSink::default()),
            out: Box::new(io::stdout()),
        }
    }

    /// Replace the diagnostic sink.
    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the output handle used by `puts`.
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    /// Replace the evaluation limits.
    pub fn with_context(mut self, ctx: EvalContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Replace the builtin registry.
    pub fn with_builtins(mut self, builtins: BuiltinRegistry) -> Self {
        self.builtins = builtins;
        self
    }

    /// Run a program.
    ///
    /// The builtins scope is pushed at the bottom, the program executes
    /// as one block above it, and both are popped before returning — the
    /// scope stack is empty afterwards whether or not evaluation
    /// succeeded. A top-level trailing expression becomes the returned
    /// value.
    pub fn run(&mut self, program: &Program) -> Result<Option<Value>, EvalError> {
        self.env.scope_in_block();
        self.install_builtins();
        self.env.scope_in_block();

        let result = self.exec_stmts(&program.stmts);

        self.env.scope_out(&mut self.arena);
        self.env.scope_out(&mut self.arena);

        match result? {
            ReturnAction::ReturnedValue(value) => Ok(Some(value)),
            ReturnAction::ReturnedVoid | ReturnAction::DidntReturn => Ok(None),
        }
    }

    /// Declare each registered builtin in the bottom scope as a function
    /// value whose body dispatches into the registry.
    ///
    /// Builtins take the normal pending-capture path, so they stay
    /// unlocked for the whole run: a user callback invoked through `map`
    /// still resolves outer names through the builtin's scope.
    fn install_builtins(&mut self) {
        for id in 0..self.builtins.len() {
            let (name, params) = match self.builtins.get(id) {
                Some(builtin) => (builtin.name, builtin.params),
                None => continue,
            };
            let decl = Rc::new(FnDecl {
                params: params.iter().map(|p| p.to_string()).collect(),
                body: Block {
                    stmts: vec![Stmt::External { id }],
                    span: Span::default(),
                },
                free_names: Vec::new(),
                span: Span::default(),
            });
            let func = FunctionValue::new(decl, self.arena.alloc());
            self.env.declare(name, Value::Function(func.clone()));
            self.env.add_pending(func);
        }
    }

    /// Report an error to the sink with the current call stack, then
    /// hand it back for propagation. Every evaluation error is created
    /// through this, so each is reported exactly once.
    pub(crate) fn fail(&mut self, err: EvalError) -> EvalError {
        self.sink
            .fail(err.span(), &err.to_string(), self.env.frames());
        err
    }

    /// Read a builtin's argument by parameter name from the current
    /// scope.
    pub(crate) fn builtin_arg(&mut self, name: &str) -> Result<Value, EvalError> {
        match self.env.lookup(name, &self.arena) {
            Some(value) => Ok(value.deep_copy()),
            None => Err(self.fail(EvalError::IdentifierNotFound {
                name: name.to_string(),
                span: None,
            })),
        }
    }
}
