//! # Bramble
//!
//! A tree-walking interpreter for the Bramble expression language: a
//! small dynamically-typed language with integers, booleans, strings,
//! arrays, dicts, and first-class functions with lexical closures.
//!
//! ## Architecture
//!
//! - [`syntax`] — lexer, recursive-descent parser, and AST. The parser
//!   resolves operator precedence and computes each function literal's
//!   free-name list.
//! - [`value`] — the runtime value model: inline scalars, shared
//!   compounds, and function values whose captures live in an arena.
//! - [`environment`] — the scope stack with closure-capture
//!   finalization at scope exit, plus the call stack.
//! - [`eval`] — the evaluator, a recursive descent over the AST.
//! - [`builtins`] — host functions (`puts`, `map`, `assert`) exposed to
//!   programs as ordinary function values.
//! - [`diagnostics`] — the error sink failures are reported through.
//!
//! ## Example
//!
//! ```
//! use bramble::{syntax, Interpreter};
//!
//! let program = syntax::parse("let a = 0; a = (a + 1) * 3; a + 2").unwrap();
//! let result = Interpreter::new().run(&program).unwrap();
//! assert_eq!(result, Some(bramble::Value::Int(5)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtins;
pub mod context;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod eval;
pub mod syntax;
pub mod value;

pub use context::EvalContext;
pub use diagnostics::{BufferSink, ConsoleSink, DiagnosticSink};
pub use environment::{Environment, Frame};
pub use error::{EvalError, SyntaxError};
pub use eval::{Interpreter, ReturnAction};
pub use syntax::ast::{Pos, Program, Span};
pub use value::{CaptureArena, FunctionValue, HashableValue, Value};

/// Bramble version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
