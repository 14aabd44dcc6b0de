//! Builtin registry: host functions exposed as first-class function
//! values
//!
//! Each builtin has a display name, an ordered parameter list, and a
//! handler. The interpreter declares one function value per entry in
//! the bottom scope; its body is a single external-invocation statement
//! that dispatches back here by registry index. Handlers read their
//! arguments by looking up the parameter names in the current scope.

use std::io::Write as _;

use crate::error::EvalError;
use crate::eval::{Interpreter, ReturnAction};
use crate::value::Value;

/// Handler signature for builtins. Runs against the interpreter with
/// the builtin's parameters bound as locals in the current scope.
pub type BuiltinHandler = fn(&mut Interpreter) -> Result<ReturnAction, EvalError>;

/// A host-implemented function.
#[derive(Debug, Clone)]
pub struct Builtin {
    /// Name the function is declared under
    pub name: &'static str,
    /// Parameter names, in order
    pub params: &'static [&'static str],
    /// The host implementation
    pub handler: BuiltinHandler,
}

/// The table of builtins, indexed by the id embedded in each synthesized
/// function body. Read-only once evaluation starts.
#[derive(Debug, Clone)]
pub struct BuiltinRegistry {
    entries: Vec<Builtin>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::core()
    }
}

impl BuiltinRegistry {
    /// The core builtins: `puts`, `map`, `assert`.
    pub fn core() -> Self {
        Self {
            entries: vec![
                Builtin {
                    name: "puts",
                    params: &["value"],
                    handler: builtin_puts,
                },
                Builtin {
                    name: "map",
                    params: &["target", "func"],
                    handler: builtin_map,
                },
                Builtin {
                    name: "assert",
                    params: &["condition"],
                    handler: builtin_assert,
                },
            ],
        }
    }

    /// Add a builtin. Must happen before the interpreter runs.
    pub fn register(&mut self, builtin: Builtin) {
        self.entries.push(builtin);
    }

    /// Look up a builtin by registry index.
    pub fn get(&self, id: usize) -> Option<&Builtin> {
        self.entries.get(id)
    }

    /// Number of registered builtins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────

/// `puts(value)` — writes the top-level rendering and a newline to the
/// interpreter's output handle.
fn builtin_puts(interp: &mut Interpreter) -> Result<ReturnAction, EvalError> {
    let value = interp.builtin_arg("value")?;
    if let Err(e) = writeln!(interp.out, "{value}") {
        return Err(interp.fail(EvalError::Io {
            message: e.to_string(),
        }));
    }
    Ok(ReturnAction::ReturnedVoid)
}

/// `map(target, func)` — calls `func(element)` per array element, or
/// `func(key, value)` per dict entry, in order. Callback results are
/// discarded; a void callback is fine.
fn builtin_map(interp: &mut Interpreter) -> Result<ReturnAction, EvalError> {
    let target = interp.builtin_arg("target")?;
    let func = match interp.builtin_arg("func")? {
        Value::Function(func) => func,
        other => {
            return Err(interp.fail(EvalError::NotInvocable {
                type_name: other.type_name(),
                span: None,
            }));
        }
    };

    match target {
        Value::Array(items) => {
            for item in items.iter() {
                interp.call_value(&func, vec![item.clone()], "", None)?;
            }
        }
        Value::Dict(entries) => {
            for (key, value) in entries.iter() {
                interp.call_value(&func, vec![key.0.clone(), value.clone()], "", None)?;
            }
        }
        other => {
            return Err(interp.fail(EvalError::TypeError {
                message: format!("Cannot map over {}", other.type_name()),
                span: None,
            }));
        }
    }
    Ok(ReturnAction::ReturnedVoid)
}

/// `assert(condition)` — requires a bool, fails on false.
fn builtin_assert(interp: &mut Interpreter) -> Result<ReturnAction, EvalError> {
    match interp.builtin_arg("condition")? {
        Value::Bool(true) => Ok(ReturnAction::ReturnedVoid),
        Value::Bool(false) => Err(interp.fail(EvalError::AssertFailed { span: None })),
        other => Err(interp.fail(EvalError::TypeError {
            message: format!("Assert requires a bool, got {}", other.type_name()),
            span: None,
        })),
    }
}
