//! Value representation for runtime values

mod callable;
mod display;
mod hashable;
mod impls;

pub use callable::{CaptureArena, CaptureId, Captures, FunctionValue};
pub use hashable::HashableValue;

use std::rc::Rc;

use indexmap::IndexMap;

/// Runtime value for the Bramble interpreter.
///
/// Values come in two tiers:
/// - Inline scalars (`Int`, `Bool`), copied by value
/// - Shared compounds (`String`, `Array`, `Dict`), `Rc`-counted and
///   immutable once constructed
///
/// `Function` values are shared by AST identity: they hold an `Rc` to
/// their declaration node plus a handle into the interpreter's capture
/// arena. The language has no element-mutation primitive and every
/// read-through boundary deep-copies, so the value graph stays acyclic
/// except for functions that capture themselves — which is why captures
/// live in the arena rather than behind another `Rc`.
#[derive(Clone)]
pub enum Value {
    /// Signed 64-bit integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// Immutable string
    String(Rc<String>),
    /// Ordered sequence of values
    Array(Rc<Vec<Value>>),
    /// Value-to-value mapping with insertion order preserved and
    /// insertion-time key uniqueness enforced
    Dict(Rc<IndexMap<HashableValue, Value>>),
    /// First-class function
    Function(FunctionValue),
}
