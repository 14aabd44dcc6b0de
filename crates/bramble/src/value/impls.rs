//! Value trait implementations: constructors, extractors, deep copy, PartialEq

use std::rc::Rc;

use indexmap::IndexMap;

use super::{HashableValue, Value};

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Rc::new(s.into()))
    }

    /// Create an array value
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    /// Create a dict value
    pub fn dict(entries: IndexMap<HashableValue, Value>) -> Self {
        Value::Dict(Rc::new(entries))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Names and Extractors
    // ═══════════════════════════════════════════════════════════════════

    /// The value's type name as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
        }
    }

    /// Extract a boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract an integer payload
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract array elements as a slice
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Deep Copy
    // ═══════════════════════════════════════════════════════════════════

    /// Recursive structural copy.
    ///
    /// Scalars and functions come back as-is; compounds get fresh
    /// buffers all the way down. Applied at every read-through boundary
    /// (variable read, index read, argument binding, capture
    /// finalization) so mutation of one binding can never show through
    /// another. Always an identity under value equality.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Int(_) | Value::Bool(_) | Value::Function(_) => self.clone(),
            Value::String(s) => Value::String(Rc::new(s.as_ref().clone())),
            Value::Array(items) => {
                Value::Array(Rc::new(items.iter().map(Value::deep_copy).collect()))
            }
            Value::Dict(entries) => Value::Dict(Rc::new(
                entries
                    .iter()
                    .map(|(k, v)| (HashableValue(k.0.deep_copy()), v.deep_copy()))
                    .collect(),
            )),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Scalars by payload
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,

            // Strings by byte content
            (Value::String(a), Value::String(b)) => a == b,

            // Arrays element-wise
            (Value::Array(a), Value::Array(b)) => a == b,

            // Dicts by key set and per-key value (order-independent)
            (Value::Dict(a), Value::Dict(b)) => a == b,

            // Functions by AST-node identity, not extensional behavior
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(&a.decl, &b.decl),

            // Different types are never equal
            _ => false,
        }
    }
}

impl Eq for Value {}
