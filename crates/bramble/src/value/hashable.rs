//! Hashable wrapper for Value to enable use as dict keys

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::Value;

/// A wrapper for [`Value`] that implements `Hash` and `Eq`.
///
/// Every variant is hashable; hashing mirrors value equality:
/// - scalars hash their payload
/// - strings hash their bytes
/// - arrays hash their length mixed with each element's hash
/// - dicts hash their size mixed with per-entry `key ⊕ value` hashes,
///   combined order-independently so equal dicts built in different
///   insertion orders still collide
/// - functions hash their AST node's address
#[derive(Debug, Clone)]
pub struct HashableValue(pub Value);

impl Hash for HashableValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(&self.0, state);
    }
}

impl PartialEq for HashableValue {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for HashableValue {}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);

    match value {
        Value::Int(n) => n.hash(state),
        Value::Bool(b) => b.hash(state),
        Value::String(s) => s.hash(state),
        Value::Array(items) => {
            items.len().hash(state);
            for item in items.iter() {
                hash_value(item, state);
            }
        }
        Value::Dict(entries) => {
            entries.len().hash(state);
            let mut combined: u64 = 0;
            for (key, value) in entries.iter() {
                combined ^= sub_hash(&key.0) ^ sub_hash(value).rotate_left(32);
            }
            combined.hash(state);
        }
        Value::Function(f) => (Rc::as_ptr(&f.decl) as usize).hash(state),
    }
}

/// Hash a value in a fresh hasher, for order-independent combination.
fn sub_hash(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(value, &mut hasher);
    hasher.finish()
}
