//! Display and Debug implementations for Value
//!
//! `Display` is the top-level rendering used by `puts` and by string
//! concatenation: strings appear bare. `Debug` is the aggregate form
//! used inside arrays and dicts: strings appear quoted.

use std::fmt;

use super::Value;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{:?}", s.as_ref()),

            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {:?}", k.0, v)?;
                }
                write!(f, "}}")
            }

            Value::Function(func) => write!(f, "{}", func.signature("")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s.as_ref()), // No quotes at top level
            _ => fmt::Debug::fmt(self, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::HashableValue;
    use indexmap::IndexMap;

    #[test]
    fn scalars() {
        assert_eq!(format!("{}", Value::Int(42)), "42");
        assert_eq!(format!("{}", Value::Bool(true)), "true");
    }

    #[test]
    fn strings_bare_at_top_level_quoted_in_aggregates() {
        let s = Value::string("hi");
        assert_eq!(format!("{}", s), "hi");
        assert_eq!(format!("{:?}", s), "\"hi\"");

        let arr = Value::array(vec![Value::string("hi")]);
        assert_eq!(format!("{}", arr), "[\"hi\"]");
    }

    #[test]
    fn arrays() {
        let arr = Value::array(vec![
            Value::Int(6),
            Value::Int(9),
            Value::array(vec![]),
            Value::string("!"),
        ]);
        assert_eq!(format!("{}", arr), "[6, 9, [], \"!\"]");
    }

    #[test]
    fn dicts_render_in_insertion_order() {
        let mut entries = IndexMap::new();
        entries.insert(HashableValue(Value::string("a")), Value::Int(1));
        entries.insert(HashableValue(Value::Int(2)), Value::Bool(false));
        let d = Value::dict(entries);
        assert_eq!(format!("{}", d), "{\"a\": 1, 2: false}");
    }

    #[test]
    fn empty_aggregates() {
        assert_eq!(format!("{}", Value::array(vec![])), "[]");
        assert_eq!(format!("{}", Value::dict(IndexMap::new())), "{}");
    }
}
