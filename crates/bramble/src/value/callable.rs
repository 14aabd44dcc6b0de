//! Function values and the capture arena

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::syntax::ast::FnDecl;

use super::Value;

/// A first-class function value.
///
/// References its declaration AST node and a capture cell in the
/// interpreter's [`CaptureArena`]. Copies of a function value share the
/// same cell, so captures finalized after the value has been passed
/// around are still visible through every copy.
#[derive(Clone)]
pub struct FunctionValue {
    /// The function literal this value was produced from. Function
    /// equality is `Rc` identity on this node.
    pub decl: Rc<FnDecl>,
    /// Handle to the captures map and lock flag
    pub captures: CaptureId,
}

impl FunctionValue {
    /// Create a function value over a declaration and a freshly
    /// allocated capture cell.
    pub fn new(decl: Rc<FnDecl>, captures: CaptureId) -> Self {
        Self { decl, captures }
    }

    /// Render the function's signature for display, using the name the
    /// call site observed (empty at the definition site):
    /// `function add(a, b)`.
    pub fn signature(&self, name: &str) -> String {
        format!("function {}({})", name, self.decl.params.join(", "))
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature(""))
    }
}

/// Handle to a capture cell in a [`CaptureArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureId(usize);

/// A function's captured bindings and its capture-lock flag.
///
/// While `locked` is false the function is still inside its defining
/// scope and resolves outer names directly; once locked, the map is the
/// frozen snapshot and the only outer state the function can see.
#[derive(Debug, Default)]
pub struct Captures {
    /// Captured name-to-value snapshot, in capture order
    pub map: IndexMap<String, Value>,
    /// Whether the snapshot has been finalized
    pub locked: bool,
}

/// Owner of every captures map and lock flag created alongside function
/// values.
///
/// The arena lives as long as the interpreter and is dropped in bulk
/// after evaluation. Holding captures here instead of behind an `Rc`
/// inside the value keeps self-capturing functions from forming a
/// reference cycle.
#[derive(Debug, Default)]
pub struct CaptureArena {
    cells: Vec<Captures>,
}

impl CaptureArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh, unlocked capture cell.
    pub fn alloc(&mut self) -> CaptureId {
        self.cells.push(Captures::default());
        CaptureId(self.cells.len() - 1)
    }

    /// Read a cell.
    pub fn get(&self, id: CaptureId) -> &Captures {
        &self.cells[id.0]
    }

    /// Write a cell.
    pub fn get_mut(&mut self, id: CaptureId) -> &mut Captures {
        &mut self.cells[id.0]
    }

    /// Number of cells allocated so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells have been allocated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::{Block, Span};

    fn decl(params: &[&str]) -> Rc<FnDecl> {
        Rc::new(FnDecl {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Block {
                stmts: vec![],
                span: Span::default(),
            },
            free_names: vec![],
            span: Span::default(),
        })
    }

    #[test]
    fn arena_alloc_and_lock() {
        let mut arena = CaptureArena::new();
        assert!(arena.is_empty());

        let id = arena.alloc();
        assert_eq!(arena.len(), 1);
        assert!(!arena.get(id).locked);

        arena.get_mut(id).locked = true;
        assert!(arena.get(id).locked);
    }

    #[test]
    fn copies_share_the_capture_cell() {
        let mut arena = CaptureArena::new();
        let f = FunctionValue::new(decl(&[]), arena.alloc());
        let copy = f.clone();

        arena
            .get_mut(f.captures)
            .map
            .insert("x".into(), Value::Int(1));

        assert_eq!(arena.get(copy.captures).map.len(), 1);
    }

    #[test]
    fn signature_rendering() {
        let mut arena = CaptureArena::new();
        let f = FunctionValue::new(decl(&["x", "y"]), arena.alloc());
        assert_eq!(f.signature("add"), "function add(x, y)");
        assert_eq!(f.signature(""), "function (x, y)");
    }
}
