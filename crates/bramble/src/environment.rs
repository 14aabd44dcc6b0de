//! Runtime environment: the scope stack, variable bindings, and the
//! call stack
//!
//! Uses a flat binding vector with per-scope boundaries: scope entry
//! records the current length, scope exit truncates back to it. Lookup
//! walks scopes innermost-first and, at each locked function scope,
//! switches to that function's frozen captures.

use crate::syntax::ast::Span;
use crate::value::{CaptureArena, FunctionValue, Value};

/// A single variable binding.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The binding's name
    pub name: String,
    /// The bound value
    pub value: Value,
}

/// What kind of scope a stack entry is.
#[derive(Debug, Clone)]
pub enum ScopeKind {
    /// Delimits name scoping and binding lifetime only
    Block,
    /// A function invocation. Blocks outward mutable lookup, and — once
    /// the callee's capture-lock is set — routes outward reads through
    /// its captures.
    Function {
        /// The function being executed in this scope
        callee: FunctionValue,
    },
}

/// One scope on the stack.
#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    /// Index into the flat binding vector where this scope begins
    start: usize,
    /// Function values defined in this scope whose captures are
    /// finalized when the scope exits
    pending: Vec<FunctionValue>,
}

/// A call-stack frame, kept for error messages only.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Rendered callee display name, e.g. `function toggle()`
    pub name: String,
    /// Call-site source range
    pub span: Span,
}

/// The scope stack plus the call stack.
#[derive(Debug, Default)]
pub struct Environment {
    /// All live bindings in a flat vector (most recent at the end)
    bindings: Vec<Binding>,
    /// Scope records, bottom first
    scopes: Vec<Scope>,
    /// Call frames, outermost first
    frames: Vec<Frame>,
}

impl Environment {
    /// Create an empty environment with no scopes.
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scope Entry / Exit
    // ═══════════════════════════════════════════════════════════════════

    /// Push a Block scope.
    pub fn scope_in_block(&mut self) {
        self.scopes.push(Scope {
            kind: ScopeKind::Block,
            start: self.bindings.len(),
            pending: Vec::new(),
        });
    }

    /// Push a Function scope and its call-stack frame.
    pub fn scope_in_function(&mut self, callee: FunctionValue, frame: Frame) {
        self.scopes.push(Scope {
            kind: ScopeKind::Function { callee },
            start: self.bindings.len(),
            pending: Vec::new(),
        });
        self.frames.push(frame);
    }

    /// Pop the current scope.
    ///
    /// Finalizes captures for every function defined in the scope —
    /// resolving each free name against the still-live stack and
    /// deep-copying the result — then releases the scope's bindings and,
    /// for a Function scope, pops the call frame. Capture finalization
    /// runs strictly before binding release, so a function captured at
    /// scope exit never observes a freed binding.
    pub fn scope_out(&mut self, arena: &mut CaptureArena) {
        let (start, is_function, pending) = match self.scopes.last_mut() {
            Some(scope) => (
                scope.start,
                matches!(scope.kind, ScopeKind::Function { .. }),
                std::mem::take(&mut scope.pending),
            ),
            None => return,
        };

        for func in pending {
            for name in &func.decl.free_names {
                if let Some(value) = self.lookup(name, arena) {
                    let copy = value.deep_copy();
                    arena.get_mut(func.captures).map.insert(name.clone(), copy);
                }
            }
            arena.get_mut(func.captures).locked = true;
        }

        self.bindings.truncate(start);
        if is_function {
            self.frames.pop();
        }
        self.scopes.pop();
    }

    /// Register a function value defined in the current scope for
    /// capture finalization at scope exit.
    pub fn add_pending(&mut self, func: FunctionValue) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.pending.push(func);
        }
    }

    /// Number of scopes on the stack.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no bindings are live.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Declaration
    // ═══════════════════════════════════════════════════════════════════

    /// Create a binding in the current scope.
    ///
    /// Returns `false` if the name already exists in the current scope
    /// or in any enclosing Block scope up to the nearest enclosing
    /// Function scope. Names bound in an enclosing Function scope may be
    /// shadowed.
    pub fn declare(&mut self, name: &str, value: Value) -> bool {
        let mut end = self.bindings.len();
        let mut scopes = self.scopes.iter().rev();

        // The current scope is always checked, whatever its kind.
        if let Some(top) = scopes.next() {
            if self.contains_in_range(name, top.start, end) {
                return false;
            }
            end = top.start;
            if !matches!(top.kind, ScopeKind::Function { .. }) {
                for scope in scopes {
                    if matches!(scope.kind, ScopeKind::Function { .. }) {
                        break;
                    }
                    if self.contains_in_range(name, scope.start, end) {
                        return false;
                    }
                    end = scope.start;
                }
            }
        }

        self.bindings.push(Binding {
            name: name.to_string(),
            value,
        });
        true
    }

    fn contains_in_range(&self, name: &str, start: usize, end: usize) -> bool {
        self.bindings[start..end].iter().any(|b| b.name == name)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Name Resolution
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve a name for reading.
    ///
    /// Walks scopes innermost to outermost. A scope's own bindings win;
    /// otherwise a Block continues outward, an unlocked Function scope
    /// continues outward (its prospective captures are still live outer
    /// names), and a locked Function scope consults the callee's frozen
    /// captures and stops.
    pub fn lookup(&self, name: &str, arena: &CaptureArena) -> Option<Value> {
        let mut end = self.bindings.len();
        for scope in self.scopes.iter().rev() {
            if let Some(binding) = self.bindings[scope.start..end]
                .iter()
                .rev()
                .find(|b| b.name == name)
            {
                return Some(binding.value.clone());
            }
            if let ScopeKind::Function { callee } = &scope.kind {
                let captures = arena.get(callee.captures);
                if captures.locked {
                    return captures.map.get(name).cloned();
                }
            }
            end = scope.start;
        }
        None
    }

    /// Resolve a name for assignment, returning the binding's index.
    ///
    /// Identical to [`lookup`](Self::lookup) except that a locked
    /// Function scope blocks outward traversal entirely: captures are
    /// read-only within the callee.
    pub fn resolve_assignable(&self, name: &str, arena: &CaptureArena) -> Option<usize> {
        let mut end = self.bindings.len();
        for scope in self.scopes.iter().rev() {
            if let Some(offset) = self.bindings[scope.start..end]
                .iter()
                .rposition(|b| b.name == name)
            {
                return Some(scope.start + offset);
            }
            if let ScopeKind::Function { callee } = &scope.kind {
                if arena.get(callee.captures).locked {
                    return None;
                }
            }
            end = scope.start;
        }
        None
    }

    /// Replace the value at a binding index obtained from
    /// [`resolve_assignable`](Self::resolve_assignable). The previous
    /// value is released.
    pub fn write(&mut self, index: usize, value: Value) {
        self.bindings[index].value = value;
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Stack
    // ═══════════════════════════════════════════════════════════════════

    /// The call frames, outermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Current call depth.
    pub fn call_depth(&self) -> usize {
        self.frames.len()
    }
}
