//! Error types for Bramble parsing and evaluation

use thiserror::Error;

use crate::syntax::ast::{Pos, Span};

/// Errors produced by the lexer and parser.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    /// A character outside the language's alphabet
    #[error("Unexpected character `{ch}`")]
    UnexpectedCharacter {
        /// The offending character
        ch: char,
        /// Where it occurred
        pos: Pos,
    },

    /// A string literal missing its closing quote
    #[error("Unterminated string literal")]
    UnterminatedString {
        /// Where the literal started
        pos: Pos,
    },

    /// An escape sequence the lexer does not recognise
    #[error("Unknown escape sequence `\\{ch}`")]
    UnknownEscape {
        /// The escaped character
        ch: char,
        /// Where the escape occurred
        pos: Pos,
    },

    /// An integer literal that does not fit a signed 64-bit value
    #[error("Integer literal out of range")]
    IntegerOutOfRange {
        /// Where the literal started
        pos: Pos,
    },

    /// The parser expected one construct and found another
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken {
        /// Description of the expected construct
        expected: String,
        /// The token actually present
        found: String,
        /// Where the token occurred
        pos: Pos,
    },

    /// A non-invocation expression used as a statement
    #[error("Only call expressions can be used as statements")]
    ExpressionNotACall {
        /// Where the expression started
        pos: Pos,
    },
}

impl SyntaxError {
    /// The source position of this error.
    pub fn pos(&self) -> Pos {
        match self {
            SyntaxError::UnexpectedCharacter { pos, .. }
            | SyntaxError::UnterminatedString { pos }
            | SyntaxError::UnknownEscape { pos, .. }
            | SyntaxError::IntegerOutOfRange { pos }
            | SyntaxError::UnexpectedToken { pos, .. }
            | SyntaxError::ExpressionNotACall { pos } => *pos,
        }
    }
}

/// Errors that can occur during evaluation.
///
/// Each variant fixes the user-visible message; the span, where known,
/// points at the source construct that failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Reference to a name with no visible binding
    #[error("Identifier '{name}' not found")]
    IdentifierNotFound {
        /// The unresolved name
        name: String,
        /// Source range
        span: Option<Span>,
    },

    /// Assignment to a capture or to a missing binding
    #[error("Variable '{name}' is immutable or doesn't exist")]
    ImmutableAssignment {
        /// The assignment target
        name: String,
        /// Source range
        span: Option<Span>,
    },

    /// Re-declaration of a name already visible in the block chain
    #[error("Variable '{name}' is already declared")]
    AlreadyDeclared {
        /// The duplicate name
        name: String,
        /// Source range
        span: Option<Span>,
    },

    /// Invocation of a value that is not a function
    #[error("Unable to invoke {type_name}")]
    NotInvocable {
        /// Type name of the target
        type_name: &'static str,
        /// Source range
        span: Option<Span>,
    },

    /// Call argument count mismatch
    #[error("Expected {expected} arguments, got {got}")]
    ArityMismatch {
        /// Declared parameter count
        expected: usize,
        /// Arguments supplied
        got: usize,
        /// Source range
        span: Option<Span>,
    },

    /// A call used for its value returned void
    #[error("Function didn't return a value")]
    VoidResult {
        /// Source range
        span: Option<Span>,
    },

    /// Array index outside `[0, length)`
    #[error("Index out of range")]
    IndexOutOfRange {
        /// The requested index
        index: i64,
        /// The array length
        len: usize,
        /// Source range
        span: Option<Span>,
    },

    /// Dict lookup with an absent key
    #[error("Key not found")]
    KeyNotFound {
        /// Source range
        span: Option<Span>,
    },

    /// Indexing into a value that is neither array nor dict
    #[error("Cannot use index operator on {type_name}")]
    CannotIndex {
        /// Type name of the target
        type_name: &'static str,
        /// Source range
        span: Option<Span>,
    },

    /// Duplicate key in a dict literal or dict merge
    #[error("Duplicate key")]
    DuplicateKey {
        /// Source range
        span: Option<Span>,
    },

    /// Integer division by zero
    #[error("Division by zero")]
    DivisionByZero {
        /// Source range
        span: Option<Span>,
    },

    /// Arithmetic outside the signed 64-bit range
    #[error("Integer overflow")]
    IntegerOverflow {
        /// Source range
        span: Option<Span>,
    },

    /// Binary operator applied to unsupported operand types
    #[error("Cannot apply '{op}' to {left_type} and {right_type}")]
    InvalidBinaryOperands {
        /// Operator spelling
        op: &'static str,
        /// Left operand type name
        left_type: &'static str,
        /// Right operand type name
        right_type: &'static str,
        /// Source range
        span: Option<Span>,
    },

    /// Unary operator applied to an unsupported operand type
    #[error("Cannot apply '{op}' to {operand_type}")]
    InvalidUnaryOperand {
        /// Operator spelling
        op: &'static str,
        /// Operand type name
        operand_type: &'static str,
        /// Source range
        span: Option<Span>,
    },

    /// `if` condition of a non-bool type
    #[error("Condition must be a bool, got {type_name}")]
    NonBoolCondition {
        /// Type name of the condition value
        type_name: &'static str,
        /// Source range
        span: Option<Span>,
    },

    /// `assert(false)`
    #[error("Assert failed")]
    AssertFailed {
        /// Source range
        span: Option<Span>,
    },

    /// Other type errors, message pre-formatted
    #[error("{message}")]
    TypeError {
        /// The full message
        message: String,
        /// Source range
        span: Option<Span>,
    },

    /// Call depth limit exceeded
    #[error("Stack overflow: maximum call depth ({max}) exceeded")]
    StackOverflow {
        /// The configured limit
        max: usize,
    },

    /// A non-invocation expression reached statement execution
    #[error("Only call expressions can be used as statements")]
    NonCallStatement {
        /// Source range
        span: Option<Span>,
    },

    /// Write failure on the interpreter's output handle
    #[error("I/O error: {message}")]
    Io {
        /// The underlying error, rendered
        message: String,
    },
}

impl EvalError {
    /// The source range of this error, if known.
    pub fn span(&self) -> Option<Span> {
        match self {
            EvalError::IdentifierNotFound { span, .. }
            | EvalError::ImmutableAssignment { span, .. }
            | EvalError::AlreadyDeclared { span, .. }
            | EvalError::NotInvocable { span, .. }
            | EvalError::ArityMismatch { span, .. }
            | EvalError::VoidResult { span }
            | EvalError::IndexOutOfRange { span, .. }
            | EvalError::KeyNotFound { span }
            | EvalError::CannotIndex { span, .. }
            | EvalError::DuplicateKey { span }
            | EvalError::DivisionByZero { span }
            | EvalError::IntegerOverflow { span }
            | EvalError::InvalidBinaryOperands { span, .. }
            | EvalError::InvalidUnaryOperand { span, .. }
            | EvalError::NonBoolCondition { span, .. }
            | EvalError::AssertFailed { span }
            | EvalError::TypeError { span, .. }
            | EvalError::NonCallStatement { span } => *span,
            EvalError::StackOverflow { .. } | EvalError::Io { .. } => None,
        }
    }
}
