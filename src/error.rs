//! Diagnostics shared by every pipeline stage, from lexing through execution.
//!
//! Each stage has its own fatal-fault type; [`GmslError`] unifies them at the
//! boundaries that need a single return type (the CLI driver, the VM command
//! loop).

use std::fmt;

/// A 1-indexed location in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Span { line, col }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("{span}: unrecognized input near \"{snippet}\"")]
    UnexpectedInput { span: Span, snippet: String },
    #[error("{span}: unterminated string literal")]
    UnterminatedString { span: Span },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{span}: unexpected token {found}, expected {expected}")]
    UnexpectedToken {
        span: Span,
        found: String,
        expected: String,
    },
    #[error("{span}: unexpected end of input, expected {expected}")]
    UnexpectedEof { span: Span, expected: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("{span}: reference to unbound identifier \"{name}\"")]
    UnboundIdentifier { span: Span, name: String },
    #[error("{span}: unknown type \"{name}\"")]
    UnknownType { span: Span, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("function \"{function}\" jumps to undefined label \"{label}\"")]
    UndefinedLabel { function: String, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("operand stack overflow")]
    StackOverflow,
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("register index {0} out of range")]
    RegisterOutOfRange(usize),
    #[error("constant pool index {0} out of range")]
    ConstantOutOfRange(usize),
    #[error("no context object named \"{0}\"")]
    MissingContext(String),
    #[error("{op} is not supported between {lhs} and {rhs}")]
    UnsupportedOperation {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("class \"{class}\" has no method \"{method}\"")]
    NoSuchMethod { class: String, method: String },
    #[error("CALL requires a method name and an object on top of the stack")]
    InvalidCallOperands,
}

/// The crate-wide error returned at the CLI and VM-command-loop boundaries.
///
/// Individual stages never need this themselves; they return their own
/// narrower error type and let `?` promote it here via `#[from]`.
#[derive(Debug, thiserror::Error)]
pub enum GmslError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("failed to read script \"{path}\": {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
