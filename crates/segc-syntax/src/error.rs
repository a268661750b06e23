//! Error handling types shared by every SEGC component.
//!
//! Scanning, parsing and evaluation all report failures through the same
//! [`Error`] value. Nothing in the core terminates the process: a host decides
//! what to do with an error, and the `segc` binary renders it and exits with a
//! non-zero status.
//!
//! # Error kinds
//!
//! Each [`ErrorKind`] belongs to one [`Phase`]:
//!
//! - **Scan**: unknown characters, integer literals that overflow.
//! - **Syntax**: missing or unbalanced braces and parentheses, bad function
//!   parameters, `elsif`/`else` that do not continue an `if`, stray tokens,
//!   nesting past the parser's limit.
//! - **Runtime**: unknown variables or functions, wrong argument counts, nil
//!   operands or assignments, division by zero, calls nested past the
//!   interpreter's depth limit.
//!
//! Syntax errors usually carry a [`Hint`] showing a minimal wrong and right way
//! to write the construct.
//!
//! # Examples
//!
//! ```rust
//! use segc_syntax::error::{error, Error, ErrorKind, Result};
//!
//! fn lookup(name: &str) -> Result<i64> {
//!     error(ErrorKind::UndefinedVariable, format!("variable '{}' does not exist", name))
//! }
//!
//! let err = lookup("score").unwrap_err();
//! assert_eq!(err.kind, ErrorKind::UndefinedVariable);
//! assert_eq!(err.to_string(), "variable 'score' does not exist");
//!
//! let located = Error::with_span(ErrorKind::UnknownCharacter, "unknown character '$'", 3, 7);
//! assert_eq!(located.to_string(), "unknown character '$' at 3:7");
//! ```

use std::fmt;

/// The pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scan,
    Syntax,
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Scan => write!(f, "Scan error"),
            Phase::Syntax => write!(f, "Syntax error"),
            Phase::Runtime => write!(f, "Runtime error"),
        }
    }
}

/// Every distinguishable failure in the toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A character that starts no token.
    UnknownCharacter,
    /// A digit run that does not fit in a 64-bit integer.
    InvalidNumber,

    /// A block body that does not start with `{`.
    MissingOpenBrace,
    /// A block that is never closed with `}`.
    UnclosedBlock,
    /// A function declaration without `(` after its name.
    MissingOpenParen,
    /// A parameter or argument list that is never closed with `)`.
    UnclosedParen,
    /// A function parameter that is not a plain identifier.
    InvalidParameter,
    /// An `elsif` or `else` that does not directly follow an `if`/`elsif` body.
    DanglingBranch,
    /// A token that cannot start the construct expected at its position.
    UnexpectedToken,
    /// Expressions or blocks nested deeper than the parser accepts.
    NestingLimit,

    /// A variable read that no scope in the chain can resolve.
    UndefinedVariable,
    /// A call to a name that is not in the function registry.
    UndefinedFunction,
    /// A call whose argument count differs from the parameter count.
    ArityMismatch,
    /// An operator, condition, argument or `ret` that received no value.
    NilOperand,
    /// An assignment whose right-hand side produced no value.
    NilAssignment,
    /// Integer division by zero.
    DivisionByZero,
    /// Too many function calls active at once.
    RecursionLimit,
}

impl ErrorKind {
    pub fn phase(self) -> Phase {
        match self {
            ErrorKind::UnknownCharacter | ErrorKind::InvalidNumber => Phase::Scan,
            ErrorKind::MissingOpenBrace
            | ErrorKind::UnclosedBlock
            | ErrorKind::MissingOpenParen
            | ErrorKind::UnclosedParen
            | ErrorKind::InvalidParameter
            | ErrorKind::DanglingBranch
            | ErrorKind::UnexpectedToken
            | ErrorKind::NestingLimit => Phase::Syntax,
            ErrorKind::UndefinedVariable
            | ErrorKind::UndefinedFunction
            | ErrorKind::ArityMismatch
            | ErrorKind::NilOperand
            | ErrorKind::NilAssignment
            | ErrorKind::DivisionByZero
            | ErrorKind::RecursionLimit => Phase::Runtime,
        }
    }
}

/// A worked example attached to a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    /// Source text showing the mistake
    pub wrong: String,
    /// The same construct written correctly
    pub right: String,
}

/// An error that occurred while scanning, parsing or running a script.
///
/// Scan and syntax errors carry the 1-based position of the offending token.
/// Runtime errors have no position because the AST does not keep spans.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}{}", span_suffix(.line, .col))]
pub struct Error {
    /// What went wrong, in machine-checkable form
    pub kind: ErrorKind,

    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,

    /// Optional wrong/right example
    pub hint: Option<Box<Hint>>,
}

fn span_suffix(line: &Option<usize>, col: &Option<usize>) -> String {
    match (line, col) {
        (Some(l), Some(c)) => format!(" at {}:{}", l, c),
        _ => String::new(),
    }
}

impl Error {
    /// Creates an error without source location.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: None,
            col: None,
            hint: None,
        }
    }

    /// Creates an error pointing at a 1-based line and column.
    pub fn with_span(kind: ErrorKind, msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
            hint: None,
        }
    }

    /// Attaches a wrong/right example.
    ///
    /// ```rust
    /// use segc_syntax::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::MissingOpenBrace, "expected '{'")
    ///     .with_hint("if x == y\n    ret 1\n}", "if x == y {\n    ret 1\n}");
    /// assert!(err.hint.is_some());
    /// ```
    pub fn with_hint(mut self, wrong: impl Into<String>, right: impl Into<String>) -> Self {
        self.hint = Some(Box::new(Hint {
            wrong: wrong.into(),
            right: right.into(),
        }));
        self
    }

    pub fn phase(&self) -> Phase {
        self.kind.phase()
    }
}

/// A specialized `Result` type for SEGC operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind, msg))`.
pub fn error<T>(kind: ErrorKind, msg: impl Into<String>) -> Result<T> {
    Err(Error::new(kind, msg))
}

/// Shorthand for `Err(Error::with_span(kind, msg, line, col))`.
pub fn error_at<T>(kind: ErrorKind, line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(kind, msg, line, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_span_only_when_present() {
        let plain = Error::new(ErrorKind::UndefinedFunction, "function 'tick' is not defined");
        assert_eq!(plain.to_string(), "function 'tick' is not defined");

        let located = Error::with_span(ErrorKind::UnclosedBlock, "block is never closed", 4, 12);
        assert_eq!(located.to_string(), "block is never closed at 4:12");
    }

    #[test]
    fn kinds_map_to_phases() {
        assert_eq!(ErrorKind::InvalidNumber.phase(), Phase::Scan);
        assert_eq!(ErrorKind::DanglingBranch.phase(), Phase::Syntax);
        assert_eq!(ErrorKind::NilAssignment.phase(), Phase::Runtime);
        assert_eq!(ErrorKind::NestingLimit.phase(), Phase::Syntax);
        assert_eq!(ErrorKind::RecursionLimit.phase(), Phase::Runtime);
        assert_eq!(Phase::Runtime.to_string(), "Runtime error");
    }
}
