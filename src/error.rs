//! Unified error handling module
//!
//! Error types shared by the grammar engine, the C declaration grammars and
//! the command line front end, plus the bridge to codespan-reporting.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use serde::Serialize;
use thiserror::Error;

/// Byte range inside the parsed input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// Human readable position of a byte index.
///
/// `offset` counts characters from the start of the input (0 based), while
/// `line` and `column` are 1 based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn locate(input: &str, byte_pos: usize) -> Self {
        let byte_pos = byte_pos.min(input.len());
        let mut offset = 0;
        let mut line = 1;
        let mut column = 1;

        for (idx, ch) in input.char_indices() {
            if idx >= byte_pos {
                break;
            }
            offset += 1;
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        Self {
            offset,
            line,
            column,
        }
    }
}

/// Input did not match the grammar
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Expected {expected} (at char {offset}), (line:{line}, col:{column})")]
pub struct ParseError {
    pub expected: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl ParseError {
    pub fn new(expected: impl Into<String>, input: &str, byte_pos: usize) -> Self {
        let Location {
            offset,
            line,
            column,
        } = Location::locate(input, byte_pos);
        Self {
            expected: expected.into(),
            offset,
            line,
            column,
            span: Span::point(byte_pos),
        }
    }

    pub fn location(&self) -> Location {
        Location {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }
}

/// A parse action refused the tokens it was given
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (at char {offset}), (line:{line}, col:{column})")]
pub struct ActionError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl ActionError {
    pub fn new(message: impl Into<String>, input: &str, span: Span) -> Self {
        let Location {
            offset,
            line,
            column,
        } = Location::locate(input, span.start);
        Self {
            message: message.into(),
            offset,
            line,
            column,
            span,
        }
    }
}

/// Crate wide error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CdeclError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Action(#[from] ActionError),

    /// Results were destructured into the wrong number of values
    #[error("expected {expected} tokens, found {found}")]
    Arity { expected: usize, found: usize },

    /// A named result was requested that the grammar never produced
    #[error("no result named '{name}'")]
    Missing { name: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

impl CdeclError {
    /// Source span of the failure, if the error came out of the input text
    pub fn span(&self) -> Option<Span> {
        match self {
            CdeclError::Parse(e) => Some(e.span),
            CdeclError::Action(e) => Some(e.span),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CdeclError {
    fn from(e: std::io::Error) -> Self {
        CdeclError::Io(e.to_string())
    }
}

/// Result alias
pub type CdeclResult<T> = Result<T, CdeclError>;

/// An error tied to a file registered with codespan-reporting
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: CdeclError,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: CdeclError, file_id: usize) -> Self {
        Self { error, file_id }
    }

    /// Convert into a codespan-reporting diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let (message, labels) = match &self.error {
            CdeclError::Parse(e) => (
                format!("parse error: expected {}", e.expected),
                vec![Label::primary(self.file_id, e.span.start..e.span.end)
                    .with_message(format!("line {}, column {}", e.line, e.column))],
            ),
            CdeclError::Action(e) => (
                format!("parse action failed: {}", e.message),
                vec![Label::primary(self.file_id, e.span.start..e.span.end)],
            ),
            other => (other.to_string(), vec![]),
        };

        Diagnostic::error()
            .with_message(message)
            .with_labels(labels)
    }
}

/// Collects errors from several statements of one file
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: CdeclError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&DiagnosticError> {
        self.errors.first()
    }
}
