//! Error types for the Probity library API.
//!
//! These describe misuse of the library (a malformed pattern, a callable
//! invoked with the wrong number of arguments, a test case driven through an
//! illegal state). Assertion failures are never errors; they are outcomes.

use std::fmt;

use thiserror::Error;

/// The main error type for Probity operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(expected: String, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch { expected, actual })
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        })
    }

    /// Creates an invalid state transition error.
    #[must_use]
    pub fn invalid_transition(from: &'static str, to: &'static str) -> Self {
        Self::new(ErrorKind::InvalidTransition { from, to })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Wrong number of arguments to a callable.
    #[error("arity mismatch: expected {expected}, got {actual}")]
    ArityMismatch {
        /// Description of expected arity.
        expected: String,
        /// Actual number of arguments.
        actual: usize,
    },

    /// A text pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },

    /// A test case was moved through an illegal lifecycle transition.
    #[error("invalid test case transition: {from} -> {to}")]
    InvalidTransition {
        /// Phase the case was in.
        from: &'static str,
        /// Phase that was requested.
        to: &'static str,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or test case name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Call stack at the point of failure.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_mismatch_message() {
        let err = Error::arity_mismatch("1".to_string(), 3);
        assert!(matches!(err.kind, ErrorKind::ArityMismatch { actual: 3, .. }));
        assert_eq!(err.to_string(), "arity mismatch: expected 1, got 3");
    }

    #[test]
    fn invalid_pattern_message() {
        let err = Error::invalid_pattern("a(", "unclosed group");
        let msg = format!("{err}");
        assert!(msg.contains("\"a(\""));
        assert!(msg.contains("unclosed group"));
    }

    #[test]
    fn invalid_transition_message() {
        let err = Error::invalid_transition("finished", "started");
        assert_eq!(
            err.to_string(),
            "invalid test case transition: finished -> started"
        );
    }

    #[test]
    fn context_display() {
        let ctx = ErrorContext::new()
            .with_source("suite.rs")
            .with_position(10, 5)
            .with_frame("expect-42");
        let text = ctx.to_string();
        assert!(text.starts_with("at suite.rs:10:5"));
        assert!(text.contains("  in expect-42"));
    }
}
