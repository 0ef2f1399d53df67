//! Comparison results.
//!
//! Every strategy produces exactly one [`Outcome`]. Failures and errors are
//! plain data carrying enough text to explain the mismatch without access to
//! the original values.

use std::fmt;

use probity_foundation::{Fault, Frame};
#[cfg(feature = "serde")]
use serde::Serialize;

/// Source text of the two sides of an assertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Raw {
    /// Source of the expected expression.
    pub expected: String,
    /// Source of the actual expression.
    pub actual: String,
}

impl Raw {
    /// Creates a raw record from the two source texts.
    #[must_use]
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// A one-line statement of why a comparison did not pass,
/// e.g. `2 does not equal 3`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Statement {
    /// Left operand rendering.
    pub left: String,
    /// Relation that failed to hold.
    pub relation: String,
    /// Right operand rendering.
    pub right: String,
}

impl Statement {
    /// Creates a statement.
    #[must_use]
    pub fn new(
        left: impl Into<String>,
        relation: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            left: left.into(),
            relation: relation.into(),
            right: right.into(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.relation, self.right)
    }
}

/// An assertion whose values legitimately differ.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Failure {
    /// Source text of the assertion.
    pub raw: Raw,
    /// Summary statement.
    pub result: Statement,
    /// General diagnostics (value disagreements, ordering classification).
    pub messages: Vec<String>,
    /// Diagnostics about things present in expected but not in actual.
    pub expected_messages: Vec<String>,
    /// Diagnostics about things present in actual but not in expected.
    pub actual_messages: Vec<String>,
}

impl Failure {
    /// Creates a failure with no diagnostics.
    #[must_use]
    pub fn new(raw: &Raw, result: Statement) -> Self {
        Self {
            raw: raw.clone(),
            result,
            messages: Vec::new(),
            expected_messages: Vec::new(),
            actual_messages: Vec::new(),
        }
    }

    /// Appends a general diagnostic.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Appends general diagnostics.
    #[must_use]
    pub fn with_messages(mut self, messages: impl IntoIterator<Item = String>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Appends expected-side diagnostics.
    #[must_use]
    pub fn with_expected_messages(mut self, messages: impl IntoIterator<Item = String>) -> Self {
        self.expected_messages.extend(messages);
        self
    }

    /// Appends actual-side diagnostics.
    #[must_use]
    pub fn with_actual_messages(mut self, messages: impl IntoIterator<Item = String>) -> Self {
        self.actual_messages.extend(messages);
        self
    }

    /// General diagnostics joined by newlines, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        join(&self.messages)
    }

    /// Expected-side diagnostics joined by newlines, if any.
    #[must_use]
    pub fn expected_message(&self) -> Option<String> {
        join(&self.expected_messages)
    }

    /// Actual-side diagnostics joined by newlines, if any.
    #[must_use]
    pub fn actual_message(&self) -> Option<String> {
        join(&self.actual_messages)
    }
}

fn join(lines: &[String]) -> Option<String> {
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Which side of the assertion raised a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Side {
    /// The expected expression.
    Expected,
    /// The actual expression (or a predicate applied to it).
    Actual,
}

/// An assertion that could not be compared because evaluation faulted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ErrorReport {
    /// Source text of the assertion.
    pub raw: Raw,
    /// Summary statement.
    pub result: Statement,
    /// Side that faulted.
    pub side: Side,
    /// Name of the fault type.
    pub fault_type: String,
    /// Description of the expected-side fault.
    pub expected_message: Option<String>,
    /// Description of the actual-side fault.
    pub actual_message: Option<String>,
    /// Stack frames of the fault, innermost first.
    pub stack_trace: Vec<Frame>,
}

impl ErrorReport {
    /// Builds a report for a fault raised on `side`.
    #[must_use]
    pub fn from_fault(raw: &Raw, side: Side, fault: &Fault) -> Self {
        let (source, label) = match side {
            Side::Expected => (&raw.expected, "expected"),
            Side::Actual => (&raw.actual, "actual"),
        };
        let description = format!("exception in {label}: {fault}");
        let (expected_message, actual_message) = match side {
            Side::Expected => (Some(description), None),
            Side::Actual => (None, Some(description)),
        };
        Self {
            raw: raw.clone(),
            result: Statement::new(source.clone(), "threw", fault.fault_type.name()),
            side,
            fault_type: fault.fault_type.path(),
            expected_message,
            actual_message,
            stack_trace: fault.frames.clone(),
        }
    }
}

/// The result of one comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Outcome {
    /// The values are equivalent.
    Pass,
    /// The values differ.
    Fail(Failure),
    /// Evaluation faulted.
    Error(ErrorReport),
}

impl Outcome {
    /// Returns true for [`Outcome::Pass`].
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns the failure record, if this is a failure.
    #[must_use]
    pub const fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Fail(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the error record, if this is an error.
    #[must_use]
    pub const fn as_error(&self) -> Option<&ErrorReport> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}
