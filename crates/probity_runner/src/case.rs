//! Test cases and their lifecycle.

use std::fmt;

use probity_engine::Raw;
use probity_foundation::{Error, Evaluated, Result, Value};
#[cfg(feature = "serde")]
use serde::Serialize;

/// A deferred evaluation of one side of an assertion.
pub type Thunk = Box<dyn FnOnce() -> Evaluated + Send>;

/// Produces the expectation a case checks.
pub type Body = Box<dyn FnOnce() -> Expectation + Send>;

// =============================================================================
// Metadata
// =============================================================================

/// Where a test case was declared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Meta {
    /// Namespace (module path) the case belongs to.
    pub namespace: String,
    /// Source file.
    pub file: String,
    /// Source line.
    pub line: u32,
}

impl Meta {
    /// Creates metadata.
    #[must_use]
    pub fn new(namespace: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            namespace: namespace.into(),
            file: file.into(),
            line,
        }
    }
}

/// Name and metadata of the case being run.
///
/// Passed explicitly from the driver to the aggregator and sinks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CaseContext {
    /// Display name.
    pub name: String,
    /// Declaration site.
    pub meta: Meta,
}

impl CaseContext {
    /// Creates a context.
    #[must_use]
    pub fn new(name: impl Into<String>, meta: Meta) -> Self {
        Self {
            name: name.into(),
            meta,
        }
    }
}

impl fmt::Display for CaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} (line {})", self.meta.namespace, self.name, self.meta.line)
    }
}

// =============================================================================
// Expectation
// =============================================================================

/// An expected/actual pair of thunks together with their source text.
pub struct Expectation {
    raw: Raw,
    expected: Thunk,
    actual: Thunk,
}

impl Expectation {
    /// Creates an expectation from infallible thunks.
    pub fn new<E, A, EV, AV>(
        expected_source: impl Into<String>,
        actual_source: impl Into<String>,
        expected: E,
        actual: A,
    ) -> Self
    where
        E: FnOnce() -> EV + Send + 'static,
        A: FnOnce() -> AV + Send + 'static,
        EV: Into<Value>,
        AV: Into<Value>,
    {
        Self::try_new(
            expected_source,
            actual_source,
            move || Ok(expected().into()),
            move || Ok(actual().into()),
        )
    }

    /// Creates an expectation from thunks that may return a fault.
    pub fn try_new<E, A>(
        expected_source: impl Into<String>,
        actual_source: impl Into<String>,
        expected: E,
        actual: A,
    ) -> Self
    where
        E: FnOnce() -> Evaluated + Send + 'static,
        A: FnOnce() -> Evaluated + Send + 'static,
    {
        Self {
            raw: Raw::new(expected_source, actual_source),
            expected: Box::new(expected),
            actual: Box::new(actual),
        }
    }

    /// Source text of both sides.
    #[must_use]
    pub fn raw(&self) -> &Raw {
        &self.raw
    }

    /// Splits into source text and the two thunks.
    #[must_use]
    pub fn into_parts(self) -> (Raw, Thunk, Thunk) {
        (self.raw, self.expected, self.actual)
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation").field("raw", &self.raw).finish_non_exhaustive()
    }
}

// =============================================================================
// TestCase
// =============================================================================

/// A named unit of work checking exactly one expectation.
pub struct TestCase {
    context: CaseContext,
    body: Body,
}

impl TestCase {
    /// Creates a case that checks a ready-made expectation.
    #[must_use]
    pub fn new(name: impl Into<String>, meta: Meta, expectation: Expectation) -> Self {
        Self::with_body(name, meta, move || expectation)
    }

    /// Creates a case whose body builds the expectation when run.
    ///
    /// A fault raised by the body itself is recorded as an error for the case.
    pub fn with_body<F>(name: impl Into<String>, meta: Meta, body: F) -> Self
    where
        F: FnOnce() -> Expectation + Send + 'static,
    {
        Self {
            context: CaseContext::new(name, meta),
            body: Box::new(body),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.context.name
    }

    /// Name and metadata.
    #[must_use]
    pub fn context(&self) -> &CaseContext {
        &self.context
    }

    /// Splits into context and body.
    #[must_use]
    pub fn into_parts(self) -> (CaseContext, Body) {
        (self.context, self.body)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("context", &self.context).finish_non_exhaustive()
    }
}

// =============================================================================
// Phase
// =============================================================================

/// Lifecycle of a test case within one run.
///
/// Phases only move forward, one step at a time. There is no way back, so a
/// case can neither be re-entered nor retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Selected but not yet begun.
    Pending,
    /// Announced to the sink.
    Started,
    /// Evaluating expected and actual.
    Running,
    /// Exactly one result recorded.
    Compared,
    /// Announced as finished.
    Finished,
}

impl Phase {
    /// The only phase this one may move to.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Started),
            Self::Started => Some(Self::Running),
            Self::Running => Some(Self::Compared),
            Self::Compared => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless `next` is the successor.
    pub fn advance(self, next: Self) -> Result<Self> {
        match self.successor() {
            Some(successor) if successor == next => Ok(next),
            _ => Err(Error::invalid_transition(self.name(), next.name())),
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Started => "started",
            Self::Running => "running",
            Self::Compared => "compared",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
