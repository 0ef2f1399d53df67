//! Captured faults and the fault-type hierarchy.
//!
//! A [`Fault`] is what evaluating one side of an assertion produces instead
//! of a [`Value`] when that evaluation fails. Faults are data: the classifier
//! matches on [`Evaluated`] rather than letting the failure unwind through the
//! comparison.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Serialize;
use thiserror::Error;

use crate::error::Error;
use crate::value::Value;

/// The outcome of evaluating one side of an assertion.
pub type Evaluated = std::result::Result<Value, Fault>;

// =============================================================================
// Fault Types
// =============================================================================

/// A named fault type with an optional parent.
///
/// Fault types form a tree rooted at [`FaultType::root`]. A fault is an
/// instance of a type when its own type is that type or any descendant.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FaultType(Arc<FaultTypeNode>);

#[derive(PartialEq, Eq, Hash)]
struct FaultTypeNode {
    name: Arc<str>,
    parent: Option<FaultType>,
}

impl FaultType {
    /// The root of the hierarchy; every fault is an instance of it.
    #[must_use]
    pub fn root() -> Self {
        Self(Arc::new(FaultTypeNode {
            name: "fault".into(),
            parent: None,
        }))
    }

    /// Creates a fault type directly beneath the root.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::root().child(name)
    }

    /// Creates a fault type beneath this one.
    #[must_use]
    pub fn child(&self, name: impl Into<Arc<str>>) -> Self {
        Self(Arc::new(FaultTypeNode {
            name: name.into(),
            parent: Some(self.clone()),
        }))
    }

    /// Fault type for panics caught while evaluating a thunk.
    #[must_use]
    pub fn panic() -> Self {
        Self::new("panic")
    }

    /// Fault type for library errors surfacing during evaluation.
    #[must_use]
    pub fn error() -> Self {
        Self::new("error")
    }

    /// Returns the name of this fault type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the parent type, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<&FaultType> {
        self.0.parent.as_ref()
    }

    /// Returns true if this type is `ancestor` or descends from it.
    #[must_use]
    pub fn is_a(&self, ancestor: &FaultType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == ancestor {
                return true;
            }
            current = ty.parent();
        }
        false
    }

    /// Returns the slash-separated path from the root, e.g. `fault/io/timeout`.
    #[must_use]
    pub fn path(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{}/{}", parent.path(), self.name()),
            None => self.name().to_string(),
        }
    }
}

impl fmt::Debug for FaultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FaultType({})", self.path())
    }
}

impl fmt::Display for FaultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Stack Frames
// =============================================================================

/// One frame of a fault's stack trace.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Frame {
    /// Module path the frame originates from (may be empty when unknown).
    pub module: String,
    /// Function name within the module.
    pub function: String,
    /// Source file, if known.
    pub file: Option<String>,
    /// Source line, if known.
    pub line: Option<u32>,
}

impl Frame {
    /// Creates a frame for a function in a module.
    #[must_use]
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
            file: None,
            line: None,
        }
    }

    /// Creates a frame that only knows its source location.
    #[must_use]
    pub fn at(file: impl Into<String>, line: u32) -> Self {
        Self {
            module: String::new(),
            function: String::new(),
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.module.is_empty(), self.function.is_empty()) {
            (false, false) => write!(f, "{}::{}", self.module, self.function)?,
            (true, false) => f.write_str(&self.function)?,
            (false, true) => f.write_str(&self.module)?,
            (true, true) => f.write_str("<unknown>")?,
        }
        if let Some(file) = &self.file {
            write!(f, " ({file}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

// =============================================================================
// Fault
// =============================================================================

/// A fault captured while evaluating an expected or actual expression.
#[derive(Clone, Debug, Error)]
#[error("{fault_type}: {message}")]
pub struct Fault {
    /// The type of the fault.
    pub fault_type: FaultType,
    /// Human-readable description.
    pub message: String,
    /// Stack frames, innermost first.
    pub frames: Vec<Frame>,
}

impl Fault {
    /// Creates a fault with no stack frames.
    #[must_use]
    pub fn new(fault_type: FaultType, message: impl Into<String>) -> Self {
        Self {
            fault_type,
            message: message.into(),
            frames: Vec::new(),
        }
    }

    /// Appends a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Returns true if this fault is an instance of `fault_type`.
    #[must_use]
    pub fn is_instance_of(&self, fault_type: &FaultType) -> bool {
        self.fault_type.is_a(fault_type)
    }
}

impl From<Error> for Fault {
    fn from(err: Error) -> Self {
        let mut fault = Fault::new(FaultType::error(), err.kind.to_string());
        if let Some(context) = err.context {
            if let Some(file) = context.source {
                let line = context.line.and_then(|l| u32::try_from(l).ok());
                fault.frames.push(Frame {
                    module: String::new(),
                    function: String::new(),
                    file: Some(file),
                    line,
                });
            }
            fault.frames.extend(
                context
                    .stack
                    .into_iter()
                    .map(|function| Frame::new(String::new(), function)),
            );
        }
        fault
    }
}
