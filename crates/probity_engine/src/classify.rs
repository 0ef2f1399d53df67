//! Strategy selection.
//!
//! Inspects an evaluated expected/actual pair and picks the comparison
//! strategy. Guards are checked in a fixed order and the first match wins:
//!
//! 1. expected names a fault type        -> [`Strategy::ExpectFault`]
//! 2. expected faulted                   -> [`Strategy::ExpectedFault`]
//! 3. actual faulted                     -> [`Strategy::ActualFault`]
//! 4. expected is callable               -> [`Strategy::Predicate`]
//! 5. expected is `true`                 -> [`Strategy::Truthy`]
//! 6. actual is a membership wrapper     -> [`Strategy::Membership`]
//! 7. structural pair of kinds, else     -> [`Strategy::Equality`]

use std::fmt;

use probity_foundation::{Evaluated, Value};

/// Comparison strategy tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Expected is a fault type; actual must have raised an instance of it.
    ExpectFault,
    /// Evaluating expected raised a fault.
    ExpectedFault,
    /// Evaluating actual raised a fault.
    ActualFault,
    /// Expected is a unary predicate applied to actual.
    Predicate,
    /// Expected is `true`; actual alone must be truthy.
    Truthy,
    /// Actual is a membership wrapper.
    Membership,
    /// Both sides are maps.
    MapDiff,
    /// Both sides are sets.
    SetDiff,
    /// Both sides are ordered sequences.
    SequenceDiff,
    /// Expected is a text pattern.
    PatternMatch,
    /// Expected is a (non-fault) type descriptor.
    InstanceCheck,
    /// Deep value equality.
    Equality,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExpectFault => "expect-fault",
            Self::ExpectedFault => "expected-fault",
            Self::ActualFault => "actual-fault",
            Self::Predicate => "predicate",
            Self::Truthy => "truthy",
            Self::Membership => "membership",
            Self::MapDiff => "map-diff",
            Self::SetDiff => "set-diff",
            Self::SequenceDiff => "sequence-diff",
            Self::PatternMatch => "pattern-match",
            Self::InstanceCheck => "instance-check",
            Self::Equality => "equality",
        };
        f.write_str(name)
    }
}

/// Selects the comparison strategy for an evaluated pair.
#[must_use]
pub fn classify(expected: &Evaluated, actual: &Evaluated) -> Strategy {
    if let Ok(Value::Type(ty)) = expected {
        if ty.as_fault().is_some() {
            return Strategy::ExpectFault;
        }
    }

    let expected = match expected {
        Ok(value) => value,
        Err(_) => return Strategy::ExpectedFault,
    };
    let actual = match actual {
        Ok(value) => value,
        Err(_) => return Strategy::ActualFault,
    };

    match expected {
        Value::Fn(_) => return Strategy::Predicate,
        Value::Bool(true) => return Strategy::Truthy,
        _ => {}
    }

    if matches!(actual, Value::Membership(_)) {
        return Strategy::Membership;
    }

    match (expected, actual) {
        (Value::Map(_), Value::Map(_)) => Strategy::MapDiff,
        (Value::Set(_), Value::Set(_)) => Strategy::SetDiff,
        (Value::Vec(_), Value::Vec(_)) => Strategy::SequenceDiff,
        (Value::Pattern(_), _) => Strategy::PatternMatch,
        (Value::Type(_), _) => Strategy::InstanceCheck,
        _ => Strategy::Equality,
    }
}
