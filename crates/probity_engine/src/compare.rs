//! Comparison strategies.
//!
//! [`compare_with`] classifies an evaluated pair and runs the selected
//! strategy. Strategies are pure: they never touch counters or sinks, they
//! only return an [`Outcome`].

use probity_foundation::{
    Evaluated, FaultType, LtMap, LtSet, LtVec, NativeFn, Pattern, Type, Value,
};
use tracing::trace;

use crate::classify::{Strategy, classify};
use crate::diff::{MapDiff, SequenceDiff, SetDiff, nan_eq, normalize_map, normalize_nan};
use crate::outcome::{ErrorReport, Failure, Outcome, Raw, Side, Statement};

/// Diagnostic for a membership target that is not a sequence, set, or map.
pub const MEMBERSHIP_TARGET_USAGE: &str =
    "membership can only be checked against a sequence, set, or map";

/// Diagnostic for a map membership target with a non-map expected value.
pub const MAP_MEMBERSHIP_USAGE: &str =
    "membership in a map must be checked with a map of expected entries";

// =============================================================================
// Invoker
// =============================================================================

/// Applies a predicate to the actual value.
///
/// Predicates are user code. The runner supplies an invoker that turns a
/// panic inside the predicate into a fault; [`DirectInvoker`] just calls it.
pub trait Invoker {
    /// Calls `predicate` with `argument`.
    fn invoke(&self, predicate: &NativeFn, argument: &Value) -> Evaluated;
}

/// Calls predicates directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectInvoker;

impl Invoker for DirectInvoker {
    fn invoke(&self, predicate: &NativeFn, argument: &Value) -> Evaluated {
        predicate.call(std::slice::from_ref(argument))
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Compares an evaluated pair, calling predicates directly.
#[must_use]
pub fn compare(raw: &Raw, expected: &Evaluated, actual: &Evaluated) -> Outcome {
    compare_with(raw, expected, actual, &DirectInvoker)
}

/// Compares an evaluated pair using `invoker` for predicates.
#[must_use]
pub fn compare_with(
    raw: &Raw,
    expected: &Evaluated,
    actual: &Evaluated,
    invoker: &dyn Invoker,
) -> Outcome {
    let strategy = classify(expected, actual);
    trace!(%strategy, expected = %raw.expected, actual = %raw.actual, "selected strategy");

    match (expected, actual) {
        (Ok(Value::Type(Type::Fault(fault_type))), _) => expect_fault(raw, fault_type, actual),
        (Err(fault), _) => Outcome::Error(ErrorReport::from_fault(raw, Side::Expected, fault)),
        (Ok(_), Err(fault)) => Outcome::Error(ErrorReport::from_fault(raw, Side::Actual, fault)),
        (Ok(e), Ok(a)) => compare_values(raw, strategy, e, a, invoker),
    }
}

fn compare_values(
    raw: &Raw,
    strategy: Strategy,
    expected: &Value,
    actual: &Value,
    invoker: &dyn Invoker,
) -> Outcome {
    match (strategy, expected, actual) {
        (Strategy::Predicate, Value::Fn(predicate), _) => {
            satisfies(raw, predicate, actual, invoker)
        }
        (Strategy::Truthy, _, _) => truthy(raw, actual),
        (Strategy::Membership, _, Value::Membership(target)) => {
            membership(raw, expected, target)
        }
        (Strategy::MapDiff, Value::Map(e), Value::Map(a)) => {
            map_diff(raw, expected, actual, e, a)
        }
        (Strategy::SetDiff, Value::Set(e), Value::Set(a)) => {
            set_diff(raw, expected, actual, e, a)
        }
        (Strategy::SequenceDiff, Value::Vec(e), Value::Vec(a)) => {
            sequence_diff(raw, expected, actual, e, a)
        }
        (Strategy::PatternMatch, Value::Pattern(pattern), _) => {
            pattern_match(raw, pattern, actual)
        }
        (Strategy::InstanceCheck, Value::Type(ty), _) => instance_check(raw, ty, actual),
        _ => equality(raw, expected, actual),
    }
}

// =============================================================================
// Strategies
// =============================================================================

fn equality(raw: &Raw, expected: &Value, actual: &Value) -> Outcome {
    if nan_eq(expected, actual) {
        return Outcome::Pass;
    }
    Outcome::Fail(Failure::new(
        raw,
        Statement::new(expected.to_string(), "does not equal", actual.to_string()),
    ))
}

fn satisfies(raw: &Raw, predicate: &NativeFn, actual: &Value, invoker: &dyn Invoker) -> Outcome {
    match invoker.invoke(predicate, actual) {
        Ok(verdict) if verdict.is_truthy() => Outcome::Pass,
        Ok(_) => Outcome::Fail(Failure::new(
            raw,
            Statement::new(actual.to_string(), "is not", raw.expected.clone()),
        )),
        Err(fault) => Outcome::Error(ErrorReport::from_fault(raw, Side::Actual, &fault)),
    }
}

fn truthy(raw: &Raw, actual: &Value) -> Outcome {
    if actual.is_truthy() {
        return Outcome::Pass;
    }
    Outcome::Fail(Failure::new(
        raw,
        Statement::new(actual.to_string(), "is not", "truthy"),
    ))
}

fn instance_check(raw: &Raw, ty: &Type, actual: &Value) -> Outcome {
    let actual_type = actual.value_type();
    if ty.accepts(&actual_type) {
        return Outcome::Pass;
    }
    Outcome::Fail(
        Failure::new(
            raw,
            Statement::new(actual.to_string(), "is not an instance of", ty.to_string()),
        )
        .with_actual_messages([format!("actual is {actual_type}")]),
    )
}

fn pattern_match(raw: &Raw, pattern: &Pattern, actual: &Value) -> Outcome {
    match actual.as_str() {
        Some(text) if pattern.is_found_in(text) => Outcome::Pass,
        Some(text) => Outcome::Fail(Failure::new(
            raw,
            Statement::new(text, "does not match", pattern.to_string()),
        )),
        None => Outcome::Fail(
            Failure::new(
                raw,
                Statement::new(actual.to_string(), "does not match", pattern.to_string()),
            )
            .with_message(format!(
                "patterns match strings, but actual is {}",
                actual.value_type()
            )),
        ),
    }
}

fn expect_fault(raw: &Raw, fault_type: &FaultType, actual: &Evaluated) -> Outcome {
    match actual {
        Err(fault) if fault.is_instance_of(fault_type) => Outcome::Pass,
        Err(fault) => Outcome::Error(ErrorReport::from_fault(raw, Side::Actual, fault)),
        Ok(value) => Outcome::Fail(
            Failure::new(
                raw,
                Statement::new(raw.actual.clone(), "did not throw", fault_type.name()),
            )
            .with_actual_messages([format!("evaluated to {value}")]),
        ),
    }
}

fn membership(raw: &Raw, expected: &Value, target: &Value) -> Outcome {
    let not_in = || {
        Failure::new(
            raw,
            Statement::new(expected.to_string(), "is not in", target.to_string()),
        )
    };

    match target {
        Value::Vec(items) => {
            if items.iter().any(|item| nan_eq(item, expected)) {
                Outcome::Pass
            } else {
                Outcome::Fail(not_in().with_message(format!("{expected} not found in {target}")))
            }
        }
        Value::Set(items) => {
            let needle = normalize_nan(expected);
            if items.iter().any(|item| normalize_nan(item) == needle) {
                Outcome::Pass
            } else {
                Outcome::Fail(not_in().with_message(format!("{expected} not found in {target}")))
            }
        }
        Value::Map(entries) => match expected {
            Value::Map(wanted) => {
                let subset = normalize_map(entries).select_keys(normalize_map(wanted).keys());
                if MapDiff::compute(wanted, &subset).is_equal() {
                    return Outcome::Pass;
                }
                // Report against the whole container, not the selected subset.
                let diff = MapDiff::compute(wanted, entries);
                Outcome::Fail(
                    not_in()
                        .with_messages(diff.messages())
                        .with_expected_messages(diff.expected_messages())
                        .with_actual_messages(diff.actual_messages()),
                )
            }
            _ => Outcome::Fail(not_in().with_message(MAP_MEMBERSHIP_USAGE)),
        },
        _ => Outcome::Fail(not_in().with_message(MEMBERSHIP_TARGET_USAGE)),
    }
}

fn map_diff(
    raw: &Raw,
    expected: &Value,
    actual: &Value,
    e: &LtMap<Value, Value>,
    a: &LtMap<Value, Value>,
) -> Outcome {
    let diff = MapDiff::compute(e, a);
    if diff.is_equal() {
        return Outcome::Pass;
    }
    Outcome::Fail(
        Failure::new(
            raw,
            Statement::new(expected.to_string(), "does not equal", actual.to_string()),
        )
        .with_messages(diff.messages())
        .with_expected_messages(diff.expected_messages())
        .with_actual_messages(diff.actual_messages()),
    )
}

fn set_diff(
    raw: &Raw,
    expected: &Value,
    actual: &Value,
    e: &LtSet<Value>,
    a: &LtSet<Value>,
) -> Outcome {
    let diff = SetDiff::compute(e, a);
    if diff.is_empty() {
        return Outcome::Pass;
    }
    Outcome::Fail(
        Failure::new(
            raw,
            Statement::new(expected.to_string(), "does not equal", actual.to_string()),
        )
        .with_expected_messages(diff.expected_message())
        .with_actual_messages(diff.actual_message()),
    )
}

fn sequence_diff(
    raw: &Raw,
    expected: &Value,
    actual: &Value,
    e: &LtVec<Value>,
    a: &LtVec<Value>,
) -> Outcome {
    let diff = SequenceDiff::compute(e, a);
    if diff.is_equal() {
        return Outcome::Pass;
    }
    Outcome::Fail(
        Failure::new(
            raw,
            Statement::new(expected.to_string(), "does not equal", actual.to_string()),
        )
        .with_messages(diff.discrepancy.map(|d| d.message().to_string()))
        .with_expected_messages(diff.elements.expected_message())
        .with_actual_messages(diff.elements.actual_message()),
    )
}
