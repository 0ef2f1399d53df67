//! Integration tests for comparison outcomes
//!
//! Drives `compare` through the public API for each strategy.

use probity_engine::{Outcome, Raw, Side, Strategy, classify, compare};
use probity_foundation::{Evaluated, Fault, FaultType, NativeFn, Type, Value, in_};

fn ok(value: impl Into<Value>) -> Evaluated {
    Ok(value.into())
}

fn check(expected: Evaluated, actual: Evaluated) -> Outcome {
    compare(&Raw::new("expected", "actual"), &expected, &actual)
}

// =============================================================================
// Strategy Table
// =============================================================================

#[test]
fn strategy_per_operand_shape() {
    let even = NativeFn::predicate("even?", |v| v.as_int().is_some_and(|n| n % 2 == 0));
    let cases = [
        (ok(Type::Fault(FaultType::panic())), ok(1), Strategy::ExpectFault),
        (Err(Fault::new(FaultType::panic(), "x")), ok(1), Strategy::ExpectedFault),
        (ok(1), Err(Fault::new(FaultType::panic(), "x")), Strategy::ActualFault),
        (ok(even), ok(2), Strategy::Predicate),
        (ok(true), ok(2), Strategy::Truthy),
        (ok(1), ok(in_(Value::vec([1]))), Strategy::Membership),
        (ok(Value::map([("a", 1)])), ok(Value::map([("a", 1)])), Strategy::MapDiff),
        (ok(Value::set([1])), ok(Value::set([1])), Strategy::SetDiff),
        (ok(Value::vec([1])), ok(Value::vec([1])), Strategy::SequenceDiff),
        (ok(Value::pattern("a").unwrap()), ok("a"), Strategy::PatternMatch),
        (ok(Type::Int), ok(1), Strategy::InstanceCheck),
        (ok("a"), ok("a"), Strategy::Equality),
    ];
    for (expected, actual, strategy) in cases {
        assert_eq!(classify(&expected, &actual), strategy, "{strategy}");
    }
}

// =============================================================================
// Nested Maps
// =============================================================================

#[test]
fn nested_map_reports_full_path() {
    let expected = Value::map([("user", Value::map([("name", "ada"), ("age", "36")]))]);
    let actual = Value::map([("user", Value::map([("name", "ada"), ("age", "37")]))]);
    let outcome = check(ok(expected), ok(actual));
    let failure = outcome.as_failure().unwrap();
    assert_eq!(failure.messages, vec!["user age expected 36 but was 37".to_string()]);
    assert!(failure.expected_messages.is_empty());
    assert!(failure.actual_messages.is_empty());
}

#[test]
fn nested_map_missing_and_extra_keys() {
    let expected = Value::map([("a", Value::map([("b", 1), ("c", 2)]))]);
    let actual = Value::map([("a", Value::map([("b", 1), ("d", 2)]))]);
    let outcome = check(ok(expected), ok(actual));
    let failure = outcome.as_failure().unwrap();
    assert_eq!(
        failure.expected_message().as_deref(),
        Some("{a {c ... is in expected, but not in actual")
    );
    assert_eq!(
        failure.actual_message().as_deref(),
        Some("{a {d ... is in actual, but not in expected")
    );
}

#[test]
fn nan_leaves_in_maps_are_equal() {
    let expected = Value::map([("x", Value::vec([f64::NAN]))]);
    let actual = Value::map([("x", Value::vec([f64::NAN]))]);
    assert!(check(ok(expected), ok(actual)).is_pass());
}

// =============================================================================
// Sequences
// =============================================================================

#[test]
fn sequence_discrepancies() {
    let cases = [
        (vec![1, 2, 3], vec![3, 1, 2], "lists appear to contain the same items with different ordering"),
        (vec![1, 2], vec![1, 2, 2], "actual contains duplicate items not present in expected"),
        (vec![1, 2, 2], vec![1, 2], "expected contains duplicate items not present in actual"),
        (vec![1], vec![1, 3], "actual is larger than expected"),
        (vec![1, 3], vec![1], "expected is larger than actual"),
    ];
    for (expected, actual, message) in cases {
        let outcome = check(ok(Value::vec(expected)), ok(Value::vec(actual)));
        assert_eq!(outcome.as_failure().unwrap().message().as_deref(), Some(message));
    }
}

#[test]
fn same_items_with_shifted_multiplicity_has_no_classification() {
    let outcome = check(ok(Value::vec([1, 1, 2])), ok(Value::vec([1, 2, 2])));
    let failure = outcome.as_failure().unwrap();
    assert!(failure.messages.is_empty());
    assert!(failure.expected_messages.is_empty());
    assert!(failure.actual_messages.is_empty());
}

#[test]
fn same_length_different_items_has_no_classification() {
    let outcome = check(ok(Value::vec([1, 2])), ok(Value::vec([1, 3])));
    let failure = outcome.as_failure().unwrap();
    assert!(failure.messages.is_empty());
    assert_eq!(
        failure.expected_message().as_deref(),
        Some("2 are in expected, but not in actual")
    );
}

// =============================================================================
// Faults
// =============================================================================

#[test]
fn actual_fault_message_is_reported() {
    let fault = Fault::new(FaultType::new("arithmetic"), "divide by zero");
    for expected in [ok(1), ok(true), ok(Value::map([("a", 1)])), ok(Type::Int)] {
        let outcome = check(expected, Err(fault.clone()));
        let report = outcome.as_error().unwrap();
        assert_eq!(report.side, Side::Actual);
        assert!(report.actual_message.as_deref().unwrap().contains("divide by zero"));
    }
}

#[test]
fn expected_fault_type_matches_descendants() {
    let io = FaultType::new("io");
    let outcome = check(
        ok(Type::Fault(io.clone())),
        Err(Fault::new(io.child("timeout"), "slow")),
    );
    assert!(outcome.is_pass());
}
