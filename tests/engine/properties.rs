//! Property tests for the diff engine
//!
//! Checks the algebraic properties of map, set, and sequence comparison.

use probity_engine::{MapDiff, Outcome, Raw, compare, flatten, normalize_nan};
use probity_foundation::{LtMap, Value};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Float(f64::NAN)),
        "[a-z]{0,3}".prop_map(Value::from),
    ]
}

fn nested_map() -> impl Strategy<Value = LtMap<Value, Value>> {
    let inner = prop::collection::hash_map("[a-c]", leaf(), 0..3).prop_map(|m| {
        Value::Map(m.into_iter().map(|(k, v)| (Value::from(k), v)).collect())
    });
    let field = prop_oneof![leaf(), inner];
    prop::collection::hash_map("[a-d]", field, 0..4)
        .prop_map(|m| m.into_iter().map(|(k, v)| (Value::from(k), v)).collect::<LtMap<_, _>>())
}

fn run(expected: Value, actual: Value) -> Outcome {
    compare(&Raw::default(), &Ok(expected), &Ok(actual))
}

proptest! {
    #[test]
    fn map_comparison_matches_flattened_equality(e in nested_map(), a in nested_map()) {
        let normalize = |m: &LtMap<Value, Value>| match normalize_nan(&Value::Map(m.clone())) {
            Value::Map(m) => flatten(&m),
            _ => unreachable!(),
        };
        let flat_equal = normalize(&e) == normalize(&a);
        prop_assert_eq!(MapDiff::compute(&e, &a).is_equal(), flat_equal);
        prop_assert_eq!(run(Value::Map(e), Value::Map(a)).is_pass(), flat_equal);
    }

    #[test]
    fn sequences_equal_themselves(items in prop::collection::vec(any::<i64>(), 0..20)) {
        prop_assert!(run(Value::vec(items.clone()), Value::vec(items)).is_pass());
    }

    #[test]
    fn reversed_distinct_sequences_differ_by_ordering(
        items in prop::collection::hash_set(any::<i64>(), 2..20)
    ) {
        let items: Vec<i64> = items.into_iter().collect();
        let reversed: Vec<i64> = items.iter().rev().copied().collect();
        let outcome = run(Value::vec(items), Value::vec(reversed));
        let failure = outcome.as_failure().unwrap();
        prop_assert_eq!(
            failure.message(),
            Some("lists appear to contain the same items with different ordering".to_string())
        );
    }

    #[test]
    fn set_extension_is_reported_on_actual_side(
        items in prop::collection::hash_set(0_i64..1_000, 0..20),
        extra in 1_000_i64..2_000,
    ) {
        let base = Value::set(items.iter().copied());
        prop_assert!(run(base.clone(), base.clone()).is_pass());

        let extended = Value::set(items.iter().copied().chain([extra]));
        let outcome = run(base, extended);
        let failure = outcome.as_failure().unwrap();
        prop_assert!(failure.expected_messages.is_empty());
        prop_assert_eq!(
            failure.actual_message(),
            Some(format!("{extra} are in actual, but not in expected"))
        );
    }
}
