//! Integration tests for Value types
//!
//! Tests Value variants, equality, hashing, display, and type descriptors.

use probity_foundation::{Arity, NativeFn, Type, Value, in_};
use std::collections::HashSet;

// =============================================================================
// Truthiness
// =============================================================================

#[test]
fn only_nil_and_false_are_falsy() {
    assert!(!Value::Nil.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(Value::Bool(true).is_truthy());
    assert!(Value::Int(0).is_truthy());
    assert!(Value::from("").is_truthy());
    assert!(Value::vec(Vec::<i64>::new()).is_truthy());
}

// =============================================================================
// Equality and Hashing
// =============================================================================

#[test]
fn collections_compare_structurally() {
    assert_eq!(Value::vec([1, 2]), Value::vec([1, 2]));
    assert_ne!(Value::vec([1, 2]), Value::vec([2, 1]));
    assert_eq!(Value::set([1, 2]), Value::set([2, 1]));
    assert_eq!(Value::map([("a", 1), ("b", 2)]), Value::map([("b", 2), ("a", 1)]));
}

#[test]
fn nan_is_bitwise_self_equal() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
}

#[test]
fn int_and_float_are_distinct() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn values_work_as_set_members() {
    let mut seen = HashSet::new();
    seen.insert(Value::map([("a", 1)]));
    seen.insert(Value::map([("a", 1)]));
    seen.insert(Value::set(["x", "y"]));
    seen.insert(Value::set(["y", "x"]));
    assert_eq!(seen.len(), 2);
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_rendering() {
    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::Float(1.0).to_string(), "1.0");
    assert_eq!(Value::keyword("ok").to_string(), ":ok");
    assert_eq!(Value::vec([1, 2, 3]).to_string(), "[1 2 3]");
    assert_eq!(Value::map([("b", 2), ("a", 1)]).to_string(), "{a 1, b 2}");
    assert_eq!(in_(Value::vec([1])).to_string(), "(in [1])");
}

// =============================================================================
// Types
// =============================================================================

#[test]
fn runtime_types() {
    assert_eq!(Value::Int(1).value_type(), Type::Int);
    assert_eq!(Value::from("s").value_type(), Type::String);
    assert!(Type::vec(Type::Int).accepts(&Value::vec([1]).value_type()));
    assert!(Type::Float.accepts(&Value::Int(1).value_type()));
    assert!(!Type::Int.accepts(&Value::Float(1.0).value_type()));
    assert!(Type::option(Type::Int).accepts(&Value::Nil.value_type()));
}

// =============================================================================
// Native Functions
// =============================================================================

#[test]
fn native_fn_checks_arity() {
    let pos = NativeFn::predicate("pos?", |v| v.as_int().is_some_and(|n| n > 0));
    assert_eq!(pos.arity(), &Arity::Exact(1));
    assert_eq!(pos.call(&[Value::Int(3)]).unwrap(), Value::Bool(true));
    assert!(pos.call(&[]).is_err());
}

#[test]
fn native_fn_identity() {
    let a = NativeFn::predicate("t", |_| true);
    let b = NativeFn::predicate("t", |_| true);
    assert_eq!(Value::Fn(a.clone()), Value::Fn(a.clone()));
    assert_ne!(Value::Fn(a), Value::Fn(b));
}
