//! Integration tests for faults and errors
//!
//! Tests the fault type hierarchy, fault construction, and error conversion.

use probity_foundation::{Error, ErrorContext, ErrorKind, Fault, FaultType, Frame, Pattern, Type};

// =============================================================================
// Fault Types
// =============================================================================

#[test]
fn hierarchy_walks_parents() {
    let io = FaultType::new("io");
    let timeout = io.child("timeout");
    assert!(timeout.is_a(&io));
    assert!(timeout.is_a(&FaultType::root()));
    assert!(!io.is_a(&timeout));
    assert!(!timeout.is_a(&FaultType::panic()));
    assert_eq!(timeout.path(), "fault/io/timeout");
}

#[test]
fn fault_type_descriptors_accept_subtypes() {
    let io = FaultType::new("io");
    let expected = Type::Fault(io.clone());
    assert!(expected.accepts(&Type::Fault(io.child("eof"))));
    assert!(!expected.accepts(&Type::Fault(FaultType::new("parse"))));
}

// =============================================================================
// Faults
// =============================================================================

#[test]
fn fault_display_and_frames() {
    let fault = Fault::new(FaultType::new("io"), "disk full")
        .with_frame(Frame::new("app::store", "flush").with_location("src/store.rs", 88));
    assert_eq!(fault.to_string(), "io: disk full");
    assert_eq!(fault.frames[0].to_string(), "app::store::flush (src/store.rs:88)");
}

#[test]
fn errors_convert_to_error_faults() {
    let err = Error::arity_mismatch("1".into(), 2)
        .with_context(ErrorContext::default().with_source("tests/x.rs"));
    let fault = Fault::from(err);
    assert!(fault.is_instance_of(&FaultType::error()));
    assert!(fault.message.contains("arity mismatch"));
    assert_eq!(fault.frames[0].file.as_deref(), Some("tests/x.rs"));
}

// =============================================================================
// Patterns
// =============================================================================

#[test]
fn pattern_search_is_unanchored() {
    let pattern = Pattern::new(r"\d{3}").unwrap();
    assert!(pattern.is_found_in("call 555-1234"));
    assert!(!pattern.is_found_in("no digits"));
}

#[test]
fn invalid_pattern_is_an_error() {
    let err = Pattern::new("(unclosed").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidPattern { .. }));
}
