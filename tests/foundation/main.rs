//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Type, Fault, Pattern, and Error.

mod faults;
mod values;
