//! Cross-layer integration tests for Probity
//!
//! Tests that verify correct interaction between all three layers.

mod end_to_end;
