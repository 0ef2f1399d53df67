//! Integration tests for Layer 2: Runner
//!
//! Tests for the driver, fault capture, and sinks.

mod driver;
mod sinks;
