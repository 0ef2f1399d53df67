//! Probity - Assertion engine with structural diffing
//!
//! This crate re-exports all layers of the Probity system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: probity_runner     - Test driver, fault capture, aggregation, sinks
//! Layer 1: probity_engine     - Classifier, diff engine, comparison strategies
//! Layer 0: probity_foundation - Core types (Value, Type, Fault, Error)
//! ```

pub use probity_engine as engine;
pub use probity_foundation as foundation;
pub use probity_runner as runner;
