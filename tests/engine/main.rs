//! Integration tests for Layer 1: Engine
//!
//! Tests for strategy selection, structural diffs, and comparison outcomes.

mod comparisons;
mod properties;
