//! Value classification, structural diffing, and comparison for Probity.
//!
//! This crate provides:
//! - [`classify`] - Strategy selection for an evaluated expected/actual pair
//! - [`MapDiff`], [`SetDiff`], [`SequenceDiff`] - Structural differences
//! - [`compare`] / [`compare_with`] - Strategy execution producing an [`Outcome`]
//! - [`Outcome`] - Pass, failure, and error records
//!
//! Nothing here counts results or reports them; see `probity_runner`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod classify;
pub mod compare;
pub mod diff;
pub mod outcome;

pub use classify::{Strategy, classify};
pub use compare::{
    DirectInvoker, Invoker, MAP_MEMBERSHIP_USAGE, MEMBERSHIP_TARGET_USAGE, compare, compare_with,
};
pub use diff::{
    Discrepancy, KeyPath, MapDiff, Mismatch, SequenceDiff, SetDiff, flatten, nan_eq,
    normalize_nan,
};
pub use outcome::{ErrorReport, Failure, Outcome, Raw, Side, Statement};
