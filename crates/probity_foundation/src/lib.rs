//! Core values, persistent collections, and descriptors for Probity.
//!
//! This crate provides:
//! - [`Value`] - The dynamic value every assertion operand evaluates to
//! - [`Type`] - Type descriptors used by instance checks
//! - [`Fault`] / [`FaultType`] - Captured faults and their type hierarchy
//! - [`Pattern`] - Compiled text patterns
//! - [`Error`] - Library usage errors
//! - Persistent collections ([`LtVec`], [`LtSet`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod fault;
pub mod pattern;
pub mod types;
pub mod value;

pub use collections::{LtMap, LtSet, LtVec};
pub use error::{Error, ErrorContext, ErrorKind};
pub use fault::{Evaluated, Fault, FaultType, Frame};
pub use pattern::Pattern;
pub use types::{Arity, Type};
pub use value::{NativeFn, Value, in_};

/// Result type for Probity library operations.
pub type Result<T> = std::result::Result<T, Error>;
