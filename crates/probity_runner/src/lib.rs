//! Test driver and result reporting for Probity.
//!
//! This crate provides:
//! - [`Runner`] - Sequential execution of [`TestCase`]s
//! - [`Aggregator`] - Per-run counters forwarding records to a [`Sink`]
//! - [`capture`] - Scoped evaluation turning panics into faults
//! - [`RunConfig`] - Case filters and stack-trace policy
//! - [`logging`] - `tracing` subscriber setup

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod capture;
pub mod case;
pub mod config;
pub mod driver;
pub mod logging;
pub mod report;

pub use capture::{CapturingInvoker, evaluate, guarded, raise};
pub use case::{Body, CaseContext, Expectation, Meta, Phase, TestCase, Thunk};
pub use config::{RunConfig, StackFilter};
pub use driver::Runner;
pub use report::{
    Aggregator, Counters, Event, FanoutSink, LogSink, Recorded, RecordingSink, Sink, Summary,
};
