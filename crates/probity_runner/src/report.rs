//! Result counting and reporting.
//!
//! The [`Aggregator`] owns the counters for one run and forwards every
//! record to a [`Sink`] together with the case it belongs to. Sinks are the
//! boundary to whatever renders results; this crate ships in-memory,
//! tracing, and fan-out sinks.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use probity_engine::{ErrorReport, Failure, Outcome};
#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::{info, warn};

use crate::case::CaseContext;

// =============================================================================
// Counters and Summary
// =============================================================================

/// Per-run counters.
///
/// Increments are atomic adds, so they commute and need no lock.
#[derive(Debug, Default)]
pub struct Counters {
    test: AtomicU64,
    pass: AtomicU64,
    fail: AtomicU64,
    error: AtomicU64,
}

impl Counters {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a case being entered.
    pub fn increment_test(&self) {
        self.test.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a pass.
    pub fn increment_pass(&self) {
        self.pass.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a failure.
    pub fn increment_fail(&self) {
        self.fail.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an error.
    pub fn increment_error(&self) {
        self.error.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads the current totals.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary {
            test: self.test.load(Ordering::Relaxed),
            pass: self.pass.load(Ordering::Relaxed),
            fail: self.fail.load(Ordering::Relaxed),
            error: self.error.load(Ordering::Relaxed),
        }
    }
}

/// Totals for a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Summary {
    /// Cases entered.
    pub test: u64,
    /// Cases that passed.
    pub pass: u64,
    /// Cases whose values differed.
    pub fail: u64,
    /// Cases whose evaluation faulted.
    pub error: u64,
}

impl Summary {
    /// Returns true if nothing failed or errored.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.fail + self.error == 0
    }

    /// Process exit code for the run: 0 on success, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tests, {} passed, {} failed, {} errors",
            self.test, self.pass, self.fail, self.error
        )
    }
}

// =============================================================================
// Events and Sinks
// =============================================================================

/// A record forwarded to a sink.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Event {
    /// A case passed.
    Pass,
    /// A case failed.
    Fail(Failure),
    /// A case errored.
    Error(ErrorReport),
    /// The run finished.
    Summary(Summary),
}

impl From<Outcome> for Event {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Pass => Self::Pass,
            Outcome::Fail(failure) => Self::Fail(failure),
            Outcome::Error(report) => Self::Error(report),
        }
    }
}

/// Receives lifecycle events and results.
///
/// For each case the calls arrive in the order `started`, `reported`,
/// `finished`. A single `reported` with no case and an [`Event::Summary`]
/// follows the last case.
pub trait Sink: Send + Sync {
    /// A case is about to run.
    fn started(&self, case: &CaseContext);

    /// A case has finished.
    fn finished(&self, case: &CaseContext);

    /// A result or the run summary.
    fn reported(&self, case: Option<&CaseContext>, event: &Event);
}

/// One call received by a [`RecordingSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recorded {
    /// `started` for the named case.
    Started(String),
    /// `reported`, with the case name if any.
    Reported(Option<String>, Event),
    /// `finished` for the named case.
    Finished(String),
}

/// Keeps every call in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<Recorded>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, in order.
    #[must_use]
    pub fn records(&self) -> Vec<Recorded> {
        self.records.lock().clone()
    }

    /// Reported events, in order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.records
            .lock()
            .iter()
            .filter_map(|record| match record {
                Recorded::Reported(_, event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    /// The reported summary, if the run finished.
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        self.events().into_iter().find_map(|event| match event {
            Event::Summary(summary) => Some(summary),
            _ => None,
        })
    }
}

impl Sink for RecordingSink {
    fn started(&self, case: &CaseContext) {
        self.records.lock().push(Recorded::Started(case.name.clone()));
    }

    fn finished(&self, case: &CaseContext) {
        self.records.lock().push(Recorded::Finished(case.name.clone()));
    }

    fn reported(&self, case: Option<&CaseContext>, event: &Event) {
        self.records
            .lock()
            .push(Recorded::Reported(case.map(|c| c.name.clone()), event.clone()));
    }
}

/// Emits every call as a tracing event.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl Sink for LogSink {
    fn started(&self, case: &CaseContext) {
        info!(case = %case, "started");
    }

    fn finished(&self, case: &CaseContext) {
        info!(case = %case, "finished");
    }

    fn reported(&self, case: Option<&CaseContext>, event: &Event) {
        let case = case.map(ToString::to_string).unwrap_or_default();
        match event {
            Event::Pass => info!(case = %case, "pass"),
            Event::Fail(failure) => warn!(
                case = %case,
                result = %failure.result,
                detail = %failure.message().unwrap_or_default(),
                expected = %failure.expected_message().unwrap_or_default(),
                actual = %failure.actual_message().unwrap_or_default(),
                "fail"
            ),
            Event::Error(report) => warn!(
                case = %case,
                result = %report.result,
                fault = %report.fault_type,
                expected = %report.expected_message.as_deref().unwrap_or_default(),
                actual = %report.actual_message.as_deref().unwrap_or_default(),
                frames = report.stack_trace.len(),
                "error"
            ),
            Event::Summary(summary) => info!(
                test = summary.test,
                pass = summary.pass,
                fail = summary.fail,
                error = summary.error,
                "summary"
            ),
        }
    }
}

/// Forwards every call to several sinks, in order.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanoutSink {
    /// Creates a sink with no targets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a target.
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanoutSink").field("sinks", &self.sinks.len()).finish()
    }
}

impl Sink for FanoutSink {
    fn started(&self, case: &CaseContext) {
        for sink in &self.sinks {
            sink.started(case);
        }
    }

    fn finished(&self, case: &CaseContext) {
        for sink in &self.sinks {
            sink.finished(case);
        }
    }

    fn reported(&self, case: Option<&CaseContext>, event: &Event) {
        for sink in &self.sinks {
            sink.reported(case, event);
        }
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Counts results for one run and forwards them to a sink.
pub struct Aggregator<'a> {
    counters: Counters,
    sink: &'a dyn Sink,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator with zeroed counters.
    #[must_use]
    pub fn new(sink: &'a dyn Sink) -> Self {
        Self {
            counters: Counters::new(),
            sink,
        }
    }

    /// Counts a case being entered and announces it.
    pub fn begin(&self, case: &CaseContext) {
        self.counters.increment_test();
        self.sink.started(case);
    }

    /// Announces that a case is done.
    pub fn end(&self, case: &CaseContext) {
        self.sink.finished(case);
    }

    /// Records a pass.
    pub fn record_pass(&self, case: &CaseContext) {
        self.counters.increment_pass();
        self.sink.reported(Some(case), &Event::Pass);
    }

    /// Records a failure.
    pub fn record_fail(&self, case: &CaseContext, failure: Failure) {
        self.counters.increment_fail();
        self.sink.reported(Some(case), &Event::Fail(failure));
    }

    /// Records an error.
    pub fn record_error(&self, case: &CaseContext, report: ErrorReport) {
        self.counters.increment_error();
        self.sink.reported(Some(case), &Event::Error(report));
    }

    /// Records whichever result `outcome` holds.
    pub fn record(&self, case: &CaseContext, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.record_pass(case),
            Outcome::Fail(failure) => self.record_fail(case, failure),
            Outcome::Error(report) => self.record_error(case, report),
        }
    }

    /// Current totals.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.counters.summary()
    }

    /// Ends the run, forwarding the summary once.
    pub fn finish(self) -> Summary {
        let summary = self.counters.summary();
        self.sink.reported(None, &Event::Summary(summary));
        summary
    }
}

impl fmt::Debug for Aggregator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator").field("counters", &self.counters).finish_non_exhaustive()
    }
}
