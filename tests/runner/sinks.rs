//! Integration tests for reporting sinks
//!
//! Tests the recording, logging, and fan-out sinks against real runs.

use std::sync::Arc;

use probity_runner::{
    Event, Expectation, FanoutSink, LogSink, Meta, RecordingSink, Runner, Sink, Summary, TestCase,
    logging,
};

fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new("one", Meta::new("sinks", "tests/runner/sinks.rs", 1), Expectation::new("1", "1", || 1, || 1)),
        TestCase::new("two", Meta::new("sinks", "tests/runner/sinks.rs", 2), Expectation::new("1", "2", || 1, || 2)),
    ]
}

#[test]
fn fanout_delivers_identical_streams() {
    logging::init("probity=debug");
    let left = Arc::new(RecordingSink::new());
    let right = Arc::new(RecordingSink::new());
    let fanout = FanoutSink::new()
        .with(left.clone())
        .with(right.clone())
        .with(Arc::new(LogSink));

    Runner::default().run(cases(), &fanout).unwrap();

    assert_eq!(left.records(), right.records());
    assert_eq!(left.summary(), Some(Summary { test: 2, pass: 1, fail: 1, error: 0 }));
}

#[test]
fn summary_is_reported_once() {
    let sink = RecordingSink::new();
    Runner::default().run(cases(), &sink).unwrap();
    let summaries = sink
        .events()
        .into_iter()
        .filter(|event| matches!(event, Event::Summary(_)))
        .count();
    assert_eq!(summaries, 1);
}

#[test]
fn custom_sinks_see_case_context() {
    use parking_lot::Mutex;
    use probity_runner::CaseContext;

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl Sink for Lines {
        fn started(&self, case: &CaseContext) {
            self.0.lock().push(format!("start {case}"));
        }
        fn finished(&self, _case: &CaseContext) {}
        fn reported(&self, case: Option<&CaseContext>, event: &Event) {
            if let (Some(case), Event::Fail(failure)) = (case, event) {
                self.0.lock().push(format!("{} {}", case.name, failure.result));
            }
        }
    }

    let sink = Lines::default();
    Runner::default().run(cases(), &sink).unwrap();
    assert_eq!(
        *sink.0.lock(),
        vec![
            "start sinks/one (line 1)".to_string(),
            "start sinks/two (line 2)".to_string(),
            "two 1 does not equal 2".to_string(),
        ]
    );
}
