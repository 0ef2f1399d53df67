//! Integration tests for the test driver
//!
//! Tests ordering, filtering, fault capture, and the counter invariant.

use probity_foundation::{Fault, FaultType, NativeFn, Type, Value, in_};
use probity_runner::{
    Event, Expectation, Meta, Recorded, RecordingSink, RunConfig, Runner, TestCase, raise,
};

fn meta(namespace: &str, line: u32) -> Meta {
    Meta::new(namespace, "tests/runner/driver.rs", line)
}

fn equal(name: &str, expected: i64, actual: i64) -> TestCase {
    TestCase::new(
        name,
        meta("suite", 1),
        Expectation::new("expected", "actual", move || expected, move || actual),
    )
}

// =============================================================================
// Ordering and Counting
// =============================================================================

#[test]
fn counter_invariant_holds() {
    let mut cases: Vec<TestCase> = (0..10)
        .map(|i| equal(&format!("case-{i:02}"), i, i % 3))
        .collect();
    cases.push(TestCase::new(
        "faulty",
        meta("suite", 2),
        Expectation::try_new("1", "(fail)", || Ok(Value::Int(1)), || {
            Err(Fault::new(FaultType::new("custom"), "nope"))
        }),
    ));

    let sink = RecordingSink::new();
    let summary = Runner::default().run(cases, &sink).unwrap();
    assert_eq!(summary.test, 11);
    assert_eq!(summary.pass + summary.fail + summary.error, summary.test);
    assert_eq!(summary.error, 1);
    assert!(!summary.is_success());
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn events_follow_started_reported_finished() {
    let sink = RecordingSink::new();
    Runner::default()
        .run(vec![equal("b", 1, 1), equal("a", 1, 2)], &sink)
        .unwrap();

    let records = sink.records();
    assert!(matches!(&records[0], Recorded::Started(name) if name == "a"));
    assert!(matches!(&records[1], Recorded::Reported(Some(name), Event::Fail(_)) if name == "a"));
    assert!(matches!(&records[2], Recorded::Finished(name) if name == "a"));
    assert!(matches!(&records[3], Recorded::Started(name) if name == "b"));
    assert!(matches!(&records[4], Recorded::Reported(Some(_), Event::Pass)));
    assert!(matches!(&records[5], Recorded::Finished(name) if name == "b"));
    assert!(matches!(&records[6], Recorded::Reported(None, Event::Summary(_))));
    assert_eq!(records.len(), 7);
}

#[test]
fn name_filter_skips_cases() {
    let sink = RecordingSink::new();
    let runner = Runner::new(RunConfig::default().with_name_filter("math"));
    let summary = runner
        .run(vec![equal("math-adds", 1, 1), equal("text-joins", 1, 2)], &sink)
        .unwrap();
    assert_eq!(summary.test, 1);
    assert!(summary.is_success());
}

#[test]
fn empty_run_still_reports_summary() {
    let sink = RecordingSink::new();
    let summary = Runner::default().run(Vec::new(), &sink).unwrap();
    assert_eq!(summary.test, 0);
    assert_eq!(sink.summary(), Some(summary));
}

// =============================================================================
// Fault Capture
// =============================================================================

#[test]
fn panics_in_expected_are_errors() {
    let sink = RecordingSink::new();
    let cases = vec![TestCase::new(
        "bad-fixture",
        meta("suite", 3),
        Expectation::try_new("(load)", "1", || panic!("fixture missing"), || Ok(Value::Int(1))),
    )];
    Runner::default().run(cases, &sink).unwrap();

    let Event::Error(report) = &sink.events()[0] else {
        panic!("expected an error event");
    };
    assert!(report.expected_message.as_deref().unwrap().contains("fixture missing"));
    assert!(report.actual_message.is_none());
}

#[test]
fn raised_faults_satisfy_fault_expectations() {
    let parse = FaultType::new("parse");
    let bad_digit = parse.child("bad-digit");
    let sink = RecordingSink::new();
    let cases = vec![TestCase::new(
        "rejects-letters",
        meta("suite", 4),
        Expectation::try_new(
            "parse",
            "(parse \"1x\")",
            move || Ok(Value::Type(Type::Fault(parse))),
            move || raise(Fault::new(bad_digit, "unexpected x")),
        ),
    )];
    let summary = Runner::default().run(cases, &sink).unwrap();
    assert_eq!(summary.pass, 1);
}

#[test]
fn panicking_predicate_is_an_error() {
    let strict = NativeFn::predicate("strict?", |_| panic!("predicate blew up"));
    let sink = RecordingSink::new();
    let cases = vec![TestCase::new(
        "strict",
        meta("suite", 5),
        Expectation::new("strict?", "1", move || strict, || 1),
    )];
    let summary = Runner::default().run(cases, &sink).unwrap();
    assert_eq!(summary.error, 1);
}

#[test]
fn membership_usage_error_is_a_failure() {
    let sink = RecordingSink::new();
    let cases = vec![TestCase::new(
        "bad-target",
        meta("suite", 6),
        Expectation::new("1", "(in 5)", || 1, || in_(5)),
    )];
    let summary = Runner::default().run(cases, &sink).unwrap();
    assert_eq!(summary.fail, 1);
    assert_eq!(summary.error, 0);
}
