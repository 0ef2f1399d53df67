//! End-to-end runs
//!
//! Builds suites the way a test-declaration surface would and checks the
//! reported records.

use probity::engine::Statement;
use probity::foundation::{Value, in_};
use probity::runner::{Event, Expectation, Meta, RecordingSink, RunConfig, Runner, TestCase};

fn meta(line: u32) -> Meta {
    Meta::new("app.core-test", "tests/integration/end_to_end.rs", line)
}

// =============================================================================
// Two-Case Suite
// =============================================================================

#[test]
fn scalar_pass_and_map_failure() {
    let cases = vec![
        TestCase::new("ones", meta(10), Expectation::new("1", "1", || 1, || 1)),
        TestCase::new(
            "maps",
            meta(11),
            Expectation::new(
                "{:a 1 :b 2}",
                "{:a 1 :b 3}",
                || Value::map([("a", 1), ("b", 2)]),
                || Value::map([("a", 1), ("b", 3)]),
            ),
        ),
    ];

    let sink = RecordingSink::new();
    let summary = Runner::default().run(cases, &sink).unwrap();

    assert_eq!((summary.test, summary.pass, summary.fail, summary.error), (2, 1, 1, 0));

    let events = sink.events();
    let failure = events
        .iter()
        .find_map(|event| match event {
            Event::Fail(failure) => Some(failure),
            _ => None,
        })
        .unwrap();
    assert_eq!(failure.messages, vec!["b expected 2 but was 3".to_string()]);
    assert!(failure.expected_messages.is_empty());
    assert!(failure.actual_messages.is_empty());
    assert_eq!(failure.raw.actual, "{:a 1 :b 3}");
    assert_eq!(
        failure.result,
        Statement::new("{a 1, b 2}", "does not equal", "{a 1, b 3}")
    );
}

// =============================================================================
// Mixed Suite
// =============================================================================

#[test]
fn mixed_suite_with_membership_and_faults() {
    let cases = vec![
        TestCase::new(
            "contains-two",
            meta(20),
            Expectation::new("2", "(in [1 2 3])", || 2, || in_(Value::vec([1, 2, 3]))),
        ),
        TestCase::new(
            "contains-four",
            meta(21),
            Expectation::new("4", "(in [1 2 3])", || 4, || in_(Value::vec([1, 2, 3]))),
        ),
        TestCase::new(
            "nan-is-nan",
            meta(22),
            Expectation::new("NaN", "(/ 0.0 0.0)", || f64::NAN, || 0.0_f64 / 0.0),
        ),
        TestCase::new(
            "unwraps",
            meta(23),
            Expectation::new("1", "(unwrap nil)", || 1, || -> i64 {
                let missing: Option<i64> = None;
                missing.unwrap()
            }),
        ),
    ];

    let sink = RecordingSink::new();
    let summary = Runner::new(RunConfig::default()).run(cases, &sink).unwrap();
    assert_eq!((summary.test, summary.pass, summary.fail, summary.error), (4, 2, 1, 1));

    // Cases run in name order: contains-four, contains-two, nan-is-nan, unwraps.
    let events = sink.events();
    let Event::Fail(failure) = &events[0] else {
        panic!("expected contains-four to fail");
    };
    assert_eq!(failure.message().as_deref(), Some("4 not found in [1 2 3]"));

    let Event::Error(report) = &events[3] else {
        panic!("expected unwraps to error");
    };
    assert_eq!(report.fault_type, "fault/panic");
    let site = &report.stack_trace[0];
    assert!(site.file.as_deref().unwrap().ends_with("end_to_end.rs"));
}
