//! Sequential test driver.

use probity_engine::{ErrorReport, Outcome, Raw, Side, compare_with};
use probity_foundation::Result;
use tracing::{debug, info};

use crate::capture::{self, CapturingInvoker};
use crate::case::{Body, CaseContext, Phase, TestCase};
use crate::config::RunConfig;
use crate::report::{Aggregator, Sink, Summary};

/// Runs test cases one at a time and reports their results.
#[derive(Clone, Debug, Default)]
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    /// Creates a runner.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every selected case in name order, then reports the summary.
    ///
    /// Cases rejected by the configured filters are neither started nor
    /// counted. Faults raised by a case never stop the run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if a case's lifecycle is violated. This
    /// indicates a defect in the driver and ends the run without a summary.
    pub fn run(&self, cases: Vec<TestCase>, sink: &dyn Sink) -> Result<Summary> {
        let total = cases.len();
        let mut cases: Vec<TestCase> = cases
            .into_iter()
            .filter(|case| self.config.selects(case.context()))
            .collect();
        cases.sort_by(|a, b| a.name().cmp(b.name()));
        info!(selected = cases.len(), total, "starting run");

        let aggregator = Aggregator::new(sink);
        for case in cases {
            self.run_case(case, &aggregator)?;
        }

        let summary = aggregator.finish();
        info!(%summary, "run finished");
        Ok(summary)
    }

    fn run_case(&self, case: TestCase, aggregator: &Aggregator<'_>) -> Result<()> {
        let (context, body) = case.into_parts();
        let mut phase = Phase::Pending;

        phase = phase.advance(Phase::Started)?;
        aggregator.begin(&context);
        debug!(case = %context, %phase);

        phase = phase.advance(Phase::Running)?;
        let outcome = self.evaluate(&context, body);

        phase = phase.advance(Phase::Compared)?;
        debug!(case = %context, %phase, pass = outcome.is_pass());
        aggregator.record(&context, outcome);

        phase.advance(Phase::Finished)?;
        aggregator.end(&context);
        Ok(())
    }

    /// Produces exactly one outcome for a case body.
    fn evaluate(&self, context: &CaseContext, body: Body) -> Outcome {
        let expectation = match capture::guarded(body) {
            Ok(expectation) => expectation,
            Err(fault) => {
                let raw = Raw::new(String::new(), context.name.clone());
                return self.filtered(Outcome::Error(ErrorReport::from_fault(
                    &raw,
                    Side::Actual,
                    &fault,
                )));
            }
        };

        let (raw, expected, actual) = expectation.into_parts();
        let expected = capture::evaluate(expected);
        let actual = capture::evaluate(actual);
        self.filtered(compare_with(&raw, &expected, &actual, &CapturingInvoker))
    }

    fn filtered(&self, mut outcome: Outcome) -> Outcome {
        if let Outcome::Error(report) = &mut outcome {
            report.stack_trace = self
                .config
                .stack_filter
                .apply(&report.stack_trace, self.config.max_trace_frames);
        }
        outcome
    }
}
