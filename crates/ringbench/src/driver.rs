#![forbid(unsafe_code)]

//! Driver loop: ticks a controller until it has no more work.

use std::io;

use ringbench_harness::{ConsoleSink, Controller, LogSink, RunReport, TracingSink};

use crate::config::{RingbenchConfig, SinkKind};
use crate::error::{Result, RingbenchError};
use crate::suite::{QueueBench, build_registry};

/// Tick `controller` until it is finished.
///
/// Returns the number of ticks spent. A controller still busy after
/// `max_ticks` ticks is reported as [`RingbenchError::TickBudgetExhausted`].
pub fn drive<F, L: LogSink>(controller: &mut Controller<F, L>, max_ticks: u64) -> Result<u64> {
    let mut ticks = 0;
    while !controller.is_finished() {
        if ticks >= max_ticks {
            tracing::error!(
                ticks,
                cursor = controller.cursor(),
                state = ?controller.state(),
                case = controller.current_case().unwrap_or_default(),
                "controller did not finish within tick budget"
            );
            return Err(RingbenchError::TickBudgetExhausted {
                ticks,
                position: controller.cursor() + 1,
                total: controller.total(),
            });
        }
        controller.tick();
        ticks += 1;
    }
    Ok(ticks)
}

/// Sink chosen by [`SinkKind`].
pub enum SuiteSink {
    Console(ConsoleSink<io::Stdout>),
    Tracing(TracingSink),
}

impl SuiteSink {
    #[must_use]
    pub fn from_kind(kind: SinkKind) -> Self {
        match kind {
            SinkKind::Console => Self::Console(ConsoleSink::stdout()),
            SinkKind::Tracing => Self::Tracing(TracingSink),
        }
    }

    /// Surface a deferred console write error, if one happened.
    pub fn finish(&mut self) -> Result<()> {
        match self {
            Self::Console(console) => console.take_error().map_or(Ok(()), |err| Err(err.into())),
            Self::Tracing(_) => Ok(()),
        }
    }
}

impl LogSink for SuiteSink {
    fn test_started(&mut self, position: usize, total: usize, name: &str) {
        match self {
            Self::Console(sink) => sink.test_started(position, total, name),
            Self::Tracing(sink) => sink.test_started(position, total, name),
        }
    }

    fn log_result(&mut self, passed: bool) {
        match self {
            Self::Console(sink) => sink.log_result(passed),
            Self::Tracing(sink) => sink.log_result(passed),
        }
    }

    fn log_message(&mut self, tag: &str, message: &str) {
        match self {
            Self::Console(sink) => sink.log_message(tag, message),
            Self::Tracing(sink) => sink.log_message(tag, message),
        }
    }

    fn test_completed(&mut self, position: usize) {
        match self {
            Self::Console(sink) => sink.test_completed(position),
            Self::Tracing(sink) => sink.test_completed(position),
        }
    }
}

/// Run the configured suite through `sink` and return its report.
pub fn run_suite<L: LogSink>(config: &RingbenchConfig, sink: L) -> Result<(RunReport, L)> {
    let controller = Controller::builder()
        .registry(build_registry(&config.suite))
        .fixture(QueueBench::new())
        .sink(sink);
    let mut controller = controller.build()?;

    let ticks = drive(&mut controller, config.driver.max_ticks)?;
    let report = controller.report(config.suite.name.clone());
    tracing::info!(
        suite = %report.suite,
        total = report.total,
        passed = report.passed,
        failed = report.failed,
        ticks,
        "suite finished"
    );
    let (_, _, sink) = controller.into_parts();
    Ok((report, sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbench_harness::{CaseLog, MemorySink, Registry, TestCase};

    /// Never reports ready.
    struct Stuck;

    impl TestCase<()> for Stuck {
        fn name(&self) -> &str {
            "stuck"
        }

        fn init(&mut self, _fixture: &mut ()) -> bool {
            false
        }

        fn run(&mut self, _fixture: &mut (), _log: &mut CaseLog<'_>) {}
    }

    #[test]
    fn stalled_controller_hits_budget() {
        let mut controller = Controller::new(Registry::new().with(Stuck), (), MemorySink::new());
        let err = drive(&mut controller, 50).unwrap_err();
        match err {
            RingbenchError::TickBudgetExhausted {
                ticks,
                position,
                total,
            } => assert_eq!((ticks, position, total), (50, 1, 1)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_registry_needs_no_ticks() {
        let mut controller = Controller::new(Registry::<()>::new(), (), MemorySink::new());
        assert_eq!(drive(&mut controller, 1).unwrap(), 0);
    }

    #[test]
    fn default_suite_runs_clean() {
        let (report, sink) = run_suite(&RingbenchConfig::default(), MemorySink::new()).unwrap();
        assert_eq!(report.total, 17);
        assert!(report.all_passed(), "{:?}", sink.messages());
        assert_eq!(sink.completed().len(), 17);
    }

    #[test]
    fn tight_budget_fails_the_run() {
        let mut config = RingbenchConfig::default();
        config.driver.max_ticks = 5;
        let err = run_suite(&config, MemorySink::new()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
