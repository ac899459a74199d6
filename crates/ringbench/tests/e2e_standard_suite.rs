//! End-to-end: the standard suite driven through the controller.
//!
//! Covers the console transcript, the report, and how a corrupted subject
//! surfaces as a failed case without stopping the run.

use ringbench::{QueueBench, QueueCase, QueueCheck, QueueId, drive, standard_registry};
use ringbench_harness::{
    ConsoleSink, Controller, MemorySink, PhasedCase, Registry, Scenario, Verdict,
};

fn transcript() -> String {
    let mut controller = Controller::new(
        standard_registry(),
        QueueBench::new(),
        ConsoleSink::new(Vec::new()),
    );
    drive(&mut controller, 10_000).unwrap();
    let (_, _, sink) = controller.into_parts();
    String::from_utf8(sink.into_inner()).unwrap()
}

#[test]
fn console_transcript_has_one_block_per_test() {
    let text = transcript();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 17 * 3, "{text}");

    for (i, block) in lines.chunks(3).enumerate() {
        let n = i + 1;
        assert!(
            block[0].starts_with(&format!("Executing test number: {n} of 17 (")),
            "{}",
            block[0]
        );
        assert_eq!(block[1], "Test Result: PASS");
        assert_eq!(block[2], format!("Test {n} completed"));
    }
    assert!(!text.contains("[ERROR]"));
}

#[test]
fn report_matches_registry_order() {
    let registry = standard_registry();
    let names: Vec<String> = registry.names().map(str::to_owned).collect();
    let mut controller = Controller::new(registry, QueueBench::new(), MemorySink::new());
    drive(&mut controller, 10_000).unwrap();

    let report = controller.report("standard");
    assert_eq!((report.total, report.passed, report.failed), (17, 17, 0));
    let reported: Vec<String> = report.cases.iter().map(|c| c.name.clone()).collect();
    assert_eq!(reported, names);
    assert!(
        report
            .cases
            .iter()
            .enumerate()
            .all(|(i, c)| c.position == i + 1)
    );
}

/// Wraps a queue check and rewinds the subject between `Run` and `Verify`.
struct Sabotaged(QueueCase);

impl Scenario<QueueBench> for Sabotaged {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn prepare(&mut self, bench: &mut QueueBench) {
        self.0.prepare(bench);
    }

    fn exercise(&mut self, bench: &mut QueueBench) {
        self.0.exercise(bench);
        bench.queue_mut(self.0.target()).init();
    }

    fn verify(&mut self, bench: &mut QueueBench) -> Verdict {
        self.0.verify(bench)
    }
}

#[test]
fn failing_case_is_logged_and_run_continues() {
    let registry = Registry::new()
        .with(QueueCase::phased(QueueCheck::ResetsIndices, QueueId::Primary))
        .with(PhasedCase::new(Sabotaged(QueueCase::new(
            QueueCheck::EnqueueStoresValue,
            QueueId::Primary,
        ))))
        .with(QueueCase::phased(QueueCheck::InstancesIsolated, QueueId::Primary));
    let mut controller = Controller::new(registry, QueueBench::new(), MemorySink::new());
    drive(&mut controller, 10_000).unwrap();

    let sink = controller.sink();
    assert_eq!(sink.verdicts(), vec![true, false, true]);
    assert_eq!(sink.completed(), vec![1, 2, 3]);
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "ERROR");
    assert!(
        messages[0].1.contains("enqueue() didn't advance write index"),
        "{}",
        messages[0].1
    );

    let report = controller.report("sabotage");
    assert_eq!(report.failed, 1);
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.position, 2);
    assert_eq!(failure.name, "enqueue_stores_value[primary]");
    assert!(report.render_text().contains("FAIL"));
}

#[test]
fn rerun_after_reset_gives_identical_verdicts() {
    let mut controller = Controller::new(standard_registry(), QueueBench::new(), MemorySink::new());
    drive(&mut controller, 10_000).unwrap();
    let first = controller.report("standard");

    controller.reset();
    controller.sink_mut().clear();
    drive(&mut controller, 10_000).unwrap();
    assert_eq!(controller.report("standard"), first);
    assert_eq!(controller.sink().verdicts().len(), 17);
}
