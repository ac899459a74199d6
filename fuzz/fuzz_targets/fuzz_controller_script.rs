#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ringbench_harness::{CaseLog, Controller, ControllerState, MemorySink, Registry, TestCase};

#[derive(Debug, Clone, Arbitrary)]
struct Plan {
    init_delay: u8,
    steps: u8,
    verdicts: u8,
}

struct Scripted {
    plan: Plan,
    polls: u8,
    step: u8,
}

impl TestCase<u64> for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn init(&mut self, _fixture: &mut u64) -> bool {
        self.step = 0;
        if self.polls < self.plan.init_delay % 8 {
            self.polls += 1;
            return false;
        }
        true
    }

    fn run(&mut self, fixture: &mut u64, log: &mut CaseLog<'_>) {
        *fixture += 1;
        self.step = self.step.saturating_add(1);
        if self.step > self.plan.steps % 8 {
            // Extra verdicts past the first are dropped by the log.
            for n in 0..=(self.plan.verdicts % 3) {
                log.result(n % 2 == 0);
            }
        }
    }
}

fuzz_target!(|plans: Vec<Plan>| {
    let plans: Vec<Plan> = plans.into_iter().take(32).collect();
    let total = plans.len();
    let registry: Registry<u64> = plans
        .into_iter()
        .map(|plan| {
            Box::new(Scripted {
                plan,
                polls: 0,
                step: 0,
            }) as Box<dyn TestCase<u64>>
        })
        .collect();
    let mut controller = Controller::new(registry, 0u64, MemorySink::new());

    let mut last_cursor = 0;
    for _ in 0..(total * 64 + 1) {
        let before = *controller.fixture();
        controller.tick();
        assert!(*controller.fixture() - before <= 1, "more than one step per tick");
        assert!(controller.cursor() >= last_cursor);
        assert!(controller.cursor() <= total);
        last_cursor = controller.cursor();
    }

    assert_eq!(controller.state(), ControllerState::Idle);
    assert_eq!(controller.sink().verdicts(), vec![true; total]);
    assert_eq!(controller.sink().completed(), (1..=total).collect::<Vec<_>>());
});
