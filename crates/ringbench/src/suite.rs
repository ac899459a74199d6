#![forbid(unsafe_code)]

//! The standard queue suite.
//!
//! Nine checks exercise the circular queue. The first eight are bound once
//! per target queue; the isolation check holds both queues at once. With the
//! default configuration the registry has 17 entries:
//!
//! | #     | Check                       | Subject   |
//! |-------|-----------------------------|-----------|
//! | 1–8   | per-queue checks            | primary   |
//! | 9–16  | per-queue checks            | secondary |
//! | 17    | `instances_isolated`        | both      |

use std::fmt;

use ringbench_harness::{AssertionFailure, PhasedCase, Registry, Scenario, Verdict, ensure};
use ringbench_queue::{ByteQueue, QueueError};
use serde::{Deserialize, Serialize};

use crate::config::SuiteConfig;

/// Value written by the enqueue check.
pub const ENQUEUE_VALUE: u8 = 10;

/// Value planted for the dequeue check.
pub const DEQUEUE_VALUE: u8 = 20;

/// Selects one of the two queues in a [`QueueBench`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueId {
    Primary,
    Secondary,
}

impl QueueId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixture owned by the controller: the queues under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueBench {
    primary: ByteQueue,
    secondary: ByteQueue,
}

impl QueueBench {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary: ByteQueue::new_with(0),
            secondary: ByteQueue::new_with(0),
        }
    }

    #[must_use]
    pub fn queue(&self, id: QueueId) -> &ByteQueue {
        match id {
            QueueId::Primary => &self.primary,
            QueueId::Secondary => &self.secondary,
        }
    }

    pub fn queue_mut(&mut self, id: QueueId) -> &mut ByteQueue {
        match id {
            QueueId::Primary => &mut self.primary,
            QueueId::Secondary => &mut self.secondary,
        }
    }
}

impl Default for QueueBench {
    fn default() -> Self {
        Self::new()
    }
}

/// The behavioural facets checked by the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueCheck {
    /// `init` brings both indices back to zero.
    ResetsIndices,
    /// `enqueue` stores the value at the write index and advances it.
    EnqueueStoresValue,
    /// `dequeue` returns the value at the read index and advances it.
    DequeueReturnsValue,
    /// Full/empty reporting at and just below the capacity boundary.
    FullnessReporting,
    /// Enqueue succeeds for exactly `capacity` values from a mid-buffer start.
    EnqueueAcceptsUntilFull,
    /// Enqueue into a full queue is rejected and changes nothing.
    EnqueueRejectsWhenFull,
    /// A full queue drains with `capacity` successful dequeues.
    DequeueDrainsFull,
    /// Dequeue from a drained queue is rejected and changes nothing.
    DequeueRejectsWhenEmpty,
    /// Mutating one queue leaves the other untouched.
    InstancesIsolated,
}

impl QueueCheck {
    /// Checks registered once per target queue, in execution order.
    pub const PER_QUEUE: [Self; 8] = [
        Self::ResetsIndices,
        Self::EnqueueStoresValue,
        Self::DequeueReturnsValue,
        Self::FullnessReporting,
        Self::EnqueueAcceptsUntilFull,
        Self::EnqueueRejectsWhenFull,
        Self::DequeueDrainsFull,
        Self::DequeueRejectsWhenEmpty,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ResetsIndices => "resets_indices",
            Self::EnqueueStoresValue => "enqueue_stores_value",
            Self::DequeueReturnsValue => "dequeue_returns_value",
            Self::FullnessReporting => "fullness_reporting",
            Self::EnqueueAcceptsUntilFull => "enqueue_accepts_until_full",
            Self::EnqueueRejectsWhenFull => "enqueue_rejects_when_full",
            Self::DequeueDrainsFull => "dequeue_drains_full",
            Self::DequeueRejectsWhenEmpty => "dequeue_rejects_when_empty",
            Self::InstancesIsolated => "instances_isolated",
        }
    }
}

/// What the `Run` phase observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observation {
    Nothing,
    Enqueued(Result<(), QueueError>),
    Dequeued(Result<u8, QueueError>),
}

/// A [`QueueCheck`] bound to its subject.
#[derive(Debug, Clone)]
pub struct QueueCase {
    check: QueueCheck,
    target: QueueId,
    label: String,
    observed: Observation,
    setup_error: Option<QueueError>,
}

impl QueueCase {
    #[must_use]
    pub fn new(check: QueueCheck, target: QueueId) -> Self {
        let label = match check {
            QueueCheck::InstancesIsolated => check.name().to_owned(),
            _ => format!("{}[{target}]", check.name()),
        };
        Self {
            check,
            target,
            label,
            observed: Observation::Nothing,
            setup_error: None,
        }
    }

    /// Wrap into the phase driver the controller understands.
    #[must_use]
    pub fn phased(check: QueueCheck, target: QueueId) -> PhasedCase<Self> {
        PhasedCase::new(Self::new(check, target))
    }

    #[must_use]
    pub fn check(&self) -> QueueCheck {
        self.check
    }

    #[must_use]
    pub fn target(&self) -> QueueId {
        self.target
    }

    fn force(&mut self, queue: &mut ByteQueue, write: usize, read: usize) {
        if let Err(err) = queue.set_indices(write, read) {
            self.setup_error.get_or_insert(err);
        }
    }

    fn expect_indices(queue: &ByteQueue, write: usize, read: usize, what: &str) -> Verdict {
        ensure(
            queue.write_index() == write && queue.read_index() == read,
            format!(
                "{what}: write={} read={}, expected write={write} read={read}",
                queue.write_index(),
                queue.read_index()
            ),
        )
    }
}

impl Scenario<QueueBench> for QueueCase {
    fn name(&self) -> &str {
        &self.label
    }

    fn prepare(&mut self, bench: &mut QueueBench) {
        self.observed = Observation::Nothing;
        self.setup_error = None;
        let queue = bench.queue_mut(self.target);
        let last = queue.slots() - 1;
        match self.check {
            QueueCheck::ResetsIndices => self.force(queue, 3, 7),
            QueueCheck::EnqueueStoresValue | QueueCheck::EnqueueRejectsWhenFull => {
                self.force(queue, 0, 0);
            }
            QueueCheck::DequeueReturnsValue => {
                self.force(queue, 1, 0);
                if let Err(err) = queue.write_slot(0, DEQUEUE_VALUE) {
                    self.setup_error.get_or_insert(err);
                }
            }
            QueueCheck::FullnessReporting => queue.init(),
            QueueCheck::EnqueueAcceptsUntilFull => self.force(queue, 5, 5),
            QueueCheck::DequeueDrainsFull | QueueCheck::DequeueRejectsWhenEmpty => {
                self.force(queue, last, 0);
            }
            QueueCheck::InstancesIsolated => {
                let last = bench.primary.slots() - 1;
                let primary_setup = bench.primary.set_indices(last, 0);
                bench.secondary.init();
                if let Err(err) = primary_setup {
                    self.setup_error.get_or_insert(err);
                }
            }
        }
    }

    fn exercise(&mut self, bench: &mut QueueBench) {
        let queue = bench.queue_mut(self.target);
        let capacity = queue.capacity();
        self.observed = match self.check {
            QueueCheck::ResetsIndices => {
                queue.init();
                Observation::Nothing
            }
            QueueCheck::EnqueueStoresValue => Observation::Enqueued(queue.enqueue(ENQUEUE_VALUE)),
            QueueCheck::DequeueReturnsValue => Observation::Dequeued(queue.dequeue()),
            QueueCheck::EnqueueAcceptsUntilFull => {
                let mut status = Ok(());
                for v in fill_values(capacity) {
                    status = queue.enqueue(v);
                    if status.is_err() {
                        break;
                    }
                }
                Observation::Enqueued(status)
            }
            QueueCheck::EnqueueRejectsWhenFull => {
                for v in fill_values(capacity) {
                    let _ = queue.enqueue(v);
                }
                Observation::Enqueued(queue.enqueue(ENQUEUE_VALUE))
            }
            QueueCheck::DequeueDrainsFull => {
                let mut status = Err(QueueError::Empty);
                for _ in 0..capacity {
                    status = queue.dequeue();
                    if status.is_err() {
                        break;
                    }
                }
                Observation::Dequeued(status)
            }
            QueueCheck::DequeueRejectsWhenEmpty => {
                for _ in 0..capacity {
                    let _ = queue.dequeue();
                }
                Observation::Dequeued(queue.dequeue())
            }
            QueueCheck::FullnessReporting | QueueCheck::InstancesIsolated => Observation::Nothing,
        };
    }

    fn verify(&mut self, bench: &mut QueueBench) -> Verdict {
        if let Some(err) = self.setup_error {
            return Err(AssertionFailure::new(format!("precondition setup failed: {err}")));
        }
        let observed = self.observed;
        let queue = bench.queue_mut(self.target);
        let last = queue.slots() - 1;
        match self.check {
            QueueCheck::ResetsIndices => {
                Self::expect_indices(queue, 0, 0, "init() didn't reset queue")?;
                ensure(queue.is_empty(), "queue not empty after init()")
            }
            QueueCheck::EnqueueStoresValue => {
                ensure(
                    observed == Observation::Enqueued(Ok(())),
                    format!("enqueue() returned {observed:?}"),
                )?;
                ensure(
                    queue.storage()[0] == ENQUEUE_VALUE,
                    format!(
                        "enqueue() wrote {} at slot 0, expected {ENQUEUE_VALUE}",
                        queue.storage()[0]
                    ),
                )?;
                Self::expect_indices(queue, 1, 0, "enqueue() didn't advance write index")?;
                ensure(queue.len() == 1, format!("queue holds {} values, expected 1", queue.len()))
            }
            QueueCheck::DequeueReturnsValue => {
                ensure(
                    observed == Observation::Dequeued(Ok(DEQUEUE_VALUE)),
                    format!("dequeue() returned {observed:?}, expected Ok({DEQUEUE_VALUE})"),
                )?;
                ensure(
                    queue.write_index() == queue.read_index(),
                    "dequeue() didn't advance read index",
                )
            }
            QueueCheck::FullnessReporting => {
                let capacity = queue.capacity();
                for v in fill_values(capacity) {
                    let _ = queue.enqueue(v);
                }
                ensure(
                    queue.is_full() && !queue.is_empty(),
                    format!(
                        "filled queue reports full={} empty={}",
                        queue.is_full(),
                        queue.is_empty()
                    ),
                )?;
                let _ = queue.dequeue();
                ensure(
                    !queue.is_full() && !queue.is_empty(),
                    format!(
                        "queue one below capacity reports full={} empty={}",
                        queue.is_full(),
                        queue.is_empty()
                    ),
                )
            }
            QueueCheck::EnqueueAcceptsUntilFull => {
                ensure(
                    observed == Observation::Enqueued(Ok(())),
                    format!("enqueue() returned {observed:?} while filling an empty queue"),
                )?;
                ensure(queue.is_full(), "queue not full after capacity enqueues")
            }
            QueueCheck::EnqueueRejectsWhenFull => {
                ensure(
                    observed == Observation::Enqueued(Err(QueueError::Full)),
                    format!("enqueue() returned {observed:?} on a full queue"),
                )?;
                Self::expect_indices(queue, last, 0, "rejected enqueue moved indices")
            }
            QueueCheck::DequeueDrainsFull => {
                ensure(
                    matches!(observed, Observation::Dequeued(Ok(_))),
                    format!("dequeue() returned {observed:?} while draining a full queue"),
                )?;
                ensure(queue.is_empty(), "queue not empty after capacity dequeues")
            }
            QueueCheck::DequeueRejectsWhenEmpty => {
                ensure(
                    observed == Observation::Dequeued(Err(QueueError::Empty)),
                    format!("dequeue() returned {observed:?} on an empty queue"),
                )?;
                Self::expect_indices(queue, last, last, "rejected dequeue moved indices")
            }
            QueueCheck::InstancesIsolated => {
                let primary = &bench.primary;
                let secondary = &bench.secondary;
                ensure(
                    primary.is_full() && !primary.is_empty(),
                    "primary queue doesn't report full",
                )?;
                ensure(
                    secondary.is_empty() && !secondary.is_full(),
                    "secondary queue doesn't report empty",
                )
            }
        }
    }
}

/// Distinct fill values for `count` enqueues, saturating at `u8::MAX`.
fn fill_values(count: usize) -> impl Iterator<Item = u8> {
    (0..count).map(|v| u8::try_from(v).unwrap_or(u8::MAX))
}

/// Build the registry described by `config`, in execution order.
#[must_use]
pub fn build_registry(config: &SuiteConfig) -> Registry<QueueBench> {
    let mut registry = Registry::new();
    for &target in &config.targets {
        for check in QueueCheck::PER_QUEUE {
            registry.push(QueueCase::phased(check, target));
        }
    }
    if config.isolation {
        registry.push(QueueCase::phased(QueueCheck::InstancesIsolated, QueueId::Primary));
    }
    registry
}

/// The 17-entry default registry.
#[must_use]
pub fn standard_registry() -> Registry<QueueBench> {
    build_registry(&SuiteConfig::default())
}
