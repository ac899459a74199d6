#![forbid(unsafe_code)]

//! Cooperative scheduler that walks a [`Registry`] one tick at a time.
//!
//! # State machine
//!
//! ```text
//!            cursor < total
//!   ┌──────────────────────────────────────────────┐
//!   ▼                                              │
//! Init ──▶ InitWait ──ready──▶ RunWait ──logged──▶ Complete ──cursor == total──▶ Idle
//!            │  ▲                │  ▲
//!            └──┘ not ready      └──┘ run one step
//! ```
//!
//! Every call to [`Controller::tick`] performs at most one transition or one
//! call into the current case and then returns. Suspension is expressed by
//! staying in the same state; the driver calls again.
//!
//! A case that never becomes ready or never logs a verdict keeps the
//! controller in `InitWait`/`RunWait`. The controller has no timeout; bounding
//! the number of ticks is the driver's job.
//!
//! Failing cases are recorded and reported like passing ones. Nothing a case
//! does can abort the run.

use thiserror::Error;

use crate::case::CaseLog;
use crate::registry::Registry;
use crate::report::{CaseOutcome, RunReport};
use crate::sink::{LogSink, TracingSink};

/// Controller scheduling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing to do: empty registry, or every entry completed.
    Idle,
    /// Announce the entry at the cursor.
    Init,
    /// Poll the entry's `init` until it reports ready.
    InitWait,
    /// Step the entry until it logs a verdict.
    RunWait,
    /// Record the outcome and advance the cursor.
    Complete,
}

/// Reasons a controller cannot be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("no test registry was supplied")]
    MissingRegistry,
    #[error("no fixture was supplied")]
    MissingFixture,
}

/// Scheduler bound to a registry, the fixture its cases operate on, and a
/// log sink.
pub struct Controller<F, L> {
    registry: Registry<F>,
    fixture: F,
    sink: L,
    state: ControllerState,
    cursor: usize,
    verdict: Option<bool>,
    diagnostics: Vec<String>,
    outcomes: Vec<CaseOutcome>,
    ticks: u64,
}

impl<F, L: LogSink> Controller<F, L> {
    /// Bind a controller to `registry` and start at its first entry.
    ///
    /// An empty registry is valid and leaves the controller idle.
    pub fn new(registry: Registry<F>, fixture: F, sink: L) -> Self {
        let outcomes = Vec::with_capacity(registry.len());
        let mut controller = Self {
            registry,
            fixture,
            sink,
            state: ControllerState::Idle,
            cursor: 0,
            verdict: None,
            diagnostics: Vec::new(),
            outcomes,
            ticks: 0,
        };
        controller.reset();
        controller
    }

    /// Rewind to the first entry, as if freshly initialized.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.verdict = None;
        self.diagnostics.clear();
        self.outcomes.clear();
        self.ticks = 0;
        self.state = if self.registry.is_empty() {
            ControllerState::Idle
        } else {
            ControllerState::Init
        };
        tracing::debug!(total = self.registry.len(), state = ?self.state, "controller initialized");
    }

    /// Perform one bounded unit of work.
    pub fn tick(&mut self) {
        self.ticks += 1;
        let total = self.registry.len();
        match self.state {
            ControllerState::Idle => {}
            ControllerState::Init => {
                let position = self.cursor + 1;
                let name = self.registry.name_at(self.cursor).unwrap_or_default();
                self.sink.test_started(position, total, name);
                self.verdict = None;
                self.diagnostics.clear();
                self.transition(ControllerState::InitWait);
            }
            ControllerState::InitWait => {
                let Some(case) = self.registry.get_mut(self.cursor) else {
                    self.transition(ControllerState::Idle);
                    return;
                };
                if case.init(&mut self.fixture) {
                    self.transition(ControllerState::RunWait);
                } else {
                    tracing::trace!(cursor = self.cursor, "case not ready");
                }
            }
            ControllerState::RunWait => {
                if self.verdict.is_some() {
                    self.transition(ControllerState::Complete);
                    return;
                }
                let Some(case) = self.registry.get_mut(self.cursor) else {
                    self.transition(ControllerState::Idle);
                    return;
                };
                let mut log = CaseLog::new(&mut self.sink, &mut self.verdict, &mut self.diagnostics);
                case.run(&mut self.fixture, &mut log);
            }
            ControllerState::Complete => {
                let passed = self.verdict.unwrap_or(false);
                let name = self
                    .registry
                    .name_at(self.cursor)
                    .unwrap_or_default()
                    .to_owned();
                self.cursor += 1;
                self.outcomes.push(CaseOutcome {
                    position: self.cursor,
                    name,
                    passed,
                    diagnostics: std::mem::take(&mut self.diagnostics),
                });
                self.sink.test_completed(self.cursor);
                tracing::debug!(position = self.cursor, total, passed, "case completed");
                if self.cursor < total {
                    self.transition(ControllerState::Init);
                } else {
                    self.transition(ControllerState::Idle);
                    tracing::info!(
                        total,
                        failed = self.outcomes.iter().filter(|o| !o.passed).count(),
                        ticks = self.ticks,
                        "registry exhausted"
                    );
                }
            }
        }
    }

    fn transition(&mut self, next: ControllerState) {
        tracing::trace!(from = ?self.state, to = ?next, cursor = self.cursor, "controller transition");
        self.state = next;
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// `true` once there is no more work (terminal or empty registry).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == ControllerState::Idle
    }

    /// Number of completed entries.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.registry.len()
    }

    /// Whether the current entry has logged its verdict.
    #[must_use]
    pub fn result_logged(&self) -> bool {
        self.verdict.is_some()
    }

    /// Name of the entry at the cursor, if any remain.
    #[must_use]
    pub fn current_case(&self) -> Option<&str> {
        self.registry.name_at(self.cursor)
    }

    /// Ticks since the last (re)initialization.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn registry(&self) -> &Registry<F> {
        &self.registry
    }

    #[must_use]
    pub fn fixture(&self) -> &F {
        &self.fixture
    }

    #[must_use]
    pub fn sink(&self) -> &L {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut L {
        &mut self.sink
    }

    /// Snapshot of the outcomes recorded so far.
    #[must_use]
    pub fn report(&self, suite: impl Into<String>) -> RunReport {
        RunReport::new(suite, self.outcomes.clone())
    }

    pub fn into_parts(self) -> (Registry<F>, F, L) {
        (self.registry, self.fixture, self.sink)
    }
}

impl<F> Controller<F, TracingSink> {
    /// Start a [`ControllerBuilder`] logging through [`TracingSink`].
    #[must_use]
    pub fn builder() -> ControllerBuilder<F, TracingSink> {
        ControllerBuilder::new()
    }
}

/// Fallible construction that refuses to start without a registry.
pub struct ControllerBuilder<F, L> {
    registry: Option<Registry<F>>,
    fixture: Option<F>,
    sink: L,
}

impl<F> ControllerBuilder<F, TracingSink> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: None,
            fixture: None,
            sink: TracingSink,
        }
    }
}

impl<F> Default for ControllerBuilder<F, TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, L: LogSink> ControllerBuilder<F, L> {
    #[must_use]
    pub fn registry(mut self, registry: Registry<F>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn fixture(mut self, fixture: F) -> Self {
        self.fixture = Some(fixture);
        self
    }

    #[must_use]
    pub fn sink<M: LogSink>(self, sink: M) -> ControllerBuilder<F, M> {
        ControllerBuilder {
            registry: self.registry,
            fixture: self.fixture,
            sink,
        }
    }

    pub fn build(self) -> Result<Controller<F, L>, ControllerError> {
        let registry = self.registry.ok_or(ControllerError::MissingRegistry)?;
        let fixture = self.fixture.ok_or(ControllerError::MissingFixture)?;
        Ok(Controller::new(registry, fixture, self.sink))
    }
}
