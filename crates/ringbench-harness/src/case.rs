#![forbid(unsafe_code)]

//! Test cases as cooperative, phase-driven state machines.
//!
//! A [`TestCase`] is stepped by the controller: `init` until it reports ready,
//! then `run` once per tick until it has logged a verdict. Neither call may
//! block or loop waiting for a condition.
//!
//! Most cases share the same lifecycle, so they implement [`Scenario`] and
//! let [`PhasedCase`] walk the phases:
//!
//! ```text
//! Idle ──arm──▶ Init ──▶ Run ──▶ Verify ──▶ LogResult ──▶ Idle
//!               prepare  exercise verify    log verdict
//! ```
//!
//! One phase is executed per `run` call. After `LogResult` the case sits in
//! `Idle` and ignores further calls until it is armed again.

use thiserror::Error;

use crate::sink::LogSink;

/// Diagnostic tag used for failed checks.
pub const ERROR_TAG: &str = "ERROR";

/// A single entry the controller can drive.
///
/// `F` is the fixture owned by the controller; each case picks its own
/// subject out of it.
pub trait TestCase<F> {
    /// Stable, human-readable identifier.
    fn name(&self) -> &str;

    /// Prepare for a fresh execution.
    ///
    /// Returns `true` when the case is ready to run. `false` asks the
    /// controller to call again on a later tick.
    fn init(&mut self, fixture: &mut F) -> bool;

    /// Advance by one step. Must eventually call [`CaseLog::result`].
    fn run(&mut self, fixture: &mut F, log: &mut CaseLog<'_>);
}

/// Mismatch between an expected and an observed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of [`Scenario::verify`].
pub type Verdict = Result<(), AssertionFailure>;

/// Fail with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> Verdict {
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure::new(message))
    }
}

// =============================================================================
// CaseLog
// =============================================================================

/// Reporting handle handed to a case for the duration of one `run` call.
///
/// Forwards to the controller's sink and records the verdict so the
/// controller can tell when the case is done. Only the first verdict of an
/// execution counts.
pub struct CaseLog<'a> {
    sink: &'a mut dyn LogSink,
    verdict: &'a mut Option<bool>,
    diagnostics: &'a mut Vec<String>,
}

impl<'a> CaseLog<'a> {
    pub fn new(
        sink: &'a mut dyn LogSink,
        verdict: &'a mut Option<bool>,
        diagnostics: &'a mut Vec<String>,
    ) -> Self {
        Self {
            sink,
            verdict,
            diagnostics,
        }
    }

    /// Report the verdict of this execution.
    ///
    /// Returns `false` (and logs nothing) if a verdict was already recorded.
    pub fn result(&mut self, passed: bool) -> bool {
        if let Some(previous) = *self.verdict {
            tracing::warn!(previous, passed, "duplicate verdict ignored");
            return false;
        }
        *self.verdict = Some(passed);
        self.sink.log_result(passed);
        true
    }

    /// Emit a tagged diagnostic.
    pub fn message(&mut self, tag: &str, message: &str) {
        self.diagnostics.push(format!("[{tag}] {message}"));
        self.sink.log_message(tag, message);
    }

    /// Whether a verdict has been recorded.
    #[must_use]
    pub fn is_logged(&self) -> bool {
        self.verdict.is_some()
    }
}

// =============================================================================
// Phased cases
// =============================================================================

/// Lifecycle phase of a [`PhasedCase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CasePhase {
    /// Not armed; `run` does nothing.
    #[default]
    Idle,
    /// Establish preconditions.
    Init,
    /// Call the operation under test.
    Run,
    /// Compare against expectations.
    Verify,
    /// Report the verdict.
    LogResult,
}

/// Body of a check, split along the phases of [`CasePhase`].
pub trait Scenario<F> {
    fn name(&self) -> &str;

    /// Deferred-readiness hook, polled until it returns `true`.
    fn ready(&mut self, _fixture: &mut F) -> bool {
        true
    }

    /// `Init` phase.
    fn prepare(&mut self, _fixture: &mut F) {}

    /// `Run` phase. Checks that need interleaved calls may leave this empty
    /// and do their work in [`Scenario::verify`].
    fn exercise(&mut self, _fixture: &mut F) {}

    /// `Verify` phase.
    fn verify(&mut self, fixture: &mut F) -> Verdict;
}

/// Drives a [`Scenario`] through one phase per `run` call.
#[derive(Debug, Clone)]
pub struct PhasedCase<S> {
    scenario: S,
    phase: CasePhase,
    passed: bool,
}

impl<S> PhasedCase<S> {
    #[must_use]
    pub fn new(scenario: S) -> Self {
        Self {
            scenario,
            phase: CasePhase::Idle,
            passed: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> CasePhase {
        self.phase
    }

    #[must_use]
    pub fn scenario(&self) -> &S {
        &self.scenario
    }
}

impl<F, S: Scenario<F>> TestCase<F> for PhasedCase<S> {
    fn name(&self) -> &str {
        self.scenario.name()
    }

    fn init(&mut self, fixture: &mut F) -> bool {
        if !self.scenario.ready(fixture) {
            return false;
        }
        self.phase = CasePhase::Init;
        self.passed = false;
        true
    }

    fn run(&mut self, fixture: &mut F, log: &mut CaseLog<'_>) {
        tracing::trace!(case = self.scenario.name(), phase = ?self.phase, "case step");
        match self.phase {
            CasePhase::Idle => {}
            CasePhase::Init => {
                self.scenario.prepare(fixture);
                self.phase = CasePhase::Run;
            }
            CasePhase::Run => {
                self.scenario.exercise(fixture);
                self.phase = CasePhase::Verify;
            }
            CasePhase::Verify => {
                match self.scenario.verify(fixture) {
                    Ok(()) => self.passed = true,
                    Err(failure) => log.message(ERROR_TAG, &failure.message),
                }
                self.phase = CasePhase::LogResult;
            }
            CasePhase::LogResult => {
                log.result(self.passed);
                self.phase = CasePhase::Idle;
            }
        }
    }
}
