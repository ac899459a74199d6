#![forbid(unsafe_code)]

//! Cooperative, non-blocking test controller.
//!
//! A [`Controller`] walks an ordered [`Registry`] of [`TestCase`]s, stepping
//! the current case once per [`Controller::tick`]. Cases are small state
//! machines ([`PhasedCase`] over a [`Scenario`]) that report their verdict
//! through a [`LogSink`]. The controller records a [`CaseOutcome`] per case
//! and can summarize the run as a [`RunReport`].
//!
//! # Example
//!
//! ```
//! use ringbench_harness::{
//!     Controller, MemorySink, PhasedCase, Registry, Scenario, Verdict, ensure,
//! };
//!
//! struct Doubles;
//!
//! impl Scenario<u32> for Doubles {
//!     fn name(&self) -> &str {
//!         "doubles"
//!     }
//!     fn prepare(&mut self, n: &mut u32) {
//!         *n = 21;
//!     }
//!     fn exercise(&mut self, n: &mut u32) {
//!         *n *= 2;
//!     }
//!     fn verify(&mut self, n: &mut u32) -> Verdict {
//!         ensure(*n == 42, "wrong answer")
//!     }
//! }
//!
//! let registry = Registry::new().with(PhasedCase::new(Doubles));
//! let mut controller = Controller::new(registry, 0u32, MemorySink::new());
//! while !controller.is_finished() {
//!     controller.tick();
//! }
//! assert_eq!(controller.sink().verdicts(), vec![true]);
//! ```

pub mod case;
pub mod controller;
pub mod registry;
pub mod report;
pub mod sink;

pub use case::{
    AssertionFailure, CaseLog, CasePhase, ERROR_TAG, PhasedCase, Scenario, TestCase, Verdict,
    ensure,
};
pub use controller::{Controller, ControllerBuilder, ControllerError, ControllerState};
pub use registry::Registry;
pub use report::{CaseOutcome, RunReport};
pub use sink::{ConsoleSink, LogSink, MemorySink, SinkEvent, TracingSink, verdict_label};
