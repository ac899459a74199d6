#![forbid(unsafe_code)]

//! Destinations for progress lines, verdicts and diagnostics.
//!
//! The controller and the running case only talk to a [`LogSink`]. What ends
//! up on a console, in a structured log or in memory is the sink's business.
//!
//! | Sink            | Output |
//! |-----------------|--------|
//! | [`ConsoleSink`] | `Executing test number: 1 of 17` style lines on any [`Write`] |
//! | [`TracingSink`] | `tracing` events under the `ringbench::suite` target |
//! | [`MemorySink`]  | [`SinkEvent`] list, for assertions |

use std::io::{self, Write};

/// Receiver of everything a test run reports.
pub trait LogSink {
    /// A test is about to start (`position` is 1-based).
    fn test_started(&mut self, position: usize, total: usize, name: &str);

    /// The verdict of the running test. Called once per execution.
    fn log_result(&mut self, passed: bool);

    /// A tagged diagnostic, typically emitted on a failed check.
    fn log_message(&mut self, tag: &str, message: &str);

    /// The test at `position` finished.
    fn test_completed(&mut self, position: usize);
}

impl<L: LogSink + ?Sized> LogSink for &mut L {
    fn test_started(&mut self, position: usize, total: usize, name: &str) {
        (**self).test_started(position, total, name);
    }

    fn log_result(&mut self, passed: bool) {
        (**self).log_result(passed);
    }

    fn log_message(&mut self, tag: &str, message: &str) {
        (**self).log_message(tag, message);
    }

    fn test_completed(&mut self, position: usize) {
        (**self).test_completed(position);
    }
}

impl<L: LogSink + ?Sized> LogSink for Box<L> {
    fn test_started(&mut self, position: usize, total: usize, name: &str) {
        (**self).test_started(position, total, name);
    }

    fn log_result(&mut self, passed: bool) {
        (**self).log_result(passed);
    }

    fn log_message(&mut self, tag: &str, message: &str) {
        (**self).log_message(tag, message);
    }

    fn test_completed(&mut self, position: usize) {
        (**self).test_completed(position);
    }
}

/// Verdict label used by every human-readable output.
#[must_use]
pub const fn verdict_label(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

// =============================================================================
// ConsoleSink
// =============================================================================

/// Line-oriented sink writing the classic console transcript.
///
/// Write errors never interrupt a run. The first one is kept and can be
/// collected with [`ConsoleSink::take_error`] once the run is over.
pub struct ConsoleSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// First write error seen so far, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        let result = self
            .writer
            .write_fmt(args)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }
}

impl ConsoleSink<io::Stdout> {
    /// Console sink on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> LogSink for ConsoleSink<W> {
    fn test_started(&mut self, position: usize, total: usize, name: &str) {
        self.line(format_args!(
            "Executing test number: {position} of {total} ({name})"
        ));
    }

    fn log_result(&mut self, passed: bool) {
        self.line(format_args!("Test Result: {}", verdict_label(passed)));
    }

    fn log_message(&mut self, tag: &str, message: &str) {
        self.line(format_args!("[{tag}] {message}"));
    }

    fn test_completed(&mut self, position: usize) {
        self.line(format_args!("Test {position} completed"));
    }
}

// =============================================================================
// TracingSink
// =============================================================================

/// Sink that turns every report into a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn test_started(&mut self, position: usize, total: usize, name: &str) {
        tracing::info!(target: "ringbench::suite", position, total, name, "executing test");
    }

    fn log_result(&mut self, passed: bool) {
        if passed {
            tracing::info!(target: "ringbench::suite", verdict = "PASS", "test result");
        } else {
            tracing::warn!(target: "ringbench::suite", verdict = "FAIL", "test result");
        }
    }

    fn log_message(&mut self, tag: &str, message: &str) {
        tracing::warn!(target: "ringbench::suite", tag, "{message}");
    }

    fn test_completed(&mut self, position: usize) {
        tracing::info!(target: "ringbench::suite", position, "test completed");
    }
}

// =============================================================================
// MemorySink
// =============================================================================

/// One report captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Started {
        position: usize,
        total: usize,
        name: String,
    },
    Result {
        passed: bool,
    },
    Message {
        tag: String,
        message: String,
    },
    Completed {
        position: usize,
    },
}

/// Sink that keeps every event in order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<SinkEvent>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Verdicts in the order they were logged.
    #[must_use]
    pub fn verdicts(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Result { passed } => Some(*passed),
                _ => None,
            })
            .collect()
    }

    /// Diagnostics as `(tag, message)` pairs.
    #[must_use]
    pub fn messages(&self) -> Vec<(&str, &str)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Message { tag, message } => Some((tag.as_str(), message.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Positions reported as completed.
    #[must_use]
    pub fn completed(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Completed { position } => Some(*position),
                _ => None,
            })
            .collect()
    }

    /// Forget everything captured so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl LogSink for MemorySink {
    fn test_started(&mut self, position: usize, total: usize, name: &str) {
        self.events.push(SinkEvent::Started {
            position,
            total,
            name: name.to_owned(),
        });
    }

    fn log_result(&mut self, passed: bool) {
        self.events.push(SinkEvent::Result { passed });
    }

    fn log_message(&mut self, tag: &str, message: &str) {
        self.events.push(SinkEvent::Message {
            tag: tag.to_owned(),
            message: message.to_owned(),
        });
    }

    fn test_completed(&mut self, position: usize) {
        self.events.push(SinkEvent::Completed { position });
    }
}
