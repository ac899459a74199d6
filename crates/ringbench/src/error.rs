#![forbid(unsafe_code)]

//! Error type for the `ringbench` binary and its exit codes.

use ringbench_harness::ControllerError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RingbenchError>;

#[derive(Debug, Error)]
pub enum RingbenchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {}", errors.join("; "))]
    InvalidConfig { errors: Vec<String> },

    #[error("controller configuration error: {0}")]
    Controller(#[from] ControllerError),

    #[error("tick budget of {ticks} exhausted at test {position} of {total}")]
    TickBudgetExhausted {
        ticks: u64,
        position: usize,
        total: usize,
    },

    #[error("logging setup failed: {message}")]
    Logging { message: String },
}

impl RingbenchError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Toml(_) | Self::InvalidConfig { .. } | Self::Controller(_) => 2,
            Self::TickBudgetExhausted { .. } => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}
