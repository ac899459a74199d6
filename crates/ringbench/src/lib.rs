#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod suite;

pub use cli::run_from_env;
pub use config::RingbenchConfig;
pub use driver::{SuiteSink, drive, run_suite};
pub use error::{Result, RingbenchError};
pub use suite::{QueueBench, QueueCase, QueueCheck, QueueId, build_registry, standard_registry};
