#![forbid(unsafe_code)]

//! Run configuration loaded from TOML.
//!
//! ```toml
//! # ringbench.toml
//! [suite]
//! name = "standard"
//! targets = ["primary", "secondary"]
//! isolation = true
//!
//! [driver]
//! max_ticks = 100000
//!
//! [log]
//! level = "info"
//! format = "text"   # or "json"
//! sink = "console"  # or "tracing"
//! ```
//!
//! Every field has a default, so an empty file (or no file) runs the
//! standard 17-entry suite.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RingbenchError};
use crate::suite::QueueId;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingbenchConfig {
    pub suite: SuiteConfig,
    pub driver: DriverConfig,
    pub log: LogConfig,
}

impl RingbenchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Check every section. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        self.suite.validate(&mut errors);
        self.driver.validate(&mut errors);
        self.log.validate(&mut errors);
        errors
    }

    /// [`RingbenchConfig::validate`] as a `Result`.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(RingbenchError::InvalidConfig { errors })
        }
    }
}

/// Which entries make up the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Label carried into the run report.
    pub name: String,
    /// Queues that receive the per-queue checks, in execution order.
    pub targets: Vec<QueueId>,
    /// Append the cross-instance isolation check.
    pub isolation: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            name: "standard".to_owned(),
            targets: vec![QueueId::Primary, QueueId::Secondary],
            isolation: true,
        }
    }
}

impl SuiteConfig {
    fn validate(&self, errors: &mut Vec<String>) {
        if self.name.trim().is_empty() {
            errors.push("suite.name must not be empty".to_owned());
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target) {
                errors.push(format!("suite.targets lists {target} more than once"));
            }
        }
    }
}

/// Driver loop limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Ticks allowed before the driver gives up on a stalled run.
    pub max_ticks: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { max_ticks: 100_000 }
    }
}

impl DriverConfig {
    fn validate(&self, errors: &mut Vec<String>) {
        if self.max_ticks == 0 {
            errors.push("driver.max_ticks must be at least 1".to_owned());
        }
    }
}

/// Encoding of internal diagnostics on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where progress lines and verdicts go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Classic transcript on stdout.
    #[default]
    Console,
    /// Structured events through the tracing subscriber.
    Tracing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive used when `RINGBENCH_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    pub sink: SinkKind,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
            sink: SinkKind::Console,
        }
    }
}

impl LogConfig {
    fn validate(&self, errors: &mut Vec<String>) {
        if self.level.parse::<tracing::Level>().is_err() {
            errors.push(format!(
                "log.level {:?} is not one of trace, debug, info, warn, error",
                self.level
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = RingbenchConfig::from_toml_str("").unwrap();
        assert_eq!(config, RingbenchConfig::default());
        assert!(config.validate().is_empty());
        assert_eq!(config.suite.targets, vec![QueueId::Primary, QueueId::Secondary]);
        assert!(config.suite.isolation);
        assert_eq!(config.driver.max_ticks, 100_000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = RingbenchConfig::from_toml_str(
            r#"
            [suite]
            targets = ["secondary"]

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.suite.targets, vec![QueueId::Secondary]);
        assert!(config.suite.isolation);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.sink, SinkKind::Console);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RingbenchConfig::from_toml_str("[suite]\nparallel = true\n").unwrap_err();
        assert!(matches!(err, RingbenchError::Toml(_)));
    }

    #[test]
    fn unknown_queue_is_rejected() {
        let err = RingbenchConfig::from_toml_str("[suite]\ntargets = [\"tertiary\"]\n").unwrap_err();
        assert!(matches!(err, RingbenchError::Toml(_)));
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut config = RingbenchConfig::default();
        config.suite.name = " ".into();
        config.suite.targets = vec![QueueId::Primary, QueueId::Primary];
        config.driver.max_ticks = 0;
        config.log.level = "loud".into();

        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        let err = config.validated().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("driver.max_ticks"));
    }

    #[test]
    fn empty_target_list_is_valid() {
        let config = RingbenchConfig::from_toml_str("[suite]\ntargets = []\nisolation = false\n")
            .unwrap()
            .validated()
            .unwrap();
        assert!(config.suite.targets.is_empty());
    }
}
