#![forbid(unsafe_code)]

//! Per-case outcomes and the end-of-run report.
//!
//! The controller records one [`CaseOutcome`] per completed case. A
//! [`RunReport`] totals them and renders either a fixed-width text report or
//! JSON.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::sink::verdict_label;

const RULE: &str = "----------------------------------------------------";

/// Result of one completed case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// 1-based registry position.
    pub position: usize,
    pub name: String,
    pub passed: bool,
    /// Diagnostics emitted during the execution, as `[TAG] message`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// Aggregated view of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub suite: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<CaseOutcome>,
}

impl RunReport {
    #[must_use]
    pub fn new(suite: impl Into<String>, cases: Vec<CaseOutcome>) -> Self {
        let passed = cases.iter().filter(|case| case.passed).count();
        Self {
            suite: suite.into(),
            total: cases.len(),
            passed,
            failed: cases.len() - passed,
            cases,
        }
    }

    /// `true` when every recorded case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Failing cases in execution order.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> + '_ {
        self.cases.iter().filter(|case| !case.passed)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Fixed-width text report: summary block, then one row per case with
    /// its first diagnostic as the comment.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "                   Test Report");
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "--------------------  Summary ----------------------");
        let _ = writeln!(out, "Suite: {}", self.suite);
        let _ = writeln!(out, "Total tests: {}", self.total);
        let _ = writeln!(out, "Passed: {}", self.passed);
        let _ = writeln!(out, "Failed: {}", self.failed);
        let _ = writeln!(out, "{RULE}");

        let name_width = self
            .cases
            .iter()
            .map(|case| case.name.len())
            .max()
            .unwrap_or(0)
            .max("Test".len());
        let _ = writeln!(
            out,
            "{:>4}  {:<name_width$}  {:<6}  Comment",
            "#", "Test", "Result"
        );
        let _ = writeln!(out, "{RULE}");
        for case in &self.cases {
            let comment = case.diagnostics.first().map_or("", String::as_str);
            let row = format!(
                "{:>4}  {:<name_width$}  {:<6}  {comment}",
                case.position,
                case.name,
                verdict_label(case.passed),
            );
            let _ = writeln!(out, "{}", row.trim_end());
        }
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "                   End of Report");
        let _ = writeln!(out, "{RULE}");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunReport {
        RunReport::new(
            "standard",
            vec![
                CaseOutcome {
                    position: 1,
                    name: "resets_indices[primary]".into(),
                    passed: true,
                    diagnostics: vec![],
                },
                CaseOutcome {
                    position: 2,
                    name: "enqueue_stores_value[primary]".into(),
                    passed: false,
                    diagnostics: vec!["[ERROR] slot 0 holds 0, expected 10".into()],
                },
            ],
        )
    }

    #[test]
    fn totals_are_derived_from_cases() {
        let report = sample();
        assert_eq!((report.total, report.passed, report.failed), (2, 1, 1));
        assert!(!report.all_passed());
        assert_eq!(
            report.failures().map(|c| c.position).collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn empty_report_passes() {
        let report = RunReport::new("empty", Vec::new());
        assert_eq!(report.total, 0);
        assert!(report.all_passed());
        assert!(report.render_text().contains("Total tests: 0"));
    }

    #[test]
    fn text_report_lists_each_case() {
        let text = sample().render_text();
        assert!(text.contains("Passed: 1"));
        assert!(text.contains("Failed: 1"));
        let rows: Vec<&str> = text
            .lines()
            .filter(|line| line.contains("[primary]"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].ends_with("PASS"));
        assert!(rows[1].contains("FAIL"));
        assert!(rows[1].ends_with("[ERROR] slot 0 holds 0, expected 10"));
    }

    #[test]
    fn json_omits_empty_diagnostics() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["cases"][0].get("diagnostics").is_none());
        assert_eq!(value["cases"][1]["diagnostics"][0], "[ERROR] slot 0 holds 0, expected 10");
        assert_eq!(RunReport::from_json(&json).unwrap(), sample());
    }
}
