//! Serializable check reports
//!
//! `CheckSummary` is the JSON interchange format emitted by `apiconform check
//! --output json`; its JSON Schema is exported with [`generate_schema`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::input::ResponseInput;
use crate::verdict::{Outcome, OutcomeKind, Verdict, VerdictStatus, Violation};

/// Result of checking one recorded response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckReport {
    /// Where the response came from, e.g. "responses.json#2"
    pub source: String,
    /// Response status code
    pub status: u16,
    /// Request method as sent
    pub method: String,
    /// Request path as sent
    pub path: String,
    /// Matched path template, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    pub outcome: OutcomeKind,
    pub verdict: VerdictStatus,
    /// Failure message, present whenever the verdict is a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Body violations (invalid_body outcomes only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl CheckReport {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        input: &ResponseInput,
        outcome: &Outcome,
        verdict: Verdict,
    ) -> Self {
        Self {
            source: source.into(),
            status: input.status,
            method: input.req.method.clone(),
            path: input.req.path.clone(),
            route: outcome.route().map(str::to_string),
            outcome: outcome.kind(),
            verdict: verdict.status,
            message: verdict.message,
            violations: outcome.violations().to_vec(),
        }
    }
}

/// Aggregate of a whole `check` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckSummary {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub reports: Vec<CheckReport>,
}

impl CheckSummary {
    #[must_use]
    pub fn from_reports(reports: Vec<CheckReport>) -> Self {
        let total = reports.len() as u64;
        let passed = reports
            .iter()
            .filter(|r| r.verdict == VerdictStatus::Pass)
            .count() as u64;
        Self {
            total,
            passed,
            failed: total - passed,
            reports,
        }
    }

    /// Overall status: pass only if every report passed
    #[must_use]
    pub fn status(&self) -> VerdictStatus {
        if self.failed == 0 {
            VerdictStatus::Pass
        } else {
            VerdictStatus::Fail
        }
    }
}

/// Generate JSON Schema for the interchange format
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(CheckSummary);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
