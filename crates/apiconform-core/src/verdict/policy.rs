//! Verdict policy - applies assertion polarity to an outcome

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Outcome;
use crate::message;

/// Assertion polarity: `satisfies` or `does not satisfy`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    #[default]
    Positive,
    Negated,
}

impl Polarity {
    #[must_use]
    pub const fn from_negated(negated: bool) -> Self {
        if negated { Self::Negated } else { Self::Positive }
    }

    #[must_use]
    pub const fn is_negated(self) -> bool {
        matches!(self, Self::Negated)
    }
}

/// Pass or fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Final verdict of one assertion. A failing verdict always carries its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub message: Option<String>,
}

impl Verdict {
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            status: VerdictStatus::Pass,
            message: None,
        }
    }

    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Fail,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self.status, VerdictStatus::Pass)
    }

    /// Process exit code: 0 on pass, 1 on fail
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self.status {
            VerdictStatus::Pass => 0,
            VerdictStatus::Fail => 1,
        }
    }
}

/// Judge an outcome under the given polarity.
///
/// Route, method and status failures fail in both polarities with the same
/// message. A body mismatch fails only a positive assertion; a satisfied
/// response fails only a negated one.
#[must_use]
pub fn judge(outcome: &Outcome, polarity: Polarity) -> Verdict {
    match (outcome, polarity) {
        (Outcome::Satisfied(_), Polarity::Positive) => Verdict::pass(),
        (Outcome::Satisfied(endpoint), Polarity::Negated) => {
            Verdict::fail(message::negated_satisfied(endpoint))
        }
        (Outcome::InvalidBody { .. }, Polarity::Negated) => Verdict::pass(),
        (unmatched_or_invalid, _) => match message::describe(unmatched_or_invalid) {
            Some(msg) => Verdict::fail(msg),
            None => Verdict::pass(),
        },
    }
}
