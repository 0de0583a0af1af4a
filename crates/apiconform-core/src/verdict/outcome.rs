//! Typed result of evaluating one response against a spec

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Violation;

/// Endpoint a response was resolved against: status, canonical method, and
/// the matched path template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Endpoint {
    pub status: u16,
    pub method: String,
    pub route: String,
}

impl Endpoint {
    #[must_use]
    pub fn new(status: u16, method: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            status,
            method: method.into(),
            route: route.into(),
        }
    }

    /// Operation label, e.g. "GET /users/{id}"
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.route)
    }
}

/// Outcome of one evaluation.
///
/// Route, method and status failures mean the response could not be tied to
/// any declaration; `InvalidBody` means it was tied to one and broke it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Satisfied(Endpoint),
    RouteNotFound { path: String },
    MethodNotFound { method: String, route: String },
    StatusNotFound(Endpoint),
    InvalidBody {
        endpoint: Endpoint,
        violations: Vec<Violation>,
    },
}

/// Discriminant of [`Outcome`], for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Satisfied,
    RouteNotFound,
    MethodNotFound,
    StatusNotFound,
    InvalidBody,
}

impl OutcomeKind {
    /// Human-readable description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Satisfied => "Response satisfies the OpenAPI spec",
            Self::RouteNotFound => "No route in the OpenAPI spec matches the request path",
            Self::MethodNotFound => "Route does not declare the request method",
            Self::StatusNotFound => "Operation does not declare the response status",
            Self::InvalidBody => "Response body does not match the declared schema",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl Outcome {
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Satisfied(_) => OutcomeKind::Satisfied,
            Self::RouteNotFound { .. } => OutcomeKind::RouteNotFound,
            Self::MethodNotFound { .. } => OutcomeKind::MethodNotFound,
            Self::StatusNotFound(_) => OutcomeKind::StatusNotFound,
            Self::InvalidBody { .. } => OutcomeKind::InvalidBody,
        }
    }

    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied(_))
    }

    /// True when the response matched no declaration at all.
    /// These fail regardless of assertion polarity.
    #[must_use]
    pub const fn is_unmatched(&self) -> bool {
        matches!(
            self,
            Self::RouteNotFound { .. } | Self::MethodNotFound { .. } | Self::StatusNotFound(_)
        )
    }

    /// Resolved endpoint, when resolution got as far as a status
    #[must_use]
    pub const fn endpoint(&self) -> Option<&Endpoint> {
        match self {
            Self::Satisfied(e) | Self::StatusNotFound(e) => Some(e),
            Self::InvalidBody { endpoint, .. } => Some(endpoint),
            Self::RouteNotFound { .. } | Self::MethodNotFound { .. } => None,
        }
    }

    /// Matched path template, if any
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        match self {
            Self::MethodNotFound { route, .. } => Some(route.as_str()),
            other => other.endpoint().map(|e| e.route.as_str()),
        }
    }

    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidBody { violations, .. } => violations.as_slice(),
            _ => &[],
        }
    }
}
