//! Message rendering for evaluation outcomes
//!
//! Every sentence here is part of the user-facing contract and is rendered
//! deterministically from the outcome alone.

use crate::verdict::{Endpoint, Outcome, Violation};

/// `No '<path>' route defined in OpenAPI spec`
#[must_use]
pub fn route_not_found(path: &str) -> String {
    format!("No '{path}' route defined in OpenAPI spec")
}

/// `No '<METHOD>' method defined for route '<template>' in OpenAPI spec`
#[must_use]
pub fn method_not_found(method: &str, route: &str) -> String {
    format!("No '{method}' method defined for route '{route}' in OpenAPI spec")
}

/// `No '<status>' response defined for endpoint '<METHOD> <template>' in OpenAPI spec`
#[must_use]
pub fn status_not_found(endpoint: &Endpoint) -> String {
    format!(
        "No '{}' response defined for endpoint '{}' in OpenAPI spec",
        endpoint.status,
        endpoint.label()
    )
}

/// Sentence naming the declaration a response was expected to satisfy
#[must_use]
pub fn satisfied(endpoint: &Endpoint) -> String {
    format!(
        "expected res to satisfy API spec for '{}' response defined for endpoint '{}' in OpenAPI spec",
        endpoint.status,
        endpoint.label()
    )
}

/// Failure sentence for a negated assertion on a conforming response
#[must_use]
pub fn negated_satisfied(endpoint: &Endpoint) -> String {
    format!(
        "expected res not to satisfy API spec for '{}' response defined for endpoint '{}' in OpenAPI spec",
        endpoint.status,
        endpoint.label()
    )
}

/// Body mismatch: header line, one line per violation, then the declaration.
#[must_use]
pub fn invalid_body(endpoint: &Endpoint, violations: &[Violation]) -> String {
    let mut out = String::from("The response was not valid.");
    for v in violations {
        out.push_str("\n  - ");
        out.push_str(&v.to_string());
    }
    out.push_str("\n\n");
    out.push_str(&satisfied(endpoint));
    out
}

/// Describe the discrepancy an outcome represents. `None` when satisfied.
#[must_use]
pub fn describe(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Satisfied(_) => None,
        Outcome::RouteNotFound { path } => Some(route_not_found(path)),
        Outcome::MethodNotFound { method, route } => Some(method_not_found(method, route)),
        Outcome::StatusNotFound(endpoint) => Some(status_not_found(endpoint)),
        Outcome::InvalidBody {
            endpoint,
            violations,
        } => Some(invalid_body(endpoint, violations)),
    }
}
