//! Reusable validation handle over one loaded spec

use std::path::Path;
use std::sync::Arc;

use apiconform_core::{Config, Endpoint, Outcome, Polarity, ResponseInput, Verdict, judge};

use crate::error::SpecError;
use crate::resolve::{MatchResult, resolve};
use crate::route::match_route;
use crate::spec::{IndexOptions, SpecDocument, load_spec};
use crate::validate::{ValidationOutcome, validate};

/// Immutable, cheaply cloneable handle. Safe to share across threads; every
/// evaluation reads the index and nothing else.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    document: Arc<SpecDocument>,
}

impl ResponseValidator {
    #[must_use]
    pub fn new(document: SpecDocument) -> Self {
        Self::from_shared(Arc::new(document))
    }

    #[must_use]
    pub const fn from_shared(document: Arc<SpecDocument>) -> Self {
        Self { document }
    }

    /// Load and index the spec file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when the file is unreadable, unparsable, or
    /// structurally malformed.
    pub fn from_path(path: &Path, options: IndexOptions) -> Result<Self, SpecError> {
        let raw = load_spec(path)?;
        Ok(Self::new(SpecDocument::build_with(&raw, options)?))
    }

    /// Load the spec named by `config`, honouring its index options.
    ///
    /// # Errors
    ///
    /// See [`ResponseValidator::from_path`].
    pub fn from_config(config: &Config) -> Result<Self, SpecError> {
        Self::from_path(&config.spec, IndexOptions::from(config))
    }

    #[must_use]
    pub fn document(&self) -> &SpecDocument {
        &self.document
    }

    /// Evaluate one response. Never fails: every discrepancy is an outcome.
    #[must_use]
    pub fn evaluate(&self, response: &ResponseInput) -> Outcome {
        let path = response.req.path.as_str();
        let content_type = response.content_type();
        let route = match_route(&self.document, path);

        let resolved = match resolve(
            route,
            &response.req.method,
            response.status,
            content_type.as_deref(),
        ) {
            MatchResult::RouteNotFound => {
                return Outcome::RouteNotFound {
                    path: path.to_string(),
                };
            }
            MatchResult::MethodNotFound { route, method } => {
                return Outcome::MethodNotFound {
                    method,
                    route: route.template().to_string(),
                };
            }
            MatchResult::StatusNotFound { route, method } => {
                return Outcome::StatusNotFound(Endpoint::new(
                    response.status,
                    method.as_str(),
                    route.template(),
                ));
            }
            MatchResult::Matched(resolved) => resolved,
        };

        let endpoint = Endpoint::new(
            resolved.status,
            resolved.method.as_str(),
            resolved.route.template(),
        );
        match validate(&resolved.body, response.body.as_ref()) {
            ValidationOutcome::Valid => Outcome::Satisfied(endpoint),
            ValidationOutcome::Invalid { errors } => {
                tracing::debug!(
                    endpoint = %endpoint.label(),
                    violations = errors.len(),
                    "body failed validation"
                );
                Outcome::InvalidBody {
                    endpoint,
                    violations: errors,
                }
            }
        }
    }

    /// Evaluate and judge under `polarity`.
    #[must_use]
    pub fn assert(&self, response: &ResponseInput, polarity: Polarity) -> Verdict {
        judge(&self.evaluate(response), polarity)
    }
}
