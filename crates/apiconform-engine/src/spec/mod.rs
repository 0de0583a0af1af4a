//! Normalized OpenAPI document: path templates, operations, responses
//!
//! Built once from a raw `serde_json::Value`, then shared read-only by every
//! evaluation.

mod build;
mod load;
mod refs;
mod status;
mod template;

use std::sync::Arc;

use serde_json::Value;

pub use build::IndexOptions;
pub use load::{load_spec, parse_spec};
pub use status::StatusKey;
pub use template::PathTemplate;

/// HTTP methods an OpenAPI path item can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Case-insensitive parse
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    /// Canonical (upper case) name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response schema compiled for validation
#[derive(Clone)]
pub struct CompiledSchema {
    source: Value,
    validator: Arc<jsonschema::Validator>,
}

impl CompiledSchema {
    /// Schema as declared, after dialect normalization; `$ref`s left in place
    #[must_use]
    pub fn source(&self) -> &Value {
        &self.source
    }

    pub(crate) fn validator(&self) -> &jsonschema::Validator {
        &self.validator
    }
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// One declared media type of a response
#[derive(Debug, Clone)]
pub struct MediaTypeSpec {
    /// Lowercased, parameters stripped
    pub media_type: String,
    /// `None` when the media type declares no schema
    pub schema: Option<CompiledSchema>,
}

/// A response definition. `content: None` means the response declares no body.
#[derive(Debug, Clone)]
pub struct ResponseSpec {
    pub description: Option<String>,
    pub content: Option<Vec<MediaTypeSpec>>,
}

impl ResponseSpec {
    /// Declared media types, in declaration order
    pub fn media_types(&self) -> impl Iterator<Item = &str> {
        self.content
            .iter()
            .flatten()
            .map(|m| m.media_type.as_str())
    }
}

/// Responses of one operation, in declaration order
#[derive(Debug, Clone, Default)]
pub struct OperationSpec {
    pub responses: Vec<(StatusKey, ResponseSpec)>,
}

impl OperationSpec {
    /// Find the response for `status`: exact code, then the most specific
    /// class (declaration order among equals), then `default`.
    #[must_use]
    pub fn response_for(&self, status: u16) -> Option<(&StatusKey, &ResponseSpec)> {
        self.responses
            .iter()
            .filter(|(key, _)| key.covers(status))
            .min_by_key(|(key, _)| key.precedence())
            .map(|(key, response)| (key, response))
    }
}

/// A path template and the operations declared on it
#[derive(Debug, Clone)]
pub struct PathItem {
    pub template: PathTemplate,
    pub operations: Vec<(HttpMethod, OperationSpec)>,
}

impl PathItem {
    #[must_use]
    pub fn template(&self) -> &str {
        self.template.as_str()
    }

    #[must_use]
    pub fn operation(&self, method: HttpMethod) -> Option<&OperationSpec> {
        self.operations
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, op)| op)
    }
}

/// Normalized, immutable specification
#[derive(Debug, Clone)]
pub struct SpecDocument {
    pub openapi: String,
    /// Path components of `servers` URLs; empty string is the root
    pub base_paths: Vec<String>,
    pub paths: Vec<PathItem>,
}
