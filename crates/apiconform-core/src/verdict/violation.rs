//! Structural violations found in a response body

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of violation - one per distinct constraint family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Primitive or structural type mismatch
    Type,
    /// Required property missing
    Required,
    /// Property not allowed by `additionalProperties`
    AdditionalProperties,
    /// Value outside the declared `enum`
    Enum,
    /// String does not satisfy the declared `format`
    Format,
    /// Any other schema constraint (bounds, patterns, combinators)
    Constraint,
    /// Body present where the response declares none
    UnexpectedBody,
    /// Body absent where the response declares a schema
    MissingBody,
    /// Content-Type not declared for the response
    ContentType,
}

impl ViolationKind {
    /// Human-readable description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Type => "type mismatch",
            Self::Required => "missing required property",
            Self::AdditionalProperties => "additional property not allowed",
            Self::Enum => "value not in enum",
            Self::Format => "format mismatch",
            Self::Constraint => "constraint violated",
            Self::UnexpectedBody => "unexpected response body",
            Self::MissingBody => "missing response body",
            Self::ContentType => "undeclared content type",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A single violation located by JSON pointer within the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    /// JSON pointer into the body; empty for the body itself
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    #[must_use]
    pub fn new(kind: ViolationKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    /// Violation of the body as a whole
    #[must_use]
    pub fn at_root(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self::new(kind, String::new(), message)
    }

    /// Printable location: the pointer, or `(root)` for the whole body
    #[must_use]
    pub fn location(&self) -> &str {
        if self.path.is_empty() {
            "(root)"
        } else {
            &self.path
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location(), self.message)
    }
}
