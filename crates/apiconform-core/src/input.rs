//! Response snapshot supplied by the caller for a single evaluation

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Method and path of the request that produced the response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RequestLine {
    pub method: String,
    pub path: String,
}

/// An HTTP response plus the request line it answered.
///
/// Mirrors the `{status, req: {method, path}, body, headers}` shape so recorded
/// responses can be deserialized directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResponseInput {
    /// HTTP status code
    pub status: u16,
    /// Originating request
    pub req: RequestLine,
    /// Parsed response body (absent when the response had none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Response headers
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl ResponseInput {
    #[must_use]
    pub fn new(status: u16, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status,
            req: RequestLine {
                method: method.into(),
                path: path.into(),
            },
            body: None,
            headers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Case-insensitive header lookup
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Media type from the Content-Type header, parameters stripped and lowercased.
    #[must_use]
    pub fn content_type(&self) -> Option<String> {
        let raw = self.header("content-type")?;
        let media = raw.split(';').next().unwrap_or("").trim();
        if media.is_empty() {
            None
        } else {
            Some(media.to_ascii_lowercase())
        }
    }
}
