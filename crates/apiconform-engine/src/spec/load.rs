//! Spec file loading - JSON or YAML into a raw document

use std::path::Path;

use serde_json::Value;

use crate::error::SpecError;

/// Read and parse a spec file into a raw document.
///
/// # Errors
///
/// Returns [`SpecError::Io`] if the file cannot be read and
/// [`SpecError::Parse`] if it is neither valid JSON nor YAML.
pub fn load_spec(path: &Path) -> Result<Value, SpecError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SpecError::Io(path.to_path_buf(), e.to_string()))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "read spec file");
    parse_spec(path, &content)
}

/// Parse an OpenAPI spec from JSON or YAML.
///
/// Detection strategy: try extension first (`.yaml`/`.yml`), then fall back to
/// content sniffing (leading `{` → JSON, otherwise YAML).
///
/// # Errors
///
/// Returns [`SpecError::Parse`] if the content is not valid in the detected format.
pub fn parse_spec(path: &Path, content: &str) -> Result<Value, SpecError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "yaml" | "yml" => parse_yaml(content),
        "json" => parse_json(content),
        _ => {
            if content.trim_start().starts_with('{') {
                parse_json(content)
            } else {
                parse_yaml(content)
            }
        }
    }
}

fn parse_json(content: &str) -> Result<Value, SpecError> {
    serde_json::from_str(content).map_err(|e| SpecError::Parse(format!("Invalid JSON: {e}")))
}

fn parse_yaml(content: &str) -> Result<Value, SpecError> {
    serde_yml::from_str(content).map_err(|e| SpecError::Parse(format!("Invalid YAML: {e}")))
}
