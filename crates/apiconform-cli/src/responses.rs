//! Recorded response files: one response object, or an array of them

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use apiconform_core::ResponseInput;

/// A response read from disk, labelled with where it came from
#[derive(Debug)]
pub struct Recorded {
    pub source: String,
    pub input: ResponseInput,
}

/// Read every response in `path`.
///
/// A top-level array yields one entry per element, labelled `file#index`.
pub fn read_file(path: &Path) -> Result<Vec<Recorded>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing {} as JSON", path.display()))?;
    let name = path.display().to_string();

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                let source = format!("{name}#{idx}");
                let input = serde_json::from_value(item)
                    .with_context(|| format!("{source}: not a response object"))?;
                Ok(Recorded { source, input })
            })
            .collect(),
        Value::Object(_) => {
            let input = serde_json::from_value(value)
                .with_context(|| format!("{name}: not a response object"))?;
            Ok(vec![Recorded {
                source: name,
                input,
            }])
        }
        _ => bail!("{name}: expected a response object or an array of them"),
    }
}
