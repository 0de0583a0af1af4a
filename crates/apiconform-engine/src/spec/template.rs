//! Path templates compiled into matchable segments

use std::collections::{HashMap, HashSet};

/// One `/`-delimited piece of a template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `{name}`: any single non-empty segment
    Param(String),
    /// `prefix{name}suffix`, e.g. `{file}.json`
    Affixed {
        prefix: String,
        name: String,
        suffix: String,
    },
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, String> {
        let Some(open) = raw.find('{') else {
            if raw.contains('}') {
                return Err(format!("unbalanced '}}' in segment '{raw}'"));
            }
            return Ok(Self::Literal(raw.to_string()));
        };
        let close = raw[open..]
            .find('}')
            .map(|i| open + i)
            .ok_or_else(|| format!("unclosed '{{' in segment '{raw}'"))?;
        let name = &raw[open + 1..close];
        if name.is_empty() {
            return Err(format!("empty parameter name in segment '{raw}'"));
        }
        if name.contains('{') {
            return Err(format!("nested '{{' in segment '{raw}'"));
        }
        let prefix = &raw[..open];
        let suffix = &raw[close + 1..];
        if prefix.contains('}') {
            return Err(format!("unbalanced '}}' in segment '{raw}'"));
        }
        if suffix.contains('{') || suffix.contains('}') {
            return Err(format!("more than one parameter in segment '{raw}'"));
        }
        if prefix.is_empty() && suffix.is_empty() {
            Ok(Self::Param(name.to_string()))
        } else {
            Ok(Self::Affixed {
                prefix: prefix.to_string(),
                name: name.to_string(),
                suffix: suffix.to_string(),
            })
        }
    }

    /// Match one concrete segment, returning the captured parameter if any.
    fn capture<'s>(&self, actual: &'s str) -> Option<Option<(&str, &'s str)>> {
        match self {
            Self::Literal(lit) => (lit == actual).then_some(None),
            Self::Param(name) => (!actual.is_empty()).then_some(Some((name.as_str(), actual))),
            Self::Affixed {
                prefix,
                name,
                suffix,
            } => {
                let middle = actual.strip_prefix(prefix.as_str())?;
                let value = middle.strip_suffix(suffix.as_str())?;
                (!value.is_empty()).then_some(Some((name.as_str(), value)))
            }
        }
    }
}

/// A compiled OpenAPI path template such as `/users/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a template. Trailing slashes are not significant.
    ///
    /// # Errors
    ///
    /// Returns the reason the template is structurally invalid.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if !raw.starts_with('/') {
            return Err("path template must start with '/'".to_string());
        }
        let mut segments = Vec::new();
        let mut names = HashSet::new();
        for piece in split_segments(raw) {
            let segment = Segment::parse(piece)?;
            if let Segment::Param(name) | Segment::Affixed { name, .. } = &segment {
                if !names.insert(name.clone()) {
                    return Err(format!("parameter '{name}' appears more than once"));
                }
            }
            segments.push(segment);
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Template as declared in the document
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the template's parameters, in order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) | Segment::Affixed { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a concrete path (no query string), extracting parameter values.
    #[must_use]
    pub fn capture(&self, path: &str) -> Option<HashMap<String, String>> {
        let actual: Vec<&str> = split_segments(path).collect();
        if actual.len() != self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, value) in self.segments.iter().zip(actual) {
            if let Some((name, captured)) = segment.capture(value)? {
                params.insert(name.to_string(), captured.to_string());
            }
        }
        Some(params)
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a path into segments, ignoring the leading and any trailing slashes.
/// Interior empty segments (`/a//b`) are kept so they never match a parameter.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.trim_end_matches('/');
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}
