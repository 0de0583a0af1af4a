//! Route matching: concrete request path -> declared path template

use std::collections::HashMap;

use crate::spec::{PathItem, SpecDocument};

/// A matched path template with the parameter values extracted from the path
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub item: &'a PathItem,
    pub params: HashMap<String, String>,
}

impl RouteMatch<'_> {
    #[must_use]
    pub fn template(&self) -> &str {
        self.item.template()
    }
}

/// Find the first declared template matching `request_path`.
///
/// Query strings and fragments are ignored. When the document declares server
/// base paths, the path must start with one of them and the base is stripped
/// before matching. Templates are tried in declaration order.
#[must_use]
pub fn match_route<'a>(document: &'a SpecDocument, request_path: &str) -> Option<RouteMatch<'a>> {
    let path = strip_query(request_path);

    let candidates: Vec<&str> = if document.base_paths.is_empty() {
        vec![path]
    } else {
        document
            .base_paths
            .iter()
            .filter_map(|base| strip_base(path, base))
            .collect()
    };

    for candidate in candidates {
        for item in &document.paths {
            if let Some(params) = item.template.capture(candidate) {
                tracing::debug!(
                    path = request_path,
                    template = item.template(),
                    "route matched"
                );
                return Some(RouteMatch { item, params });
            }
        }
    }

    tracing::debug!(path = request_path, "no route matched");
    None
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Remove `base` from the front of `path` on a segment boundary.
fn strip_base<'p>(path: &'p str, base: &str) -> Option<&'p str> {
    if base.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
