//! Response resolution: (route, method, status, content-type) -> body expectation

use std::collections::HashMap;

use crate::route::RouteMatch;
use crate::spec::{CompiledSchema, HttpMethod, MediaTypeSpec, PathItem, ResponseSpec, StatusKey};

/// What the resolved response requires of the body
#[derive(Debug, Clone)]
pub enum BodyExpectation<'a> {
    /// The response declares no content
    Empty,
    /// Content declared without a schema: any body is acceptable
    Any,
    /// Body must satisfy this schema
    Schema {
        media_type: &'a str,
        schema: &'a CompiledSchema,
    },
    /// The response's Content-Type is not among the declared media types
    UndeclaredMediaType {
        actual: String,
        declared: Vec<String>,
    },
}

/// A fully resolved (route, method, status) declaration
#[derive(Debug, Clone)]
pub struct ResolvedResponse<'a> {
    pub route: &'a PathItem,
    pub params: HashMap<String, String>,
    pub method: HttpMethod,
    pub status: u16,
    /// The `responses` key that covered `status`
    pub status_key: &'a StatusKey,
    pub response: &'a ResponseSpec,
    pub body: BodyExpectation<'a>,
}

/// Layered lookup result. Each failure variant is distinct and stops the walk.
#[derive(Debug, Clone)]
pub enum MatchResult<'a> {
    RouteNotFound,
    MethodNotFound {
        route: &'a PathItem,
        /// Request method, upper-cased
        method: String,
    },
    StatusNotFound {
        route: &'a PathItem,
        method: HttpMethod,
    },
    Matched(ResolvedResponse<'a>),
}

/// Walk route → method → status → content type.
#[must_use]
pub fn resolve<'a>(
    route: Option<RouteMatch<'a>>,
    method: &str,
    status: u16,
    content_type: Option<&str>,
) -> MatchResult<'a> {
    let Some(RouteMatch { item, params }) = route else {
        return MatchResult::RouteNotFound;
    };

    let Some((method, operation)) =
        HttpMethod::parse(method).and_then(|m| item.operation(m).map(|op| (m, op)))
    else {
        tracing::debug!(route = item.template(), method, "method not declared");
        return MatchResult::MethodNotFound {
            route: item,
            method: method.trim().to_ascii_uppercase(),
        };
    };

    let Some((status_key, response)) = operation.response_for(status) else {
        tracing::debug!(route = item.template(), %method, status, "status not declared");
        return MatchResult::StatusNotFound {
            route: item,
            method,
        };
    };

    tracing::debug!(
        route = item.template(),
        %method,
        status,
        key = %status_key,
        "response resolved"
    );

    MatchResult::Matched(ResolvedResponse {
        route: item,
        params,
        method,
        status,
        status_key,
        response,
        body: body_expectation(response, content_type),
    })
}

/// Select the schema for the response's content type.
///
/// With a Content-Type: exact media type, then `type/*`, then `*/*`.
/// Without one: the only declared media type, else `application/json`, else the first.
fn body_expectation<'a>(
    response: &'a ResponseSpec,
    content_type: Option<&str>,
) -> BodyExpectation<'a> {
    let Some(content) = &response.content else {
        return BodyExpectation::Empty;
    };
    if content.is_empty() {
        return BodyExpectation::Any;
    }

    let selected = match content_type {
        Some(actual) => {
            let actual = actual.to_ascii_lowercase();
            let Some(media) = select_media(content, &actual) else {
                return BodyExpectation::UndeclaredMediaType {
                    actual,
                    declared: content.iter().map(|m| m.media_type.clone()).collect(),
                };
            };
            media
        }
        None => match default_media(content) {
            Some(media) => media,
            None => return BodyExpectation::Any,
        },
    };

    match &selected.schema {
        Some(schema) => BodyExpectation::Schema {
            media_type: &selected.media_type,
            schema,
        },
        None => BodyExpectation::Any,
    }
}

fn select_media<'a>(content: &'a [MediaTypeSpec], actual: &str) -> Option<&'a MediaTypeSpec> {
    let main_type = actual.split('/').next().unwrap_or("");
    let range = format!("{main_type}/*");
    content
        .iter()
        .find(|m| m.media_type == actual)
        .or_else(|| content.iter().find(|m| m.media_type == range))
        .or_else(|| content.iter().find(|m| m.media_type == "*/*"))
}

fn default_media(content: &[MediaTypeSpec]) -> Option<&MediaTypeSpec> {
    content
        .iter()
        .find(|m| m.media_type == "application/json")
        .or_else(|| content.first())
}
