//! Validating construction of a [`SpecDocument`] from a raw document

use std::sync::Arc;

use serde_json::{Map, Value};
use url::Url;

use super::refs::{check_refs, deref, rewrite_nullable, with_components};
use super::{
    CompiledSchema, HttpMethod, MediaTypeSpec, OperationSpec, PathItem, PathTemplate,
    ResponseSpec, SpecDocument, StatusKey,
};
use crate::error::SpecError;

/// Index construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    /// Enforce `format` keywords in response schemas
    pub validate_formats: bool,
    /// Drop `servers` base paths so request paths are matched as-is
    pub ignore_servers: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            validate_formats: true,
            ignore_servers: false,
        }
    }
}

impl From<&apiconform_core::Config> for IndexOptions {
    fn from(config: &apiconform_core::Config) -> Self {
        Self {
            validate_formats: config.validate_formats,
            ignore_servers: config.ignore_servers,
        }
    }
}

/// Schema dialect implied by the `openapi` version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    /// 3.0.x: Draft 4 semantics plus `nullable`
    OpenApi30,
    /// 3.1.x: JSON Schema 2020-12
    OpenApi31,
}

impl Dialect {
    fn from_version(version: &str) -> Option<Self> {
        if version.starts_with("3.0") {
            Some(Self::OpenApi30)
        } else if version.starts_with("3.1") {
            Some(Self::OpenApi31)
        } else {
            None
        }
    }

    fn draft(self) -> jsonschema::Draft {
        match self {
            Self::OpenApi30 => jsonschema::Draft::Draft4,
            Self::OpenApi31 => jsonschema::Draft::Draft202012,
        }
    }
}

/// Compiles response schemas against one document
struct SchemaCompiler<'a> {
    root: &'a Value,
    /// `components`, normalized for the dialect
    components: Option<Value>,
    dialect: Dialect,
    validate_formats: bool,
}

impl<'a> SchemaCompiler<'a> {
    fn new(root: &'a Value, dialect: Dialect, validate_formats: bool) -> Self {
        let components = root.get("components").cloned().map(|mut c| {
            if dialect == Dialect::OpenApi30 {
                rewrite_nullable(&mut c);
            }
            c
        });
        Self {
            root,
            components,
            dialect,
            validate_formats,
        }
    }

    fn compile(&self, schema: &Value, location: &str) -> Result<CompiledSchema, SpecError> {
        check_refs(schema, self.root).map_err(|e| SpecError::malformed(location, e))?;
        let mut source = schema.clone();
        if self.dialect == Dialect::OpenApi30 {
            rewrite_nullable(&mut source);
        }
        // 3.0 compiles as Draft 4, where keywords beside `$ref` are ignored;
        // 3.1 (2020-12) applies them together with the referenced schema.
        let validator = jsonschema::options()
            .with_draft(self.dialect.draft())
            .should_validate_formats(self.validate_formats)
            .build(&with_components(&source, self.components.as_ref()))
            .map_err(|e| SpecError::malformed(location, format!("invalid schema: {e}")))?;
        Ok(CompiledSchema {
            source,
            validator: Arc::new(validator),
        })
    }
}

impl SpecDocument {
    /// Build with default options.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Malformed`] if the document is not a usable
    /// OpenAPI 3.x document.
    pub fn build(raw: &Value) -> Result<Self, SpecError> {
        Self::build_with(raw, IndexOptions::default())
    }

    /// Build the index: validate structure, compile templates and schemas.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Malformed`] naming the offending location.
    pub fn build_with(raw: &Value, options: IndexOptions) -> Result<Self, SpecError> {
        let root = raw
            .as_object()
            .ok_or_else(|| SpecError::malformed("document", "expected an object"))?;

        let openapi = root
            .get("openapi")
            .and_then(Value::as_str)
            .ok_or_else(|| SpecError::malformed("openapi", "missing OpenAPI version string"))?;
        let dialect = Dialect::from_version(openapi).ok_or_else(|| {
            SpecError::malformed("openapi", format!("unsupported OpenAPI version '{openapi}'"))
        })?;

        let paths = root
            .get("paths")
            .ok_or_else(|| SpecError::malformed("paths", "missing paths section"))?
            .as_object()
            .ok_or_else(|| SpecError::malformed("paths", "expected an object"))?;

        let base_paths = if options.ignore_servers {
            Vec::new()
        } else {
            server_base_paths(root.get("servers"))
        };

        let compiler = SchemaCompiler::new(raw, dialect, options.validate_formats);

        let mut items = Vec::with_capacity(paths.len());
        for (template, item) in paths {
            items.push(build_path_item(template, item, &compiler)?);
        }

        tracing::info!(
            openapi,
            paths = items.len(),
            base_paths = ?base_paths,
            "built spec index"
        );

        Ok(Self {
            openapi: openapi.to_string(),
            base_paths,
            paths: items,
        })
    }
}

fn build_path_item(
    raw_template: &str,
    item: &Value,
    compiler: &SchemaCompiler<'_>,
) -> Result<PathItem, SpecError> {
    let location = format!("paths['{raw_template}']");
    let template =
        PathTemplate::parse(raw_template).map_err(|e| SpecError::malformed(&location, e))?;
    let item = deref(compiler.root, item)
        .map_err(|e| SpecError::malformed(&location, e))?
        .as_object()
        .ok_or_else(|| SpecError::malformed(&location, "expected an object"))?;

    let mut operations = Vec::new();
    for (key, operation) in item {
        // Non-method keys: parameters, summary, servers, x-*
        let Some(method) = HttpMethod::parse(key) else {
            continue;
        };
        if operations.iter().any(|(m, _)| *m == method) {
            return Err(SpecError::malformed(
                &location,
                format!("method '{method}' declared more than once"),
            ));
        }
        let op_location = format!("{location}.{}", key.to_ascii_lowercase());
        operations.push((method, build_operation(operation, &op_location, compiler)?));
    }

    Ok(PathItem {
        template,
        operations,
    })
}

fn build_operation(
    operation: &Value,
    location: &str,
    compiler: &SchemaCompiler<'_>,
) -> Result<OperationSpec, SpecError> {
    let operation = operation
        .as_object()
        .ok_or_else(|| SpecError::malformed(location, "expected an object"))?;

    let Some(responses) = operation.get("responses") else {
        return Ok(OperationSpec::default());
    };
    let responses = responses
        .as_object()
        .ok_or_else(|| SpecError::malformed(format!("{location}.responses"), "expected an object"))?;

    let mut out = Vec::with_capacity(responses.len());
    for (raw_key, response) in responses {
        let resp_location = format!("{location}.responses['{raw_key}']");
        let key = StatusKey::parse(raw_key).map_err(|e| SpecError::malformed(&resp_location, e))?;
        if out.iter().any(|(k, _)| *k == key) {
            return Err(SpecError::malformed(
                &resp_location,
                format!("status '{key}' declared more than once"),
            ));
        }
        out.push((key, build_response(response, &resp_location, compiler)?));
    }
    Ok(OperationSpec { responses: out })
}

fn build_response(
    response: &Value,
    location: &str,
    compiler: &SchemaCompiler<'_>,
) -> Result<ResponseSpec, SpecError> {
    let response = deref(compiler.root, response)
        .map_err(|e| SpecError::malformed(location, e))?
        .as_object()
        .ok_or_else(|| SpecError::malformed(location, "expected an object"))?;

    let description = response
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    let content = match response.get("content") {
        None => None,
        Some(content) => Some(build_content(content, location, compiler)?),
    };

    Ok(ResponseSpec {
        description,
        content,
    })
}

fn build_content(
    content: &Value,
    location: &str,
    compiler: &SchemaCompiler<'_>,
) -> Result<Vec<MediaTypeSpec>, SpecError> {
    let content: &Map<String, Value> = content
        .as_object()
        .ok_or_else(|| SpecError::malformed(format!("{location}.content"), "expected an object"))?;

    let mut media_types = Vec::with_capacity(content.len());
    for (raw_media, media) in content {
        let media_location = format!("{location}.content['{raw_media}']");
        let schema = match media.get("schema") {
            Some(schema) => Some(compiler.compile(schema, &format!("{media_location}.schema"))?),
            None => None,
        };
        media_types.push(MediaTypeSpec {
            media_type: normalize_media_type(raw_media),
            schema,
        });
    }
    Ok(media_types)
}

/// `Application/JSON; charset=utf-8` -> `application/json`
pub(crate) fn normalize_media_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Path components of `servers[].url`, variables substituted with defaults.
///
/// Returns an empty list when no server contributes a non-root base path.
fn server_base_paths(servers: Option<&Value>) -> Vec<String> {
    let Some(servers) = servers.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut bases: Vec<String> = Vec::new();
    for server in servers {
        let Some(url) = server.get("url").and_then(Value::as_str) else {
            continue;
        };
        let url = substitute_variables(url, server.get("variables"));
        let base = url_path(&url);
        if !bases.contains(&base) {
            bases.push(base);
        }
    }

    if bases.iter().all(String::is_empty) {
        Vec::new()
    } else {
        bases
    }
}

fn substitute_variables(url: &str, variables: Option<&Value>) -> String {
    let Some(variables) = variables.and_then(Value::as_object) else {
        return url.to_string();
    };
    let mut out = url.to_string();
    for (name, variable) in variables {
        if let Some(default) = variable.get("default").and_then(Value::as_str) {
            out = out.replace(&format!("{{{name}}}"), default);
        }
    }
    out
}

/// Path component of a server URL, without trailing slash; "" for the root.
///
/// Relative server URLs are resolved against a placeholder host.
fn url_path(url: &str) -> String {
    Url::parse(url)
        .or_else(|_| Url::parse("http://dummy/").and_then(|base| base.join(url)))
        .map(|u| u.path().trim_end_matches('/').to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal(paths: Value) -> Value {
        json!({"openapi": "3.0.0", "info": {"title": "t", "version": "1"}, "paths": paths})
    }

    fn malformed_reason(raw: &Value) -> String {
        match SpecDocument::build(raw) {
            Err(SpecError::Malformed { location, reason }) => format!("{location}: {reason}"),
            other => panic!("expected malformed spec, got {other:?}"),
        }
    }

    #[test]
    fn builds_in_declaration_order() {
        let doc = SpecDocument::build(&minimal(json!({
            "/zeta": {"get": {"responses": {"200": {"description": "ok"}}}},
            "/alpha": {"get": {"responses": {"200": {"description": "ok"}}}},
            "/mid/{id}": {"get": {"responses": {"200": {"description": "ok"}}}}
        })))
        .unwrap();

        let templates: Vec<&str> = doc.paths.iter().map(PathItem::template).collect();
        assert_eq!(templates, vec!["/zeta", "/alpha", "/mid/{id}"]);
    }

    #[test]
    fn methods_are_canonicalized_and_extras_ignored() {
        let doc = SpecDocument::build(&minimal(json!({
            "/test": {
                "summary": "s",
                "parameters": [],
                "x-internal": true,
                "GET": {"responses": {}},
                "post": {"responses": {}}
            }
        })))
        .unwrap();

        let methods: Vec<HttpMethod> = doc.paths[0].operations.iter().map(|(m, _)| *m).collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);
    }

    #[test]
    fn response_without_content_declares_no_body() {
        let doc = SpecDocument::build(&minimal(json!({
            "/test": {"get": {"responses": {
                "200": {"description": "ok", "content": {"application/json": {"schema": {"type": "string"}}}},
                "204": {"description": "No response body"}
            }}}
        })))
        .unwrap();

        let op = doc.paths[0].operation(HttpMethod::Get).unwrap();
        let (_, ok) = op.response_for(200).unwrap();
        assert_eq!(ok.media_types().collect::<Vec<_>>(), vec!["application/json"]);
        let (_, empty) = op.response_for(204).unwrap();
        assert!(empty.content.is_none());
        assert_eq!(empty.description.as_deref(), Some("No response body"));
    }

    #[test]
    fn missing_paths_is_malformed() {
        let raw = json!({"openapi": "3.0.0", "info": {}});
        assert!(malformed_reason(&raw).contains("missing paths section"));
    }

    #[test]
    fn missing_or_unsupported_version_is_malformed() {
        assert!(malformed_reason(&json!({"paths": {}})).contains("missing OpenAPI version"));
        assert!(
            malformed_reason(&json!({"swagger": "2.0", "openapi": "2.0", "paths": {}}))
                .contains("unsupported OpenAPI version")
        );
    }

    #[test]
    fn non_object_document_is_malformed() {
        assert!(malformed_reason(&json!(["not", "a", "spec"])).contains("expected an object"));
    }

    #[test]
    fn invalid_template_is_malformed() {
        let reason = malformed_reason(&minimal(json!({"/users/{id": {}})));
        assert!(reason.starts_with("paths['/users/{id']"), "{reason}");
    }

    #[test]
    fn invalid_status_key_is_malformed() {
        let reason = malformed_reason(&minimal(json!({
            "/test": {"get": {"responses": {"2XY": {"description": "?"}}}}
        })));
        assert!(reason.contains("responses['2XY']"), "{reason}");
    }

    #[test]
    fn invalid_schema_is_malformed() {
        let reason = malformed_reason(&minimal(json!({
            "/test": {"get": {"responses": {"200": {
                "description": "ok",
                "content": {"application/json": {"schema": {"type": 12}}}
            }}}}
        })));
        assert!(reason.contains("invalid schema"), "{reason}");
    }

    #[test]
    fn unresolved_ref_is_malformed() {
        let reason = malformed_reason(&minimal(json!({
            "/test": {"get": {"responses": {"200": {"$ref": "#/components/responses/Nope"}}}}
        })));
        assert!(reason.contains("does not resolve"), "{reason}");
    }

    #[test]
    fn unresolved_schema_ref_is_malformed() {
        let reason = malformed_reason(&minimal(json!({
            "/test": {"get": {"responses": {"200": {
                "description": "ok",
                "content": {"application/json": {"schema": {
                    "type": "array",
                    "items": {"$ref": "#/components/schemas/Nope"}
                }}}
            }}}}
        })));
        assert!(reason.contains("does not resolve"), "{reason}");
        assert!(reason.contains(".schema"), "{reason}");
    }

    #[test]
    fn response_refs_are_followed() {
        let raw = json!({
            "openapi": "3.0.3",
            "paths": {"/pets": {"get": {"responses": {"200": {"$ref": "#/components/responses/Pets"}}}}},
            "components": {
                "responses": {"Pets": {
                    "description": "pets",
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pets"}}}
                }},
                "schemas": {"Pets": {"type": "array", "items": {"type": "string"}}}
            }
        });
        let doc = SpecDocument::build(&raw).unwrap();
        let (_, resp) = doc.paths[0]
            .operation(HttpMethod::Get)
            .unwrap()
            .response_for(200)
            .unwrap();
        let schema = resp.content.as_ref().unwrap()[0].schema.as_ref().unwrap();
        assert_eq!(schema.source(), &json!({"$ref": "#/components/schemas/Pets"}));
        assert!(schema.validator().is_valid(&json!(["a", "b"])));
        assert!(!schema.validator().is_valid(&json!([1])));
    }

    #[test]
    fn server_base_paths_collected() {
        let raw = json!({
            "openapi": "3.1.0",
            "servers": [
                {"url": "https://api.example.com/v1/"},
                {"url": "/{base}", "variables": {"base": {"default": "internal"}}},
                {"url": "https://api.example.com/v1"}
            ],
            "paths": {}
        });
        let doc = SpecDocument::build(&raw).unwrap();
        assert_eq!(doc.base_paths, vec!["/v1", "/internal"]);
    }

    #[test]
    fn root_only_servers_mean_no_base_paths() {
        let raw = json!({
            "openapi": "3.0.0",
            "servers": [{"url": "http://localhost:8080"}, {"url": "/"}],
            "paths": {}
        });
        assert!(SpecDocument::build(&raw).unwrap().base_paths.is_empty());
    }

    #[test]
    fn ignore_servers_option() {
        let raw = json!({"openapi": "3.0.0", "servers": [{"url": "/api"}], "paths": {}});
        let options = IndexOptions {
            ignore_servers: true,
            ..IndexOptions::default()
        };
        assert!(SpecDocument::build_with(&raw, options).unwrap().base_paths.is_empty());
    }

    #[test]
    fn server_url_paths() {
        assert_eq!(url_path("https://api.example.com/v1/?x=1#frag"), "/v1");
        assert_eq!(url_path("http://localhost:8080"), "");
        assert_eq!(url_path("/internal/api"), "/internal/api");
        assert_eq!(url_path("//cdn.example.com/v2"), "/v2");
        assert_eq!(url_path("/"), "");
    }

    #[test]
    fn media_type_normalization() {
        assert_eq!(normalize_media_type("Application/JSON; charset=utf-8"), "application/json");
        assert_eq!(normalize_media_type("*/*"), "*/*");
    }

    #[test]
    fn options_from_config() {
        let config = apiconform_core::Config {
            validate_formats: false,
            ignore_servers: true,
            ..Default::default()
        };
        let options = IndexOptions::from(&config);
        assert!(!options.validate_formats);
        assert!(options.ignore_servers);
    }
}
