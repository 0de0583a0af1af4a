//! Body validation against a resolved expectation
//!
//! No I/O. Every violation the schema engine reports is collected, in order.

use jsonschema::error::ValidationErrorKind;
use serde_json::Value;

use apiconform_core::{Violation, ViolationKind};

use crate::resolve::BodyExpectation;

/// Result of validating one body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid { errors: Vec<Violation> },
}

impl ValidationOutcome {
    fn from_errors(errors: Vec<Violation>) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid { errors }
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Validate `body` (absent when the response had none) against `expectation`.
#[must_use]
pub fn validate(expectation: &BodyExpectation<'_>, body: Option<&Value>) -> ValidationOutcome {
    match expectation {
        BodyExpectation::Any => ValidationOutcome::Valid,
        BodyExpectation::Empty => {
            if body.is_none_or(is_empty_body) {
                ValidationOutcome::Valid
            } else {
                ValidationOutcome::from_errors(vec![Violation::at_root(
                    ViolationKind::UnexpectedBody,
                    "response should not have a body: the response declares no content",
                )])
            }
        }
        BodyExpectation::UndeclaredMediaType { actual, declared } => {
            ValidationOutcome::from_errors(vec![Violation::at_root(
                ViolationKind::ContentType,
                format!(
                    "content type '{actual}' is not declared for this response (declared: {})",
                    declared.join(", ")
                ),
            )])
        }
        BodyExpectation::Schema { schema, .. } => {
            let validator = schema.validator();
            match body {
                None if validator.is_valid(&Value::Null) => ValidationOutcome::Valid,
                None => ValidationOutcome::from_errors(vec![Violation::at_root(
                    ViolationKind::MissingBody,
                    "response body is missing but the response declares a schema",
                )]),
                Some(body) => ValidationOutcome::from_errors(
                    validator.iter_errors(body).map(|e| to_violation(&e)).collect(),
                ),
            }
        }
    }
}

/// Absent-equivalent bodies: `null`, `""`, `{}`
fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

fn to_violation(error: &jsonschema::ValidationError<'_>) -> Violation {
    let kind = match error.kind() {
        ValidationErrorKind::Type { .. } => ViolationKind::Type,
        ValidationErrorKind::Required { .. } => ViolationKind::Required,
        ValidationErrorKind::AdditionalProperties { .. } => ViolationKind::AdditionalProperties,
        ValidationErrorKind::Enum { .. } | ValidationErrorKind::Constant { .. } => {
            ViolationKind::Enum
        }
        ValidationErrorKind::Format { .. } => ViolationKind::Format,
        _ => ViolationKind::Constraint,
    };
    Violation::new(kind, error.instance_path().to_string(), error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::match_route;
    use crate::resolve::{MatchResult, resolve};
    use crate::spec::SpecDocument;
    use serde_json::json;

    fn document(openapi: &str, schema: Value) -> SpecDocument {
        SpecDocument::build(&json!({
            "openapi": openapi,
            "paths": {"/thing": {"get": {"responses": {
                "200": {"description": "ok", "content": {"application/json": {"schema": schema}}},
                "202": {"description": "accepted", "content": {"application/json": {}}},
                "204": {"description": "No response body"}
            }}}}
        }))
        .unwrap()
    }

    fn check(doc: &SpecDocument, status: u16, body: Option<Value>) -> ValidationOutcome {
        match resolve(match_route(doc, "/thing"), "GET", status, None) {
            MatchResult::Matched(r) => validate(&r.body, body.as_ref()),
            other => panic!("unexpected {other:?}"),
        }
    }

    fn errors(outcome: ValidationOutcome) -> Vec<Violation> {
        match outcome {
            ValidationOutcome::Invalid { errors } => errors,
            ValidationOutcome::Valid => panic!("expected violations"),
        }
    }

    fn user_schema() -> Value {
        json!({
            "type": "object",
            "required": ["id", "name"],
            "additionalProperties": false,
            "properties": {
                "id": {"type": "integer"},
                "name": {"type": "string"},
                "role": {"type": "string", "enum": ["admin", "member"]},
                "email": {"type": "string", "format": "email"}
            }
        })
    }

    #[test]
    fn matching_body_is_valid() {
        let doc = document("3.0.0", user_schema());
        let body = json!({"id": 1, "name": "ada", "role": "admin", "email": "ada@example.com"});
        assert!(check(&doc, 200, Some(body)).is_valid());
    }

    #[test]
    fn string_schema_accepts_string_body() {
        let doc = document("3.0.0", json!({"type": "string"}));
        assert!(check(&doc, 200, Some(json!("valid body (string)"))).is_valid());
    }

    #[test]
    fn every_violation_is_collected_with_pointer_and_kind() {
        let doc = document("3.0.0", user_schema());
        let body = json!({"id": "one", "role": "owner", "email": "nope", "extra": true});
        let errs = errors(check(&doc, 200, Some(body)));

        let has = |kind: ViolationKind, path: &str| {
            errs.iter().any(|v| v.kind == kind && v.path == path)
        };
        assert!(has(ViolationKind::Type, "/id"), "{errs:?}");
        assert!(has(ViolationKind::Required, ""), "{errs:?}");
        assert!(has(ViolationKind::AdditionalProperties, ""), "{errs:?}");
        assert!(has(ViolationKind::Enum, "/role"), "{errs:?}");
        assert!(has(ViolationKind::Format, "/email"), "{errs:?}");
    }

    fn with_components(openapi: &str, schema: Value) -> SpecDocument {
        SpecDocument::build(&json!({
            "openapi": openapi,
            "paths": {"/thing": {"get": {"responses": {
                "200": {"description": "ok", "content": {"application/json": {"schema": schema}}}
            }}}},
            "components": {"schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["id"],
                    "properties": {"id": {"type": "integer"}, "tag": {"type": "string"}}
                },
                "Node": {
                    "type": "object",
                    "required": ["id"],
                    "properties": {
                        "id": {"type": "integer"},
                        "children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}
                    }
                }
            }}
        }))
        .unwrap()
    }

    #[test]
    fn ref_siblings_apply_in_31() {
        let doc = with_components(
            "3.1.0",
            json!({"$ref": "#/components/schemas/Pet", "required": ["tag"]}),
        );
        let errs = errors(check(&doc, 200, Some(json!({"id": 1}))));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ViolationKind::Required);
        assert!(check(&doc, 200, Some(json!({"id": 1, "tag": "cat"}))).is_valid());
    }

    #[test]
    fn ref_siblings_ignored_in_30() {
        let doc = with_components(
            "3.0.3",
            json!({"$ref": "#/components/schemas/Pet", "required": ["tag"]}),
        );
        assert!(check(&doc, 200, Some(json!({"id": 1}))).is_valid());
        let errs = errors(check(&doc, 200, Some(json!({}))));
        assert_eq!(errs[0].kind, ViolationKind::Required);
    }

    #[test]
    fn recursive_schema_checks_every_depth() {
        for openapi in ["3.0.3", "3.1.0"] {
            let doc = with_components(openapi, json!({"$ref": "#/components/schemas/Node"}));
            let ok = json!({"id": 1, "children": [{"id": 2, "children": [{"id": 3}]}]});
            assert!(check(&doc, 200, Some(ok)).is_valid(), "{openapi}");

            let bad = json!({"id": 1, "children": [{"id": 2, "children": [{"id": "not-an-int"}]}]});
            let errs = errors(check(&doc, 200, Some(bad)));
            assert_eq!(errs.len(), 1, "{openapi}: {errs:?}");
            assert_eq!(errs[0].path, "/children/0/children/0/id");
            assert_eq!(errs[0].kind, ViolationKind::Type);
        }
    }

    #[test]
    fn nested_array_pointer() {
        let doc = document(
            "3.1.0",
            json!({"type": "array", "items": {"type": "object", "properties": {"n": {"type": "number"}}}}),
        );
        let errs = errors(check(&doc, 200, Some(json!([{"n": 1}, {"n": "two"}]))));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "/1/n");
        assert_eq!(errs[0].kind, ViolationKind::Type);
    }

    #[test]
    fn empty_response_accepts_absent_body() {
        let doc = document("3.0.0", user_schema());
        assert!(check(&doc, 204, None).is_valid());
        assert!(check(&doc, 204, Some(json!(null))).is_valid());
        assert!(check(&doc, 204, Some(json!(""))).is_valid());
        assert!(check(&doc, 204, Some(json!({}))).is_valid());
    }

    #[test]
    fn empty_response_rejects_body() {
        let doc = document("3.0.0", user_schema());
        let errs = errors(check(&doc, 204, Some(json!("invalid body (should be empty)"))));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ViolationKind::UnexpectedBody);
        assert!(errs[0].path.is_empty());
    }

    #[test]
    fn content_without_schema_accepts_anything() {
        let doc = document("3.0.0", user_schema());
        assert!(check(&doc, 202, Some(json!({"anything": [1, 2, 3]}))).is_valid());
        assert!(check(&doc, 202, None).is_valid());
    }

    #[test]
    fn missing_body_for_schema() {
        let doc = document("3.0.0", user_schema());
        let errs = errors(check(&doc, 200, None));
        assert_eq!(errs[0].kind, ViolationKind::MissingBody);
    }

    #[test]
    fn missing_body_allowed_when_schema_is_nullable() {
        let doc = document("3.0.0", json!({"type": "object", "nullable": true}));
        assert!(check(&doc, 200, None).is_valid());
        assert!(check(&doc, 200, Some(json!({"k": 1}))).is_valid());
    }

    #[test]
    fn format_checks_can_be_disabled() {
        let raw = json!({
            "openapi": "3.0.0",
            "paths": {"/thing": {"get": {"responses": {"200": {
                "description": "ok",
                "content": {"application/json": {"schema": {"type": "string", "format": "email"}}}
            }}}}}
        });
        let options = crate::spec::IndexOptions {
            validate_formats: false,
            ..Default::default()
        };
        let doc = SpecDocument::build_with(&raw, options).unwrap();
        assert!(check(&doc, 200, Some(json!("not an email"))).is_valid());
    }

    #[test]
    fn undeclared_media_type_is_a_violation() {
        let expectation = BodyExpectation::UndeclaredMediaType {
            actual: "text/plain".into(),
            declared: vec!["application/json".into()],
        };
        let errs = errors(validate(&expectation, Some(&json!("hi"))));
        assert_eq!(errs[0].kind, ViolationKind::ContentType);
        assert!(errs[0].message.contains("'text/plain'"));
    }
}
