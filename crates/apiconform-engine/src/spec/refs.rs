//! Local `$ref` resolution and OpenAPI 3.0 schema normalization
//!
//! Response and path-item references are followed here. Schema references are
//! left in place for `jsonschema` to resolve against the embedded components.

use serde_json::{Map, Value};

/// Look up a local reference (`#/components/...`) in the document.
pub(crate) fn resolve_pointer<'a>(root: &'a Value, reference: &str) -> Result<&'a Value, String> {
    let pointer = reference
        .strip_prefix('#')
        .ok_or_else(|| format!("external reference '{reference}' is not supported"))?;
    root.pointer(pointer)
        .ok_or_else(|| format!("reference '{reference}' does not resolve"))
}

/// Follow `$ref` chains on an object (response or path item) until a concrete value.
pub(crate) fn deref<'a>(root: &'a Value, value: &'a Value) -> Result<&'a Value, String> {
    let mut current = value;
    let mut seen: Vec<&str> = Vec::new();
    while let Some(reference) = current.get("$ref").and_then(Value::as_str) {
        if seen.contains(&reference) {
            return Err(format!("reference cycle through '{reference}'"));
        }
        seen.push(reference);
        current = resolve_pointer(root, reference)?;
    }
    Ok(current)
}

/// Check that every `$ref` in a schema is local and resolves in the document.
pub(crate) fn check_refs(schema: &Value, root: &Value) -> Result<(), String> {
    match schema {
        Value::Object(obj) => {
            if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
                resolve_pointer(root, reference)?;
            }
            obj.values().try_for_each(|v| check_refs(v, root))
        }
        Value::Array(arr) => arr.iter().try_for_each(|v| check_refs(v, root)),
        _ => Ok(()),
    }
}

/// Whether a schema contains any `$ref`
pub(crate) fn has_refs(schema: &Value) -> bool {
    match schema {
        Value::Object(obj) => obj.contains_key("$ref") || obj.values().any(has_refs),
        Value::Array(arr) => arr.iter().any(has_refs),
        _ => false,
    }
}

/// Compilable form of a schema: `components` is embedded at the root so
/// `#/components/...` references resolve inside the compiled resource,
/// recursive ones included.
pub(crate) fn with_components(schema: &Value, components: Option<&Value>) -> Value {
    match (schema, components) {
        (Value::Object(obj), Some(components)) if has_refs(schema) => {
            let mut out: Map<String, Value> = obj.clone();
            out.insert("components".to_string(), components.clone());
            Value::Object(out)
        }
        _ => schema.clone(),
    }
}

/// Rewrite OpenAPI 3.0 `nullable: true` into JSON Schema terms: the `type`
/// becomes a union with `"null"` and an `enum` gains `null`.
pub(crate) fn rewrite_nullable(schema: &mut Value) {
    match schema {
        Value::Object(obj) => {
            if obj.get("nullable") == Some(&Value::Bool(true)) {
                obj.remove("nullable");
                let widened = match obj.get("type") {
                    Some(Value::String(t)) => Some(serde_json::json!([t, "null"])),
                    Some(Value::Array(types)) if !types.iter().any(|t| t == "null") => {
                        let mut types = types.clone();
                        types.push(Value::String("null".into()));
                        Some(Value::Array(types))
                    }
                    _ => None,
                };
                if let Some(types) = widened {
                    obj.insert("type".to_string(), types);
                }
                if let Some(Value::Array(options)) = obj.get_mut("enum") {
                    if !options.contains(&Value::Null) {
                        options.push(Value::Null);
                    }
                }
            }
            for v in obj.values_mut() {
                rewrite_nullable(v);
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(rewrite_nullable),
        _ => {}
    }
}
