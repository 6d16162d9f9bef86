//! OpenAPI 3 / Swagger 2 JSON documents

use super::DetectorResult;
use crate::extract::record::or_unknown;
use crate::extract::{ExtractedRecord, HttpMethod, Parameter};
use serde_json::{Map, Value};

/// Recognizes a JSON document with an `openapi`/`swagger` version and
/// extracts its first operation
///
/// A versioned document without a single path is malformed.
pub(super) fn detect(raw: &str) -> DetectorResult {
    if !raw.trim_start().starts_with('{') {
        return None;
    }

    let document: Value = serde_json::from_str(raw).ok()?;
    let root = document.as_object()?;

    if str_field(&document, "openapi").is_none() && str_field(&document, "swagger").is_none() {
        return None;
    }

    let Some((path, path_item)) = root
        .get("paths")
        .and_then(Value::as_object)
        .and_then(|paths| paths.iter().next())
    else {
        return Some(Err("document declares no paths".to_string()));
    };

    let (method, operation) = path_item
        .as_object()
        .and_then(first_operation)
        .map_or((HttpMethod::Unknown, None), |(m, op)| (m, Some(op)));

    let info = root.get("info");

    let name = info
        .and_then(|i| str_field(i, "title"))
        .or_else(|| operation.and_then(|op| str_field(op, "operationId")));

    let description = operation
        .and_then(|op| str_field(op, "summary").or_else(|| str_field(op, "description")))
        .or_else(|| info.and_then(|i| str_field(i, "description")));

    let mut parameters = Vec::new();
    parameters.extend(parameter_list(path_item.get("parameters")));
    if let Some(op) = operation {
        parameters.extend(parameter_list(op.get("parameters")));
        parameters.extend(request_body_properties(op));
    }

    Some(Ok(ExtractedRecord {
        name: or_unknown(name),
        endpoint: format!("{}{}", base_url(root), path),
        method,
        parameters,
        description: or_unknown(description),
        example: operation.and_then(example),
    }))
}

/// First key of a path item that names an HTTP method, in document order
fn first_operation(path_item: &Map<String, Value>) -> Option<(HttpMethod, &Value)> {
    path_item
        .iter()
        .find_map(|(key, value)| Some((key.parse::<HttpMethod>().ok()?, value)))
}

/// Server base URL without a trailing slash, or empty when none is declared
fn base_url(root: &Map<String, Value>) -> String {
    // OpenAPI 3
    if let Some(url) = root
        .get("servers")
        .and_then(Value::as_array)
        .and_then(|servers| servers.first())
        .and_then(|server| str_field(server, "url"))
    {
        return url.trim_end_matches('/').to_string();
    }

    // Swagger 2
    if let Some(host) = root.get("host").and_then(Value::as_str) {
        let scheme = root
            .get("schemes")
            .and_then(Value::as_array)
            .and_then(|schemes| schemes.first())
            .and_then(Value::as_str)
            .unwrap_or("https");
        let base_path = root.get("basePath").and_then(Value::as_str).unwrap_or("");
        return format!("{}://{}{}", scheme, host, base_path.trim_end_matches('/'));
    }

    String::new()
}

fn parameter_list(list: Option<&Value>) -> Vec<Parameter> {
    let Some(items) = list.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|param| {
            // `$ref` parameters are named after the referenced component
            let name = str_field(param, "name").or_else(|| {
                str_field(param, "$ref").and_then(|r| r.rsplit('/').next().map(str::to_string))
            });
            Parameter::new(name, schema_type(param), str_field(param, "description"))
        })
        .collect()
}

/// Top-level properties of the JSON request body schema
fn request_body_properties(operation: &Value) -> Vec<Parameter> {
    let Some(properties) = request_body_media(operation)
        .and_then(|media| media.get("schema"))
        .and_then(|schema| schema.get("properties"))
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, prop)| {
            Parameter::new(
                Some(name.clone()),
                str_field(prop, "type"),
                str_field(prop, "description"),
            )
        })
        .collect()
}

/// Preferred request body media type: the first JSON one, else the first
fn request_body_media(operation: &Value) -> Option<&Value> {
    let content = operation
        .get("requestBody")?
        .get("content")?
        .as_object()?;

    content
        .iter()
        .find(|(media_type, _)| media_type.contains("json"))
        .or_else(|| content.iter().next())
        .map(|(_, media)| media)
}

fn example(operation: &Value) -> Option<String> {
    if let Some(media) = request_body_media(operation) {
        let value = media.get("example").or_else(|| {
            media
                .get("examples")
                .and_then(Value::as_object)
                .and_then(|examples| examples.values().next())
                .and_then(|ex| ex.get("value"))
        });

        if let Some(text) = value.and_then(render_example) {
            return Some(text);
        }
    }

    ["x-code-samples", "x-codeSamples"].iter().find_map(|key| {
        operation
            .get(*key)
            .and_then(Value::as_array)
            .and_then(|samples| samples.first())
            .and_then(|sample| str_field(sample, "source"))
    })
}

fn render_example(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => serde_json::to_string_pretty(other).ok(),
    }
}

/// Parameter type from `schema.type` (OpenAPI 3) or `type` (Swagger 2)
fn schema_type(param: &Value) -> Option<String> {
    param
        .get("schema")
        .and_then(|schema| str_field(schema, "type"))
        .or_else(|| str_field(param, "type"))
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
