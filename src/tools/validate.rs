//! Argument validation against a tool's input schema.
//!
//! Covers the subset of JSON Schema the tool definitions use: `required`,
//! `type`, `minimum`, `enum` and array `items`. Undeclared properties are
//! ignored. Null is accepted for optional properties.

use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Check `args` against `schema`, failing on the first violation.
pub fn validate_args(schema: &JsonValue, args: &Map<String, JsonValue>) -> Result<()> {
    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for name in required.iter().filter_map(|n| n.as_str()) {
            match args.get(name) {
                None | Some(JsonValue::Null) => return Err(McpError::MissingArg(name.to_string())),
                Some(_) => {}
            }
        }
    }

    let Some(props) = schema.get("properties").and_then(|p| p.as_object()) else {
        return Ok(());
    };

    for (name, value) in args {
        if value.is_null() {
            continue;
        }
        if let Some(prop) = props.get(name) {
            check_value(name, prop, value)?;
        }
    }

    Ok(())
}

fn check_value(name: &str, prop: &JsonValue, value: &JsonValue) -> Result<()> {
    if let Some(expected) = prop.get("type").and_then(|t| t.as_str()) {
        let matches = match expected {
            "string" => value.is_string(),
            "integer" => value.is_i64() || value.is_u64() || is_whole_float(value),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "array" => value.is_array(),
            "object" => value.is_object(),
            _ => true,
        };
        if !matches {
            return Err(invalid(
                name,
                format!("expected {}, got {}", expected, type_name(value)),
            ));
        }
    }

    if let (Some(min), Some(n)) = (
        prop.get("minimum").and_then(|m| m.as_f64()),
        value.as_f64(),
    ) {
        if n < min {
            return Err(invalid(name, format!("must be at least {}, got {}", min, n)));
        }
    }

    if let Some(allowed) = prop.get("enum").and_then(|e| e.as_array()) {
        if !allowed.contains(value) {
            let options: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
            return Err(invalid(
                name,
                format!("must be one of {}, got {}", options.join(", "), value),
            ));
        }
    }

    if let (Some(items), Some(values)) = (prop.get("items"), value.as_array()) {
        for (i, item) in values.iter().enumerate() {
            check_value(&format!("{}[{}]", name, i), items, item)?;
        }
    }

    Ok(())
}

/// Integral floats such as `10.0`, which some clients send for integers.
fn is_whole_float(value: &JsonValue) -> bool {
    value.as_f64().is_some_and(|f| f.fract() == 0.0)
}

fn invalid(name: &str, reason: String) -> McpError {
    McpError::InvalidArg {
        name: name.to_string(),
        reason,
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_f64() => "number",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> JsonValue {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "limit": { "type": "integer", "minimum": 0 },
                "keywords": { "type": "array", "items": { "type": "string" } },
                "format": { "type": "string", "enum": ["turtle", "jsonld"] }
            },
            "required": ["title", "limit"]
        })
    }

    fn args(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_accepts_valid_arguments() {
        let a = args(json!({ "title": "x", "limit": 10, "keywords": ["a"], "format": "turtle" }));
        validate_args(&schema(), &a).unwrap();
    }

    #[test]
    fn test_missing_required() {
        let err = validate_args(&schema(), &args(json!({ "limit": 1 }))).unwrap_err();
        assert!(matches!(err, McpError::MissingArg(ref n) if n == "title"));
    }

    #[test]
    fn test_null_required_counts_as_missing() {
        let err =
            validate_args(&schema(), &args(json!({ "title": null, "limit": 1 }))).unwrap_err();
        assert!(matches!(err, McpError::MissingArg(_)));
    }

    #[test]
    fn test_null_optional_is_accepted() {
        let a = args(json!({ "title": "x", "limit": 1, "keywords": null }));
        validate_args(&schema(), &a).unwrap();
    }

    #[test]
    fn test_wrong_type() {
        let err =
            validate_args(&schema(), &args(json!({ "title": "x", "limit": "10" }))).unwrap_err();
        match err {
            McpError::InvalidArg { name, reason } => {
                assert_eq!(name, "limit");
                assert!(reason.contains("expected integer"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_fractional_number_is_not_integer() {
        let err =
            validate_args(&schema(), &args(json!({ "title": "x", "limit": 1.5 }))).unwrap_err();
        assert!(matches!(err, McpError::InvalidArg { .. }));
    }

    #[test]
    fn test_whole_float_is_integer() {
        assert!(validate_args(&schema(), &args(json!({ "title": "x", "limit": 10.0 }))).is_ok());
        let err =
            validate_args(&schema(), &args(json!({ "title": "x", "limit": -2.0 }))).unwrap_err();
        assert!(matches!(err, McpError::InvalidArg { ref name, .. } if name == "limit"));
    }

    #[test]
    fn test_minimum() {
        let err =
            validate_args(&schema(), &args(json!({ "title": "x", "limit": -1 }))).unwrap_err();
        assert!(matches!(err, McpError::InvalidArg { ref name, .. } if name == "limit"));
    }

    #[test]
    fn test_array_items_are_checked() {
        let a = args(json!({ "title": "x", "limit": 1, "keywords": ["ok", 2] }));
        let err = validate_args(&schema(), &a).unwrap_err();
        assert!(matches!(err, McpError::InvalidArg { ref name, .. } if name == "keywords[1]"));
    }

    #[test]
    fn test_enum() {
        let a = args(json!({ "title": "x", "limit": 1, "format": "n3" }));
        assert!(validate_args(&schema(), &a).is_err());
    }

    #[test]
    fn test_undeclared_properties_are_ignored() {
        let a = args(json!({ "title": "x", "limit": 1, "extra": { "anything": true } }));
        validate_args(&schema(), &a).unwrap();
    }
}
