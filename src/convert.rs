//! Conversion helpers between tool arguments, Mobi responses and MCP content.

use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Helper to get a required string argument from JSON arguments.
pub fn get_string_arg(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    args.get(name)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| McpError::MissingArg(name.to_string()))
}

/// Helper to get an optional string argument from JSON arguments.
pub fn get_optional_string(args: &Map<String, JsonValue>, name: &str) -> Option<String> {
    args.get(name).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Helper to get a required u64 argument from JSON arguments.
pub fn get_u64_arg(args: &Map<String, JsonValue>, name: &str) -> Result<u64> {
    args.get(name)
        .and_then(as_whole_u64)
        .ok_or_else(|| McpError::MissingArg(name.to_string()))
}

/// Helper to get an optional u64 argument from JSON arguments.
pub fn get_optional_u64(args: &Map<String, JsonValue>, name: &str) -> Option<u64> {
    args.get(name).and_then(as_whole_u64)
}

// Accepts integral floats (`10.0`) as well as integers.
fn as_whole_u64(value: &JsonValue) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// Helper to get an optional list of strings. Absent or null yields an empty list.
pub fn get_string_list(args: &Map<String, JsonValue>, name: &str) -> Result<Vec<String>> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| McpError::InvalidArg {
                        name: name.to_string(),
                        reason: "Expected array of strings".to_string(),
                    })
            })
            .collect(),
        Some(_) => Err(McpError::InvalidArg {
            name: name.to_string(),
            reason: "Expected array of strings".to_string(),
        }),
    }
}

/// Render a Mobi response body as MCP text content.
///
/// String bodies (Turtle, plain IRIs) are returned verbatim; everything else is
/// serialized as JSON.
pub fn body_to_text(body: &JsonValue) -> String {
    match body {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_string_list_absent_or_null_is_empty() {
        let a = args(json!({ "types": null }));
        assert!(get_string_list(&a, "types").unwrap().is_empty());
        assert!(get_string_list(&a, "keywords").unwrap().is_empty());
    }

    #[test]
    fn test_string_list_rejects_mixed_items() {
        let a = args(json!({ "keywords": ["a", 1] }));
        assert!(matches!(
            get_string_list(&a, "keywords"),
            Err(McpError::InvalidArg { .. })
        ));
    }

    #[test]
    fn test_required_helpers_report_missing() {
        let a = args(json!({}));
        assert!(matches!(get_string_arg(&a, "title"), Err(McpError::MissingArg(n)) if n == "title"));
        assert!(matches!(get_u64_arg(&a, "limit"), Err(McpError::MissingArg(_))));
    }

    #[test]
    fn test_integral_floats_read_as_counts() {
        let a = args(json!({ "offset": 20.0, "limit": 10, "bad": 2.5 }));
        assert_eq!(get_u64_arg(&a, "offset").unwrap(), 20);
        assert_eq!(get_optional_u64(&a, "limit"), Some(10));
        assert_eq!(get_optional_u64(&a, "bad"), None);
    }

    #[test]
    fn test_body_to_text_keeps_strings_verbatim() {
        let ttl = "@prefix ex: <http://ex.org/> .\n";
        assert_eq!(body_to_text(&JsonValue::String(ttl.to_string())), ttl);
        assert_eq!(body_to_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
