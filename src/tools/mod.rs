//! Tool registry and dispatch.
//!
//! Each tool maps one-to-one onto a [`MobiClient`] method. Arguments are
//! validated against the tool's input schema before the client is called, so
//! a malformed call never reaches Mobi.

pub mod catalog;
pub mod ontology;
pub mod shapes;
pub(crate) mod validate;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::client::MobiClient;
use crate::error::{McpError, Result};

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "record_search")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Registry of available MCP tools.
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    /// Create the registry with every Mobi tool.
    pub fn new() -> Self {
        let mut tools = Vec::new();
        tools.extend(catalog::tools());
        tools.extend(ontology::tools());
        tools.extend(shapes::tools());
        Self { tools }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Look up a tool definition by name.
    pub fn get(&self, name: &str) -> Option<&ToolDef> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Validate arguments for a tool without calling it.
    pub fn validate(&self, name: &str, args: &Map<String, JsonValue>) -> Result<()> {
        let def = self
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;
        validate::validate_args(&def.input_schema, args)
    }

    /// Validate and dispatch a tool call to the appropriate handler.
    pub async fn dispatch(
        &self,
        client: &MobiClient,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        self.validate(name, &args)?;

        match name {
            "record_search"
            | "entity_search"
            | "get_record"
            | "list_record_branches"
            | "create_branch_on_record" => catalog::dispatch(client, name, args).await,
            "fetch_ontology_data" | "create_ontology_record" | "update_ontology_record" => {
                ontology::dispatch(client, name, args).await
            }
            "get_shapes_graph" => shapes::dispatch(client, name, args).await,
            _ => Err(McpError::UnknownTool(name.to_string())),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
///
/// Each property is `"name": type` or `"name": type => "description"`.
#[macro_export]
macro_rules! schema {
    // Object with required and optional properties
    (object {
        required: { $($req_name:literal : $req_type:tt $(=> $req_desc:literal)?),* $(,)? },
        optional: { $($opt_name:literal : $opt_type:tt $(=> $opt_desc:literal)?),* $(,)? }
    }) => {{
        let mut required = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), schema!(@prop $req_type $(, $req_desc)?));)*
        $(props.insert($opt_name.to_string(), schema!(@prop $opt_type $(, $opt_desc)?));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only required properties
    (object {
        required: { $($req_name:literal : $req_type:tt $(=> $req_desc:literal)?),* $(,)? }
    }) => {{
        let mut required = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), schema!(@prop $req_type $(, $req_desc)?));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Property with or without a description
    (@prop $ty:tt) => { schema!(@type $ty) };
    (@prop $ty:tt, $desc:literal) => {{
        let mut prop = schema!(@type $ty);
        prop["description"] = serde_json::json!($desc);
        prop
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type integer) => { serde_json::json!({"type": "integer"}) };
    (@type count) => { serde_json::json!({"type": "integer", "minimum": 0}) };
    (@type boolean) => { serde_json::json!({"type": "boolean"}) };
    (@type array_string) => { serde_json::json!({"type": "array", "items": {"type": "string"}}) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_exposes_every_tool_once() {
        let registry = ToolRegistry::new();
        let names: Vec<&str> = registry.tools().iter().map(|t| t.name.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());

        for expected in [
            "record_search",
            "entity_search",
            "fetch_ontology_data",
            "get_shapes_graph",
            "create_ontology_record",
            "create_branch_on_record",
            "get_record",
            "list_record_branches",
            "update_ontology_record",
        ] {
            assert!(unique.contains(expected), "missing tool {expected}");
        }
    }

    #[test]
    fn test_every_schema_is_an_object_with_required_list() {
        for tool in ToolRegistry::new().tools() {
            let schema = &tool.input_schema;
            assert_eq!(schema["type"], "object", "{}", tool.name);
            assert!(schema["properties"].is_object(), "{}", tool.name);
            let required = schema["required"].as_array().unwrap();
            for name in required {
                let name = name.as_str().unwrap();
                assert!(
                    schema["properties"].get(name).is_some(),
                    "{}: required '{}' not declared",
                    tool.name,
                    name
                );
            }
            assert!(!tool.description.is_empty());
        }
    }

    #[test]
    fn test_tool_def_serializes_input_schema_in_camel_case() {
        let def = ToolDef::new("t", "d", serde_json::json!({"type": "object"}));
        let json = serde_json::to_value(&def).unwrap();
        assert!(json.get("inputSchema").is_some());
        assert!(json.get("input_schema").is_none());
    }

    #[test]
    fn test_schema_macro_attaches_descriptions() {
        let schema = schema!(object {
            required: { "a": string => "first" },
            optional: { "b": count }
        });
        assert_eq!(schema["properties"]["a"]["description"], "first");
        assert_eq!(schema["properties"]["b"]["minimum"], 0);
        assert_eq!(schema["required"], serde_json::json!(["a"]));
    }

    #[test]
    fn test_record_search_documents_every_record_type() {
        let registry = ToolRegistry::new();
        let description = &registry.get("record_search").unwrap().description;
        for record_type in crate::client::RECORD_TYPES {
            assert!(description.contains(record_type), "{record_type}");
        }
    }

    #[test]
    fn test_upload_schemas_accept_exactly_the_parseable_formats() {
        use crate::rdf::RdfFormat;

        let registry = ToolRegistry::new();
        let args = |format: &str| {
            serde_json::json!({
                "jsonld": "[]",
                "title": "t",
                "description": "d",
                "rdf_format": format
            })
            .as_object()
            .unwrap()
            .clone()
        };

        for name in RdfFormat::NAMES {
            assert!(registry.validate("create_ontology_record", &args(name)).is_ok());
            assert!(name.parse::<RdfFormat>().is_ok());
        }
        for alias in ["ttl", "json-ld", "TURTLE"] {
            assert!(registry.validate("create_ontology_record", &args(alias)).is_err());
            assert!(alias.parse::<RdfFormat>().is_err());
        }
    }

    #[test]
    fn test_validate_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.validate("drop_tables", &Map::new()).unwrap_err();
        assert!(matches!(err, McpError::UnknownTool(_)));
    }
}
