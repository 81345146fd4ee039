//! Shapes graph tools.
//!
//! Tools: get_shapes_graph

use serde_json::{json, Map, Value as JsonValue};

use crate::client::{MobiClient, ShapesGraphQuery};
use crate::convert::{get_optional_string, get_string_arg};
use crate::error::{McpError, Result};
use crate::tools::ToolDef;

const DEFAULT_RDF_FORMAT: &str = "turtle";

/// Get all shapes graph tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        "get_shapes_graph",
        "Get the SHACL shapes graph for a given shapes graph record. Optionally target a \
         specific branch or commit of the record. Returns the serialized graph (Turtle unless \
         rdf_format says otherwise).",
        json!({
            "type": "object",
            "properties": {
                "record_id": {
                    "type": "string",
                    "description": "IRI of the shapes graph record"
                },
                "branch_id": {
                    "type": "string",
                    "description": "IRI of the branch to read; defaults to the master branch"
                },
                "commit_id": {
                    "type": "string",
                    "description": "IRI of the commit to read; defaults to the branch head"
                },
                "rdf_format": {
                    "type": "string",
                    "enum": ["turtle", "jsonld", "rdf/xml"],
                    "description": "Serialization to return",
                    "default": DEFAULT_RDF_FORMAT
                }
            },
            "required": ["record_id"]
        }),
    )]
}

/// Dispatch a shapes graph tool call.
pub async fn dispatch(
    client: &MobiClient,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    match name {
        "get_shapes_graph" => {
            let record_id = get_string_arg(&args, "record_id")?;
            let query = ShapesGraphQuery {
                branch_id: get_optional_string(&args, "branch_id"),
                commit_id: get_optional_string(&args, "commit_id"),
                rdf_format: Some(
                    get_optional_string(&args, "rdf_format")
                        .unwrap_or_else(|| DEFAULT_RDF_FORMAT.to_string()),
                ),
            };
            client.get_shapes_graph(&record_id, &query).await
        }

        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}
