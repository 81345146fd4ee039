//! Ontology tools.
//!
//! Tools: fetch_ontology_data, create_ontology_record, update_ontology_record

use serde_json::{json, Map, Value as JsonValue};

use crate::client::{MobiClient, NewOntology, OntologyUpdate};
use crate::convert::{get_optional_string, get_string_arg, get_string_list};
use crate::error::{McpError, Result};
use crate::rdf::RdfFormat;
use crate::schema;
use crate::tools::ToolDef;

/// Get all ontology tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "fetch_ontology_data",
            "Fetch ontology data for a given ontology record IRI (not the ontology IRI itself, \
             but the IRI of the 'record' containing the ontology data, as found under \
             \"record\": {\"iri\": ...} in search results).",
            schema!(object {
                required: {
                    "ontology_iri": string => "IRI of the record containing the ontology"
                }
            }),
        ),
        ToolDef::new(
            "create_ontology_record",
            "Create an ontology record with the specified metadata and JSON-LD content. The \
             metadata includes title, description, optional markdown description, and keywords. \
             The JSON-LD content is the ontology itself. Set rdf_format when the content is in \
             another RDF serialization.",
            json!({
                "type": "object",
                "properties": {
                    "jsonld": {
                        "type": "string",
                        "description": "The ontology content"
                    },
                    "title": {
                        "type": "string",
                        "description": "Title of the new record"
                    },
                    "description": {
                        "type": "string",
                        "description": "Short description of the ontology"
                    },
                    "markdown_description": {
                        "type": "string",
                        "description": "Markdown-formatted long description"
                    },
                    "keywords": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Keywords to tag the record with"
                    },
                    "rdf_format": {
                        "type": "string",
                        "enum": RdfFormat::NAMES,
                        "description": "Serialization of the content",
                        "default": "jsonld"
                    }
                },
                "required": ["jsonld", "title", "description"]
            }),
        ),
        ToolDef::new(
            "update_ontology_record",
            "Upload new content for an ontology record on a branch. Mobi computes the \
             difference against the given commit and records it as a new commit on the \
             branch. Use list_record_branches to find the branch and its head commit.",
            json!({
                "type": "object",
                "properties": {
                    "record_id": {
                        "type": "string",
                        "description": "IRI of the ontology record"
                    },
                    "branch_id": {
                        "type": "string",
                        "description": "IRI of the branch to update"
                    },
                    "commit_id": {
                        "type": "string",
                        "description": "IRI of the commit the changes are based on"
                    },
                    "rdf": {
                        "type": "string",
                        "description": "The complete new ontology content"
                    },
                    "rdf_format": {
                        "type": "string",
                        "enum": RdfFormat::NAMES,
                        "description": "Serialization of the content"
                    }
                },
                "required": ["record_id", "branch_id", "commit_id", "rdf", "rdf_format"]
            }),
        ),
    ]
}

/// Dispatch an ontology tool call.
pub async fn dispatch(
    client: &MobiClient,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    match name {
        "fetch_ontology_data" => {
            let record_id = get_string_arg(&args, "ontology_iri")?;
            client.get_ontology_data(&record_id).await
        }

        "create_ontology_record" => {
            let rdf_format = match get_optional_string(&args, "rdf_format") {
                Some(format) => format.parse()?,
                None => RdfFormat::JsonLd,
            };
            let ontology = NewOntology {
                rdf: get_string_arg(&args, "jsonld")?,
                rdf_format,
                title: get_string_arg(&args, "title")?,
                description: get_string_arg(&args, "description")?,
                markdown_description: get_optional_string(&args, "markdown_description"),
                keywords: get_string_list(&args, "keywords")?,
            };
            client.create_ontology(&ontology).await
        }

        "update_ontology_record" => {
            let record_id = get_string_arg(&args, "record_id")?;
            let update = OntologyUpdate {
                branch_id: get_string_arg(&args, "branch_id")?,
                commit_id: get_string_arg(&args, "commit_id")?,
                rdf: get_string_arg(&args, "rdf")?,
                rdf_format: get_string_arg(&args, "rdf_format")?.parse()?,
            };
            client.update_ontology(&record_id, &update).await
        }

        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}
