//! Catalog tools.
//!
//! Tools: record_search, entity_search, get_record, list_record_branches,
//! create_branch_on_record

use serde_json::{json, Map, Value as JsonValue};

use crate::client::{
    EntitySearch, MobiClient, NewBranch, RecordSearch, DEFAULT_BRANCH_TYPE, DEFAULT_CATALOG,
    DEFAULT_PAGE_SIZE,
};
use crate::convert::{
    get_optional_string, get_optional_u64, get_string_arg, get_string_list, get_u64_arg,
};
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::ToolDef;

/// Get all catalog tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "record_search",
            "Search the mobi catalog for records matching the provided criteria. Results are \
             paginated with offset and limit. Optionally filter by search text matched against \
             record metadata, by keywords, and by record type. Valid types are \
             http://mobi.com/ontologies/ontology-editor#OntologyRecord (Ontology/Vocabulary), \
             http://mobi.com/ontologies/shapes-graph-editor#ShapesGraphRecord (SHACL), \
             http://mobi.com/ontologies/delimited#MappingRecord (Mappings), and \
             http://mobi.com/ontologies/dataset#DatasetRecord (Datasets).",
            schema!(object {
                required: {
                    "offset": count => "Starting index of the page to return",
                    "limit": count => "Maximum number of records to return"
                },
                optional: {
                    "search_text": string => "Text to match against record metadata",
                    "keywords": array_string => "Only return records tagged with these keywords",
                    "types": array_string => "Only return records of these record type IRIs"
                }
            }),
        ),
        ToolDef::new(
            "entity_search",
            "Search the mobi catalog for entities whose metadata contain the provided string. \
             Results are sorted by entity name. Optionally filter by entity type IRIs and \
             keywords.",
            schema!(object {
                required: {
                    "search_for": string => "Substring to search for within entity metadata",
                    "offset": count => "Starting index of the page to return",
                    "limit": count => "Maximum number of entities to return"
                },
                optional: {
                    "types": array_string => "Only return entities of these type IRIs",
                    "keywords": array_string => "Only return entities tagged with these keywords"
                }
            }),
        ),
        ToolDef::new(
            "get_record",
            "Fetch the metadata of a single catalog record by its record IRI.",
            json!({
                "type": "object",
                "properties": {
                    "record_id": {
                        "type": "string",
                        "description": "IRI of the record"
                    },
                    "catalog_id": {
                        "type": "string",
                        "description": "IRI of the catalog holding the record",
                        "default": DEFAULT_CATALOG
                    }
                },
                "required": ["record_id"]
            }),
        ),
        ToolDef::new(
            "list_record_branches",
            "List the branches of a versioned record (ontology or shapes graph), sorted by \
             title. Each branch carries the IRI of its head commit, which is needed to create \
             new branches or upload changes.",
            json!({
                "type": "object",
                "properties": {
                    "record_id": {
                        "type": "string",
                        "description": "IRI of the record"
                    },
                    "catalog_id": {
                        "type": "string",
                        "description": "IRI of the catalog holding the record",
                        "default": DEFAULT_CATALOG
                    },
                    "offset": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Starting index of the page to return",
                        "default": 0
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Maximum number of branches to return",
                        "default": DEFAULT_PAGE_SIZE
                    }
                },
                "required": ["record_id"]
            }),
        ),
        ToolDef::new(
            "create_branch_on_record",
            "Create a new branch on a versioned record, starting at the given commit. \
             Returns the IRI of the new branch.",
            json!({
                "type": "object",
                "properties": {
                    "record_id": {
                        "type": "string",
                        "description": "IRI of the record to branch"
                    },
                    "title": {
                        "type": "string",
                        "description": "Title of the new branch"
                    },
                    "description": {
                        "type": "string",
                        "description": "Description of the new branch"
                    },
                    "commit_iri": {
                        "type": "string",
                        "description": "IRI of the commit the branch starts from"
                    },
                    "catalog_id": {
                        "type": "string",
                        "description": "IRI of the catalog holding the record",
                        "default": DEFAULT_CATALOG
                    },
                    "branch_type": {
                        "type": "string",
                        "description": "IRI of the branch type",
                        "default": DEFAULT_BRANCH_TYPE
                    }
                },
                "required": ["record_id", "title", "description", "commit_iri"]
            }),
        ),
    ]
}

/// Dispatch a catalog tool call.
pub async fn dispatch(
    client: &MobiClient,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    match name {
        "record_search" => {
            let mut search = RecordSearch::new(
                get_u64_arg(&args, "offset")?,
                get_u64_arg(&args, "limit")?,
            );
            search.search_text = get_optional_string(&args, "search_text");
            search.keywords = get_string_list(&args, "keywords")?;
            search.types = get_string_list(&args, "types")?;
            client.list_records(&search).await
        }

        "entity_search" => {
            let mut search = EntitySearch::new(
                get_string_arg(&args, "search_for")?,
                get_u64_arg(&args, "offset")?,
                get_u64_arg(&args, "limit")?,
            );
            search.types = get_string_list(&args, "types")?;
            search.keywords = get_string_list(&args, "keywords")?;
            client.entity_search(&search).await
        }

        "get_record" => {
            let record_id = get_string_arg(&args, "record_id")?;
            let catalog_id = catalog_arg(&args);
            client.get_record(&catalog_id, &record_id).await
        }

        "list_record_branches" => {
            let record_id = get_string_arg(&args, "record_id")?;
            let catalog_id = catalog_arg(&args);
            let offset = get_optional_u64(&args, "offset").unwrap_or(0);
            let limit = get_optional_u64(&args, "limit").unwrap_or(DEFAULT_PAGE_SIZE);
            client
                .get_record_branches(&catalog_id, &record_id, offset, limit)
                .await
        }

        "create_branch_on_record" => {
            let record_id = get_string_arg(&args, "record_id")?;
            let branch = NewBranch {
                catalog_id: catalog_arg(&args),
                branch_type: get_optional_string(&args, "branch_type")
                    .unwrap_or_else(|| DEFAULT_BRANCH_TYPE.to_string()),
                title: get_string_arg(&args, "title")?,
                description: get_string_arg(&args, "description")?,
                commit_iri: get_string_arg(&args, "commit_iri")?,
            };
            client.create_branch_on_record(&record_id, &branch).await
        }

        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}

fn catalog_arg(args: &Map<String, JsonValue>) -> String {
    get_optional_string(args, "catalog_id").unwrap_or_else(|| DEFAULT_CATALOG.to_string())
}
