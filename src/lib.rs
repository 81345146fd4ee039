//! # mobi-mcp
//!
//! MCP (Model Context Protocol) server for the Mobi semantic data platform.
//!
//! This crate exposes a fixed set of Mobi REST endpoints as tools for AI
//! agents. Each tool validates its arguments against a JSON Schema, forwards
//! the call to Mobi with basic-auth credentials, and hands the response back
//! unchanged. The MCP protocol is served as JSON-RPC 2.0 over stdin/stdout or
//! over HTTP with Server-Sent Events.
//!
//! ## Tools
//!
//! `record_search`, `entity_search`, `get_record`, `list_record_branches`,
//! `create_branch_on_record`, `fetch_ontology_data`, `create_ontology_record`,
//! `update_ontology_record`, `get_shapes_graph`
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in AI tools like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "mobi": {
//!       "command": "/path/to/mobi-mcp",
//!       "env": {
//!         "MOBI_BASE_URL": "https://localhost:8443",
//!         "MOBI_USERNAME": "admin",
//!         "MOBI_PASSWORD": "admin",
//!         "MOBI_IGNORE_CERT": "true"
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use mobi_mcp::{McpServer, MobiClient, MobiConfig};
//!
//! # async fn run() -> mobi_mcp::Result<()> {
//! let config = MobiConfig::from_env()?;
//! let server = McpServer::new(MobiClient::new(config)?);
//!
//! // Reads from stdin, writes to stdout
//! server.run_stdio().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod convert;
mod error;
mod rdf;
mod server;
pub mod sse;
mod tools;

pub use client::{
    EntitySearch, MobiClient, NewBranch, NewOntology, OntologyUpdate, RecordSearch,
    ShapesGraphQuery, DEFAULT_BRANCH_TYPE, DEFAULT_CATALOG, DEFAULT_PAGE_SIZE, RECORD_TYPES,
};
pub use config::MobiConfig;
pub use convert::body_to_text;
pub use error::{McpError, Result};
pub use rdf::RdfFormat;
pub use server::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer};
pub use tools::{ToolDef, ToolRegistry};
