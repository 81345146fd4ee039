//! HTTP client for the Mobi REST API.
//!
//! One method per endpoint. Every request carries basic-auth credentials and
//! honours the certificate policy from [`MobiConfig`]. Failures are returned
//! immediately; there is no retry or caching.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value as JsonValue;

use crate::config::MobiConfig;
use crate::error::{McpError, Result};
use crate::rdf::RdfFormat;

/// Catalog used when a call does not name one.
pub const DEFAULT_CATALOG: &str = "http://mobi.com/catalog-local";
/// Page size used when a call does not set a limit.
pub const DEFAULT_PAGE_SIZE: u64 = 100;
/// Branch type used when creating branches.
pub const DEFAULT_BRANCH_TYPE: &str = "http://mobi.com/ontologies/catalog#Branch";
/// Record types understood by the catalog search.
pub const RECORD_TYPES: [&str; 4] = [
    "http://mobi.com/ontologies/ontology-editor#OntologyRecord",
    "http://mobi.com/ontologies/shapes-graph-editor#ShapesGraphRecord",
    "http://mobi.com/ontologies/delimited#MappingRecord",
    "http://mobi.com/ontologies/dataset#DatasetRecord",
];

const BRANCH_SORT: &str = "http://purl.org/dc/terms/title";
const ENTITY_SORT: &str = "entityName";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const ERROR_BODY_LIMIT: usize = 500;

/// Parameters for a catalog record search.
#[derive(Debug, Clone)]
pub struct RecordSearch {
    /// Catalog IRI
    pub catalog_id: String,
    /// Pagination offset
    pub offset: u64,
    /// Page size
    pub limit: u64,
    /// Free-text filter
    pub search_text: Option<String>,
    /// Keyword filter
    pub keywords: Vec<String>,
    /// Record type IRIs
    pub types: Vec<String>,
}

impl RecordSearch {
    /// Search the default catalog with the given page window.
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            catalog_id: DEFAULT_CATALOG.to_string(),
            offset,
            limit,
            search_text: None,
            keywords: Vec::new(),
            types: Vec::new(),
        }
    }
}

/// Parameters for a catalog entity search.
#[derive(Debug, Clone)]
pub struct EntitySearch {
    /// Catalog IRI
    pub catalog_id: String,
    /// Text matched against entity metadata
    pub query: String,
    /// Pagination offset
    pub offset: u64,
    /// Page size
    pub limit: u64,
    /// Entity type IRIs
    pub types: Vec<String>,
    /// Keyword filter
    pub keywords: Vec<String>,
}

impl EntitySearch {
    /// Search the default catalog for `query`.
    pub fn new(query: impl Into<String>, offset: u64, limit: u64) -> Self {
        Self {
            catalog_id: DEFAULT_CATALOG.to_string(),
            query: query.into(),
            offset,
            limit,
            types: Vec::new(),
            keywords: Vec::new(),
        }
    }
}

/// Selects which version of a shapes graph to fetch.
#[derive(Debug, Clone, Default)]
pub struct ShapesGraphQuery {
    /// Branch IRI
    pub branch_id: Option<String>,
    /// Commit IRI
    pub commit_id: Option<String>,
    /// Serialization Mobi should return (e.g. `turtle`, `jsonld`)
    pub rdf_format: Option<String>,
}

/// A branch to create on a record.
#[derive(Debug, Clone)]
pub struct NewBranch {
    /// Catalog IRI
    pub catalog_id: String,
    /// Branch type IRI
    pub branch_type: String,
    /// Branch title
    pub title: String,
    /// Branch description
    pub description: String,
    /// Commit the branch points at
    pub commit_iri: String,
}

/// An ontology record to create.
#[derive(Debug, Clone)]
pub struct NewOntology {
    /// Serialized ontology
    pub rdf: String,
    /// Serialization of `rdf`
    pub rdf_format: RdfFormat,
    /// Record title
    pub title: String,
    /// Record description
    pub description: String,
    /// Markdown description
    pub markdown_description: Option<String>,
    /// Record keywords
    pub keywords: Vec<String>,
}

/// New content for an existing ontology branch.
#[derive(Debug, Clone)]
pub struct OntologyUpdate {
    /// Branch IRI
    pub branch_id: String,
    /// Commit IRI the changes are based on
    pub commit_id: String,
    /// Serialized ontology
    pub rdf: String,
    /// Serialization of `rdf`
    pub rdf_format: RdfFormat,
}

/// Which statuses count as success for a call.
#[derive(Debug, Clone, Copy)]
enum Accept {
    AnySuccess,
    Only(StatusCode),
}

impl Accept {
    fn matches(self, status: StatusCode) -> bool {
        match self {
            Accept::AnySuccess => status.is_success(),
            Accept::Only(expected) => status == expected,
        }
    }
}

/// Authenticated client for one Mobi server.
#[derive(Debug, Clone)]
pub struct MobiClient {
    config: MobiConfig,
    rest_url: String,
    http: reqwest::Client,
}

impl MobiClient {
    /// Build a client from configuration.
    pub fn new(config: MobiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(config.ignore_cert)
            .build()?;

        if config.ignore_cert {
            tracing::warn!(base_url = %config.base_url, "TLS certificate verification disabled");
        }

        Ok(Self {
            rest_url: config.rest_url(),
            config,
            http,
        })
    }

    // ── Catalog ──────────────────────────────────────────────────────────

    /// List catalog records matching the given filters.
    pub async fn list_records(&self, search: &RecordSearch) -> Result<JsonValue> {
        let url = format!("{}/catalogs/{}/records", self.rest_url, enc(&search.catalog_id));

        let mut params = vec![
            ("offset", search.offset.to_string()),
            ("limit", search.limit.to_string()),
        ];
        if !search.keywords.is_empty() {
            params.push(("keywords", search.keywords.join(",")));
        }
        if let Some(text) = search.search_text.as_deref().filter(|t| !t.is_empty()) {
            params.push(("searchText", text.to_string()));
        }
        if !search.types.is_empty() {
            params.push(("type", search.types.join(",")));
        }

        let request = self.request(Method::GET, &url).query(&params);
        self.send(request, Accept::AnySuccess).await
    }

    /// Search catalog entities whose metadata contain the query text.
    pub async fn entity_search(&self, search: &EntitySearch) -> Result<JsonValue> {
        let url = format!("{}/catalogs/{}/entities", self.rest_url, enc(&search.catalog_id));

        let mut params = vec![
            ("offset", search.offset.to_string()),
            ("limit", search.limit.to_string()),
            ("searchText", search.query.clone()),
            ("sort", ENTITY_SORT.to_string()),
            ("ascending", "true".to_string()),
        ];
        if !search.types.is_empty() {
            params.push(("type", search.types.join(",")));
        }
        if !search.keywords.is_empty() {
            params.push(("keywords", search.keywords.join(",")));
        }

        let request = self.request(Method::GET, &url).query(&params);
        self.send(request, Accept::AnySuccess).await
    }

    /// Fetch a single catalog record.
    pub async fn get_record(&self, catalog_id: &str, record_id: &str) -> Result<JsonValue> {
        let url = format!(
            "{}/catalogs/{}/records/{}",
            self.rest_url,
            enc(catalog_id),
            enc(record_id)
        );
        self.send(self.request(Method::GET, &url), Accept::AnySuccess)
            .await
    }

    /// List the branches of a record, sorted by title.
    pub async fn get_record_branches(
        &self,
        catalog_id: &str,
        record_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<JsonValue> {
        let url = format!(
            "{}/catalogs/{}/records/{}/branches",
            self.rest_url,
            enc(catalog_id),
            enc(record_id)
        );
        let params = [
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
            ("sort", BRANCH_SORT.to_string()),
            ("ascending", "true".to_string()),
        ];
        let request = self.request(Method::GET, &url).query(&params);
        self.send(request, Accept::AnySuccess).await
    }

    /// Create a branch on a record pointing at an existing commit.
    pub async fn create_branch_on_record(
        &self,
        record_id: &str,
        branch: &NewBranch,
    ) -> Result<JsonValue> {
        let url = format!(
            "{}/catalogs/{}/records/{}/branches",
            self.rest_url,
            enc(&branch.catalog_id),
            enc(record_id)
        );
        let form = [
            ("type", branch.branch_type.as_str()),
            ("title", branch.title.as_str()),
            ("description", branch.description.as_str()),
            ("commitId", branch.commit_iri.as_str()),
        ];
        let request = self.request(Method::POST, &url).form(&form);
        self.send(request, Accept::AnySuccess).await
    }

    // ── Ontologies ───────────────────────────────────────────────────────

    /// Fetch ontology data for an ontology record (the record IRI, not the ontology IRI).
    pub async fn get_ontology_data(&self, record_id: &str) -> Result<JsonValue> {
        let url = format!("{}/ontologies/{}", self.rest_url, enc(record_id));
        self.send(self.request(Method::GET, &url), Accept::AnySuccess)
            .await
    }

    /// Upload an ontology as a new ontology record.
    pub async fn create_ontology(&self, ontology: &NewOntology) -> Result<JsonValue> {
        let url = format!("{}/ontologies", self.rest_url);

        let mut form = Form::new()
            .part("file", rdf_part(&ontology.rdf, ontology.rdf_format)?)
            .text("title", ontology.title.clone())
            .text("description", ontology.description.clone());
        if let Some(markdown) = ontology
            .markdown_description
            .as_deref()
            .filter(|m| !m.is_empty())
        {
            form = form.text("markdown", markdown.to_string());
        }
        if !ontology.keywords.is_empty() {
            form = form.text("keywords", ontology.keywords.join(","));
        }

        let request = self.request(Method::POST, &url).multipart(form);
        self.send(request, Accept::Only(StatusCode::CREATED)).await
    }

    /// Upload new content for an ontology record on a branch.
    pub async fn update_ontology(
        &self,
        record_id: &str,
        update: &OntologyUpdate,
    ) -> Result<JsonValue> {
        let url = format!("{}/ontologies/{}", self.rest_url, enc(record_id));
        let params = [
            ("branchId", update.branch_id.as_str()),
            ("commitId", update.commit_id.as_str()),
        ];
        let form = Form::new().part("file", rdf_part(&update.rdf, update.rdf_format)?);

        let request = self
            .request(Method::PUT, &url)
            .query(&params)
            .multipart(form);
        self.send(request, Accept::AnySuccess).await
    }

    // ── Shapes graphs ────────────────────────────────────────────────────

    /// Fetch the shapes graph of a record, optionally at a branch or commit.
    pub async fn get_shapes_graph(
        &self,
        record_id: &str,
        query: &ShapesGraphQuery,
    ) -> Result<JsonValue> {
        let url = format!("{}/shapes-graphs/{}", self.rest_url, enc(record_id));

        let mut params = Vec::new();
        if let Some(branch) = query.branch_id.as_deref().filter(|b| !b.is_empty()) {
            params.push(("branchId", branch));
        }
        if let Some(commit) = query.commit_id.as_deref().filter(|c| !c.is_empty()) {
            params.push(("commitId", commit));
        }
        if let Some(format) = query.rdf_format.as_deref().filter(|f| !f.is_empty()) {
            params.push(("rdfFormat", format));
        }

        let request = self.request(Method::GET, &url).query(&params);
        self.send(request, Accept::AnySuccess).await
    }

    // ── Plumbing ─────────────────────────────────────────────────────────

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!(%method, url, "Mobi request");
        self.http
            .request(method, url)
            .basic_auth(&self.config.username, Some(&self.config.password))
    }

    async fn send(&self, request: RequestBuilder, accept: Accept) -> Result<JsonValue> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Mobi request failed");
            McpError::Request(e)
        })?;
        decode_response(response, accept).await
    }
}

async fn decode_response(response: Response, accept: Accept) -> Result<JsonValue> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    let text = response.text().await?;

    if !accept.matches(status) {
        tracing::warn!(status = status.as_u16(), "Mobi returned an error status");
        return Err(McpError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body: text.chars().take(ERROR_BODY_LIMIT).collect(),
        });
    }

    if text.trim().is_empty() {
        return Ok(JsonValue::Object(serde_json::Map::new()));
    }

    if is_json(&content_type) {
        serde_json::from_str(&text).map_err(|e| McpError::MalformedResponse(e.to_string()))
    } else {
        // Turtle, plain-text IRIs and the like are handed back verbatim.
        Ok(JsonValue::String(text))
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    essence == "application/json" || essence.ends_with("+json")
}

fn rdf_part(rdf: &str, format: RdfFormat) -> Result<Part> {
    Ok(Part::text(rdf.to_string())
        .file_name(format.file_name())
        .mime_str(format.mime_type())?)
}

/// Percent-encode an IRI for use as a single path segment.
fn enc(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enc_escapes_iri_reserved_characters() {
        assert_eq!(
            enc("http://mobi.com/catalog-local"),
            "http%3A%2F%2Fmobi.com%2Fcatalog-local"
        );
        assert_eq!(enc("https://a.b/c#d"), "https%3A%2F%2Fa.b%2Fc%23d");
    }

    #[test]
    fn test_is_json() {
        assert!(is_json("application/json"));
        assert!(is_json("application/json; charset=utf-8"));
        assert!(is_json("application/ld+json"));
        assert!(!is_json("text/turtle"));
        assert!(!is_json(""));
    }

    #[test]
    fn test_accept() {
        assert!(Accept::AnySuccess.matches(StatusCode::OK));
        assert!(Accept::AnySuccess.matches(StatusCode::CREATED));
        assert!(!Accept::AnySuccess.matches(StatusCode::NOT_FOUND));
        assert!(Accept::Only(StatusCode::CREATED).matches(StatusCode::CREATED));
        assert!(!Accept::Only(StatusCode::CREATED).matches(StatusCode::OK));
    }
}
