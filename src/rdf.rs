//! RDF serialization formats accepted for ontology uploads.
//!
//! Payloads are never parsed here. The format only decides how the upload
//! is labelled so Mobi picks the right parser on its side.

use std::fmt;
use std::str::FromStr;

use crate::error::McpError;

/// An RDF serialization Mobi can ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// JSON-LD
    JsonLd,
    /// Turtle
    Turtle,
    /// RDF/XML
    RdfXml,
    /// N-Triples
    NTriples,
    /// N-Quads
    NQuads,
    /// TriG
    TriG,
    /// OWL/XML
    OwlXml,
    /// OBO flat file
    Obo,
}

impl RdfFormat {
    /// Names accepted by [`RdfFormat::from_str`], in schema order.
    pub const NAMES: [&'static str; 8] = [
        "jsonld", "turtle", "rdfxml", "ntriples", "nquads", "trig", "owlxml", "obo",
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            RdfFormat::JsonLd => "jsonld",
            RdfFormat::Turtle => "turtle",
            RdfFormat::RdfXml => "rdfxml",
            RdfFormat::NTriples => "ntriples",
            RdfFormat::NQuads => "nquads",
            RdfFormat::TriG => "trig",
            RdfFormat::OwlXml => "owlxml",
            RdfFormat::Obo => "obo",
        }
    }

    /// File name used for the multipart upload; Mobi keys its parser off the extension.
    pub fn file_name(self) -> &'static str {
        match self {
            RdfFormat::JsonLd => "ontology.jsonld",
            RdfFormat::Turtle => "ontology.ttl",
            RdfFormat::RdfXml => "ontology.rdf",
            RdfFormat::NTriples => "ontology.nt",
            RdfFormat::NQuads => "ontology.nq",
            RdfFormat::TriG => "ontology.trig",
            RdfFormat::OwlXml => "ontology.owx",
            RdfFormat::Obo => "ontology.obo",
        }
    }

    /// MIME type of the upload part.
    pub fn mime_type(self) -> &'static str {
        match self {
            RdfFormat::JsonLd => "application/ld+json",
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::RdfXml => "application/rdf+xml",
            RdfFormat::NTriples => "application/n-triples",
            RdfFormat::NQuads => "application/n-quads",
            RdfFormat::TriG => "application/trig",
            RdfFormat::OwlXml => "application/owl+xml",
            RdfFormat::Obo => "text/plain",
        }
    }
}

impl FromStr for RdfFormat {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jsonld" => Ok(RdfFormat::JsonLd),
            "turtle" => Ok(RdfFormat::Turtle),
            "rdfxml" => Ok(RdfFormat::RdfXml),
            "ntriples" => Ok(RdfFormat::NTriples),
            "nquads" => Ok(RdfFormat::NQuads),
            "trig" => Ok(RdfFormat::TriG),
            "owlxml" => Ok(RdfFormat::OwlXml),
            "obo" => Ok(RdfFormat::Obo),
            other => Err(McpError::InvalidArg {
                name: "rdf_format".to_string(),
                reason: format!(
                    "Unsupported RDF format '{}'. Use one of: {}",
                    other,
                    Self::NAMES.join(", ")
                ),
            }),
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_canonical_name_parses_back() {
        for name in RdfFormat::NAMES {
            let format: RdfFormat = name.parse().unwrap();
            assert_eq!(format.name(), name);
        }
    }

    #[test]
    fn test_only_canonical_names_parse() {
        for alias in ["JSON-LD", "ttl", "xml", "Turtle", " jsonld"] {
            assert!(alias.parse::<RdfFormat>().is_err(), "{alias}");
        }
    }

    #[test]
    fn test_unknown_format_is_invalid_arg() {
        let err = "n3".parse::<RdfFormat>().unwrap_err();
        assert!(matches!(err, McpError::InvalidArg { ref name, .. } if name == "rdf_format"));
    }

    #[test]
    fn test_upload_labels() {
        assert_eq!(RdfFormat::JsonLd.file_name(), "ontology.jsonld");
        assert_eq!(RdfFormat::Turtle.mime_type(), "text/turtle");
    }
}
