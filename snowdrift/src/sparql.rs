//! SPARQL query execution against a remote endpoint.
//!
//! The pipeline only depends on the [`QueryClient`] trait, so tests can
//! substitute canned rows without any network access. [`HttpQueryClient`]
//! is the production implementation, speaking the SPARQL 1.1 Protocol
//! (query via POST, results as `application/sparql-results+json`).

use std::collections::BTreeMap;

use eyre::Result;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use url::Url;

use crate::Error;

/// A single bound cell value from a query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// An IRI reference.
    Uri(String),
    /// A literal, with any language tag or datatype discarded.
    Literal(String),
    /// A blank node label.
    Blank(String),
}

impl Term {
    /// The lexical value of the term, regardless of its kind.
    pub fn value(&self) -> &str {
        match self {
            Term::Uri(v) | Term::Literal(v) | Term::Blank(v) => v,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Term::Uri(_) => "uri",
            Term::Literal(_) => "literal",
            Term::Blank(_) => "bnode",
        }
    }
}

// Serialized as `{ "type": ..., "value": ... }` so that templates address
// cells as `{{column.value}}`.
impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", self.kind())?;
        map.serialize_entry("value", self.value())?;
        map.end()
    }
}

/// One result row: a mapping from column name to its bound term. Columns
/// left unbound by the endpoint are simply absent.
pub type ResultRow = BTreeMap<String, Term>;

/// The boundary to the query endpoint. Invoked once per view per build; row
/// order must be preserved verbatim, since multipage fan-out relies on it.
pub trait QueryClient {
    /// Execute a SPARQL query, returning rows in endpoint order.
    fn query(&self, sparql: &str) -> Result<Vec<ResultRow>>;
}

// Wire format of a SPARQL JSON results term. Anything that is not an IRI or
// a blank node ("literal", "typed-literal") collapses into `Term::Literal`.
#[derive(Debug, Deserialize)]
struct RawTerm {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

impl From<RawTerm> for Term {
    fn from(raw: RawTerm) -> Self {
        match raw.kind.as_str() {
            "uri" => Term::Uri(raw.value),
            "bnode" => Term::Blank(raw.value),
            _ => Term::Literal(raw.value),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResultsDocument {
    results: BindingsSection,
}

#[derive(Debug, Deserialize)]
struct BindingsSection {
    bindings: Vec<BTreeMap<String, RawTerm>>,
}

fn parse_results(body: &str) -> Result<Vec<ResultRow>, Error> {
    let document: ResultsDocument = serde_json::from_str(body)?;
    Ok(document
        .results
        .bindings
        .into_iter()
        .map(|row| row.into_iter().map(|(name, term)| (name, term.into())).collect())
        .collect())
}

/// Synchronous SPARQL protocol client over HTTP.
pub struct HttpQueryClient {
    endpoint: Url,
    http: reqwest::blocking::Client,
}

impl HttpQueryClient {
    /// Constructor. The endpoint must already be validated as an absolute
    /// URL (see [`crate::SiteConfig::endpoint_url`]).
    pub fn new(endpoint: Url) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("snowdrift/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::QueryTransport(endpoint.to_string(), e))?;
        Ok(Self { endpoint, http })
    }
}

impl QueryClient for HttpQueryClient {
    fn query(&self, sparql: &str) -> Result<Vec<ResultRow>> {
        debug!("Querying {} ({} bytes)", self.endpoint, sparql.len());
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/sparql-query")
            .header(ACCEPT, "application/sparql-results+json")
            .body(sparql.to_string())
            .send()
            .map_err(|e| Error::QueryTransport(self.endpoint.to_string(), e))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::QueryTransport(self.endpoint.to_string(), e))?;
        if !status.is_success() {
            // Endpoints report query rejections in the response body.
            return Err(Error::QueryRejected(status.as_u16(), body.trim().to_string()).into());
        }
        Ok(parse_results(&body)?)
    }
}
