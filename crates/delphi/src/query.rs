//! Query construction and the candidate search loop.
//!
//! Each question shape owns a parametrized query; the controller walks the
//! entity × relation candidate cross product, entity candidates outermost,
//! and stops at the first pair whose execution binds anything.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{AnswerError, TransportError};
use crate::pattern::PatternId;
use crate::resolve::Candidate;

/// One result row: query variable name to literal value.
pub type BindingRow = BTreeMap<String, String>;

/// Query-execution collaborator. An empty row list means "no match", not
/// an error.
pub trait QueryExecutor {
    fn execute(&self, query: &str) -> Result<Vec<BindingRow>, TransportError>;
}

/// Parametrized query with ordered substitution slots.
#[derive(Debug, Clone, Copy)]
pub struct QueryTemplate {
    text: &'static str,
}

impl QueryTemplate {
    pub fn fill(&self, entity: &str, relation: &str, auxiliary: Option<&str>) -> String {
        self.text
            .replace("{entity}", entity)
            .replace("{relation}", relation)
            .replace("{aux}", auxiliary.unwrap_or(""))
    }
}

const DIRECT: QueryTemplate = QueryTemplate {
    text: "SELECT ?answerLabel WHERE { \
           wd:{entity} wdt:{relation} ?answer . \
           SERVICE wikibase:label { bd:serviceParam wikibase:language \"en\" . } }",
};

const LATEST_STATEMENT: QueryTemplate = QueryTemplate {
    text: "SELECT ?answerLabel WHERE { \
           wd:{entity} p:{relation} ?statement . \
           ?statement ps:{relation} ?answer . \
           ?statement pq:P585 ?date . \
           SERVICE wikibase:label { bd:serviceParam wikibase:language \"en\" . } } \
           ORDER BY DESC(?date) LIMIT 1",
};

const COUNT: QueryTemplate = QueryTemplate {
    text: "SELECT (COUNT(DISTINCT ?answer) AS ?answerCount) WHERE { \
           wd:{entity} wdt:{relation} ?answer . }",
};

const YEAR_QUALIFIED: QueryTemplate = QueryTemplate {
    text: "SELECT ?answerLabel WHERE { \
           wd:{entity} p:{relation} ?statement . \
           ?statement ps:{relation} ?answer . \
           ?statement pq:P585 ?date . \
           FILTER(YEAR(?date) = {aux}) \
           SERVICE wikibase:label { bd:serviceParam wikibase:language \"en\" . } }",
};

/// The query registered for a question shape. Shapes without an auxiliary
/// literal fall back to the plain single-triple form.
pub fn template_for(id: PatternId, has_auxiliary: bool) -> QueryTemplate {
    match id {
        PatternId::Superlative => LATEST_STATEMENT,
        PatternId::HowMany => COUNT,
        PatternId::DidXVerbY if has_auxiliary => YEAR_QUALIFIED,
        _ => DIRECT,
    }
}

/// HTTP client for the SPARQL endpoint.
pub struct WikidataSparql {
    http: reqwest::blocking::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<BTreeMap<String, SparqlValue>>,
}

#[derive(Deserialize)]
struct SparqlValue {
    value: String,
}

impl WikidataSparql {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            endpoint: config.sparql_url.clone(),
        })
    }
}

impl QueryExecutor for WikidataSparql {
    fn execute(&self, query: &str) -> Result<Vec<BindingRow>, TransportError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("query", query), ("format", "json")])
            .send()?;
        if !response.status().is_success() {
            return Err(TransportError::Payload(format!(
                "HTTP {} from query collaborator",
                response.status()
            )));
        }
        let body: SparqlResponse = response.json()?;
        Ok(body
            .results
            .bindings
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(var, v)| (var, v.value))
                    .collect::<BindingRow>()
            })
            .collect())
    }
}

/// Walk the candidate cross product until a pair binds.
///
/// Entity candidates are the outer loop; at most `relation_cap` relation
/// candidates are tried per entity. Both lists keep their search ranking.
/// The first non-empty binding list wins and nothing after it runs; full
/// exhaustion is an answer-not-found failure.
pub fn solve(
    executor: &dyn QueryExecutor,
    id: PatternId,
    entities: &[Candidate],
    relations: &[Candidate],
    auxiliary: Option<&str>,
    relation_cap: usize,
) -> Result<Vec<BindingRow>, AnswerError> {
    let template = template_for(id, auxiliary.is_some());
    for entity in entities {
        for relation in relations.iter().take(relation_cap) {
            let query = template.fill(&entity.id, &relation.id, auxiliary);
            debug!(entity = %entity.id, relation = %relation.id, "trying candidate pair");
            let rows = executor.execute(&query)?;
            if !rows.is_empty() {
                return Ok(rows);
            }
        }
    }
    Err(AnswerError::NoAnswerFound)
}
