//! Resolution of free text into ranked knowledge-graph identifiers.
//!
//! Talks to the Wikidata search API through the `GraphSearch` seam so
//! tests can substitute an in-memory collaborator. Candidate order is the
//! collaborator's relevance order and is never re-sorted here; the only
//! ordering this module imposes is longest-first on the singularized
//! relation variants tried during the single fallback round.

use std::time::Duration;

use deunicode::deunicode;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{AnswerError, TransportError};

/// Title prefix the collaborator puts on property pages.
const PROPERTY_TITLE_PREFIX: &str = "Property:";

/// Search namespace of the knowledge graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Item,
    Property,
}

impl Namespace {
    /// Numeric namespace the search collaborator expects.
    fn id(self) -> u32 {
        match self {
            Namespace::Item => 0,
            Namespace::Property => 120,
        }
    }
}

/// One ranked search hit: an opaque graph identifier plus its page label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub label: String,
}

/// Text-search collaborator over the knowledge graph.
pub trait GraphSearch {
    /// Up to `limit` candidates in the given namespace, best first. An
    /// empty list means no match; transport problems are errors.
    fn search(
        &self,
        text: &str,
        namespace: Namespace,
        limit: usize,
    ) -> Result<Vec<Candidate>, TransportError>;
}

/// HTTP client for the MediaWiki search endpoint.
pub struct WikidataSearch {
    http: reqwest::blocking::Client,
    api_url: String,
    language: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchSection>,
}

#[derive(Deserialize)]
struct SearchSection {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

impl WikidataSearch {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            api_url: config.search_url.clone(),
            language: config.language.clone(),
        })
    }
}

impl GraphSearch for WikidataSearch {
    fn search(
        &self,
        text: &str,
        namespace: Namespace,
        limit: usize,
    ) -> Result<Vec<Candidate>, TransportError> {
        let folded = deunicode(text);
        let namespace_id = namespace.id().to_string();
        let limit_param = limit.to_string();
        let params: [(&str, &str); 8] = [
            ("action", "query"),
            ("format", "json"),
            ("list", "search"),
            ("srsearch", &folded),
            ("srnamespace", &namespace_id),
            ("srlimit", &limit_param),
            ("srprop", ""),
            ("uselang", &self.language),
        ];
        let response = self.http.get(&self.api_url).query(&params).send()?;
        if !response.status().is_success() {
            return Err(TransportError::Payload(format!(
                "HTTP {} from search collaborator",
                response.status()
            )));
        }
        let body: SearchResponse = response.json()?;
        let hits = body.query.map(|q| q.search).unwrap_or_default();
        Ok(hits
            .into_iter()
            .map(|hit| candidate_from_title(hit.title, namespace))
            .collect())
    }
}

/// Property titles carry the collaborator's namespace prefix; the bare
/// identifier is everything after it.
fn candidate_from_title(title: String, namespace: Namespace) -> Candidate {
    let id = match namespace {
        Namespace::Property => title
            .strip_prefix(PROPERTY_TITLE_PREFIX)
            .unwrap_or(&title)
            .to_string(),
        Namespace::Item => title.clone(),
    };
    Candidate { id, label: title }
}

/// Entity lookup: collaborator order preserved, empty means not found.
pub fn resolve_entity(
    search: &dyn GraphSearch,
    text: &str,
    limit: usize,
) -> Result<Vec<Candidate>, AnswerError> {
    let found = search.search(text, Namespace::Item, limit)?;
    if found.is_empty() {
        return Err(AnswerError::EntityNotFound(text.to_string()));
    }
    Ok(found)
}

/// Relation lookup with the bounded singularization fallback: when the
/// canonical phrase finds nothing, each derived variant is tried once,
/// longest first, and then the lookup fails for good. An explicit single
/// round, never a recursive retry.
pub fn resolve_relation(
    search: &dyn GraphSearch,
    phrase: &str,
    limit: usize,
) -> Result<Vec<Candidate>, AnswerError> {
    let found = search.search(phrase, Namespace::Property, limit)?;
    if !found.is_empty() {
        return Ok(found);
    }
    for variant in singular_variants(phrase) {
        debug!(phrase, variant = variant.as_str(), "retrying property search singularized");
        let found = search.search(&variant, Namespace::Property, limit)?;
        if !found.is_empty() {
            return Ok(found);
        }
    }
    Err(AnswerError::RelationNotFound(phrase.to_string()))
}

/// Alternate relation phrases with a trailing plural "s" removed, most
/// specific (longest) first. The input phrase itself is excluded.
pub fn singular_variants(phrase: &str) -> Vec<String> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let singular = |w: &str| w[..w.len() - 1].to_string();
    let plural_positions: Vec<usize> = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.len() > 1 && w.ends_with('s'))
        .map(|(i, _)| i)
        .collect();
    if plural_positions.is_empty() {
        return Vec::new();
    }

    let mut variants: Vec<String> = Vec::new();
    let mut push = |variant: String| {
        if variant != phrase && !variants.contains(&variant) {
            variants.push(variant);
        }
    };
    // One variant per plural word, then everything singularized at once.
    for &i in &plural_positions {
        let rewritten: Vec<String> = words
            .iter()
            .enumerate()
            .map(|(j, w)| if j == i { singular(w) } else { w.to_string() })
            .collect();
        push(rewritten.join(" "));
    }
    if plural_positions.len() > 1 {
        let rewritten: Vec<String> = words
            .iter()
            .map(|w| {
                if w.len() > 1 && w.ends_with('s') {
                    singular(w)
                } else {
                    w.to_string()
                }
            })
            .collect();
        push(rewritten.join(" "));
    }
    variants.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    variants
}
