//! The question-to-answer pipeline.
//!
//! One strict pass per question: annotate, classify, extract, normalize,
//! resolve, query, format. Each stage either produces the next stage's
//! input or fails with its own error kind; the only loop back is the
//! bounded singularization retry inside relation resolution.

use tracing::debug;

use crate::annotate::{Annotator, HttpAnnotator};
use crate::answer::format_answers;
use crate::config::Config;
use crate::error::{AnswerError, TransportError};
use crate::extract::extract;
use crate::normalize::{is_stop_word, normalize};
use crate::pattern::Matcher;
use crate::query::{solve, QueryExecutor, WikidataSparql};
use crate::resolve::{resolve_entity, resolve_relation, GraphSearch, WikidataSearch};

/// Everything needed to answer questions. Tables and collaborators are
/// built once here and never replaced.
pub struct Pipeline {
    config: Config,
    matcher: Matcher,
    annotator: Box<dyn Annotator>,
    search: Box<dyn GraphSearch>,
    executor: Box<dyn QueryExecutor>,
}

impl Pipeline {
    /// Pipeline wired to the real HTTP collaborators.
    pub fn new(config: Config) -> Result<Self, TransportError> {
        let annotator = HttpAnnotator::new(&config)?;
        let search = WikidataSearch::new(&config)?;
        let executor = WikidataSparql::new(&config)?;
        Ok(Self::with_collaborators(
            config,
            Box::new(annotator),
            Box::new(search),
            Box::new(executor),
        ))
    }

    /// Pipeline with caller-supplied collaborators.
    pub fn with_collaborators(
        config: Config,
        annotator: Box<dyn Annotator>,
        search: Box<dyn GraphSearch>,
        executor: Box<dyn QueryExecutor>,
    ) -> Self {
        Self {
            config,
            matcher: Matcher::with_default_patterns(),
            annotator,
            search,
            executor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Answer one question, or explain why it cannot be answered.
    pub fn answer(&self, question: &str) -> Result<Vec<String>, AnswerError> {
        let cleaned = question.trim().trim_matches(|c| c == '?' || c == ' ');
        let sequence = self.annotator.annotate(cleaned)?;

        let hit = self.matcher.find(&sequence).ok_or(AnswerError::IllFormed)?;
        debug!(pattern = %hit.id, start = hit.start, end = hit.end, "question classified");

        let extraction = extract(&sequence, &hit)?;
        let relation = normalize(&extraction.relation);
        let entity: String = extraction
            .entity
            .iter()
            .filter(|w| !is_stop_word(w))
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        debug!(entity = entity.as_str(), relation = relation.as_str(), "phrases normalized");

        let entities = resolve_entity(self.search.as_ref(), &entity, self.config.search_limit)?;
        let relations =
            resolve_relation(self.search.as_ref(), &relation, self.config.search_limit)?;
        debug!(
            entities = entities.len(),
            relations = relations.len(),
            "candidates resolved"
        );

        let rows = solve(
            self.executor.as_ref(),
            hit.id,
            &entities,
            &relations,
            extraction.auxiliary.as_deref(),
            self.config.relation_cap,
        )?;

        Ok(format_answers(&rows, self.config.date_style))
    }
}
