//! Per-pattern extraction of entity and relation phrases.
//!
//! One extractor per `PatternId`, selected through the `match` dispatch
//! below. Extractors apply dependency-tree rules over the full token
//! sequence; a missing syntactic role is an extraction failure, never a
//! panic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AnswerError;
use crate::pattern::{MatchResult, PatternId};
use crate::token::TokenSequence;

/// Four-digit year carried as the auxiliary literal, e.g. the "2013" in
/// "Which award did AC/DC receive in 2013?".
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(1[0-9]{3}|20[0-9]{2})$").unwrap());

/// Phrases pulled out of one classified question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Ordered token texts naming the entity.
    pub entity: Vec<String>,
    /// Ordered raw relation words, pre-normalization.
    pub relation: Vec<String>,
    /// Optional qualifying literal (a year).
    pub auxiliary: Option<String>,
}

/// Run the extractor registered for the winning pattern.
pub fn extract(seq: &TokenSequence, hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let extractor = match hit.id {
        PatternId::HowMany => how_many,
        PatternId::FromWhich => from_which,
        PatternId::Definition => definition,
        PatternId::Superlative => superlative,
        PatternId::Identity => identity,
        PatternId::WhenWhereDid => when_where_did,
        PatternId::XOfY => x_of_y,
        PatternId::WhoDidX => who_did_x,
        PatternId::DidXVerbY => did_x_verb_y,
    };
    extractor(seq, hit)
}

fn missing(role: &'static str) -> AnswerError {
    AnswerError::IncompleteExtraction { role }
}

/// First four-digit year anywhere in the question.
fn find_year(seq: &TokenSequence) -> Option<String> {
    seq.iter()
        .find(|t| YEAR_RE.is_match(&t.text))
        .map(|t| t.text.clone())
}

/// "Who is the director of Titanic": the relation is the left modifiers of
/// the preposition's head's head plus that head itself; the entity is the
/// full subtree under the prepositional object.
fn x_of_y(seq: &TokenSequence, _hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let pobj = seq
        .first_with_dep(&["pobj"])
        .ok_or_else(|| missing("prepositional object"))?;
    let attr = seq.head_of(seq.head_of(pobj));
    let mut relation = seq.texts(&seq.lefts(attr));
    relation.push(seq.get(attr).ok_or_else(|| missing("relation noun"))?.text.clone());
    let entity = seq.texts(&seq.subtree(pobj));
    Ok(Extraction {
        entity,
        relation,
        auxiliary: None,
    })
}

/// "Who is Tom Cruise": entity is the name after the copula; the relation
/// is the interrogative plus the copula lemma.
fn identity(seq: &TokenSequence, hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let interrogative = seq
        .get(hit.start)
        .ok_or_else(|| missing("interrogative"))?
        .text
        .to_lowercase();
    // Climb from the matched name token to the head of the name chain.
    // Hop count bounded in case the collaborator hands back a cyclic tree.
    let mut name = hit.end - 1;
    for _ in 0..seq.len() {
        let head = seq.head_of(name);
        if head == name || seq.get(head).map(|t| t.pos.as_str()) != Some("PROPN") {
            break;
        }
        name = head;
    }
    let entity = seq.texts(&seq.subtree(name));
    if entity.is_empty() {
        return Err(missing("name"));
    }
    Ok(Extraction {
        entity,
        relation: vec![interrogative, "be".to_string()],
        auxiliary: None,
    })
}

/// "What does procrastination mean": the entity is everything strictly
/// between the do-form and "mean".
fn definition(seq: &TokenSequence, hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let indices: Vec<usize> = (hit.start + 2..hit.end.saturating_sub(1)).collect();
    let entity = seq.texts(&indices);
    if entity.is_empty() {
        return Err(missing("term"));
    }
    Ok(Extraction {
        entity,
        relation: vec!["what".to_string(), "mean".to_string()],
        auxiliary: None,
    })
}

/// "When was Michael Jackson born": entity is the subject subtree; the
/// relation pairs the question word with the final token's lemma.
fn when_where_did(seq: &TokenSequence, hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let subject = seq
        .first_with_dep(&["nsubj", "nsubjpass"])
        .ok_or_else(|| missing("subject"))?;
    let entity = seq.texts(&seq.subtree(subject));
    let question_word = seq
        .get(hit.start)
        .ok_or_else(|| missing("question word"))?
        .lemma
        .to_lowercase();
    let verb = seq
        .get(seq.len().saturating_sub(1))
        .ok_or_else(|| missing("main verb"))?
        .lemma
        .to_lowercase();
    Ok(Extraction {
        entity,
        relation: vec![question_word, verb],
        auxiliary: None,
    })
}

/// "How many children does Michael Jackson have": the counted noun is the
/// relation, the root's subject is the entity.
fn how_many(seq: &TokenSequence, hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let counted = seq
        .get(hit.start + 2)
        .ok_or_else(|| missing("counted noun"))?
        .text
        .clone();
    let root = seq.first_with_dep(&["ROOT"]).ok_or_else(|| missing("main verb"))?;
    let subject = seq
        .children(root)
        .into_iter()
        .find(|&i| {
            seq.get(i)
                .map(|t| t.dep == "nsubj" || t.dep == "nsubjpass")
                .unwrap_or(false)
        })
        .ok_or_else(|| missing("subject"))?;
    Ok(Extraction {
        entity: seq.texts(&seq.subtree(subject)),
        relation: vec![counted],
        auxiliary: None,
    })
}

/// "From which country did Queen originate": the noun after "which" is the
/// relation, the root's subject is the entity.
fn from_which(seq: &TokenSequence, hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let noun = seq
        .get(hit.start + 2)
        .ok_or_else(|| missing("relation noun"))?
        .text
        .clone();
    let root = seq.first_with_dep(&["ROOT"]).ok_or_else(|| missing("main verb"))?;
    let subject = seq
        .children(root)
        .into_iter()
        .find(|&i| seq.get(i).map(|t| t.dep.starts_with("nsubj")).unwrap_or(false))
        .ok_or_else(|| missing("subject"))?;
    Ok(Extraction {
        entity: seq.texts(&seq.subtree(subject)),
        relation: vec![noun],
        auxiliary: None,
    })
}

/// "Who composed the St Matthew Passion": relation is "who" plus the root
/// lemma; entity is the root's direct object subtree, falling back to the
/// tokens after the matched span.
fn who_did_x(seq: &TokenSequence, hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let root = seq.first_with_dep(&["ROOT"]).ok_or_else(|| missing("main verb"))?;
    let relation = vec![
        "who".to_string(),
        seq.get(root).ok_or_else(|| missing("main verb"))?.lemma.to_lowercase(),
    ];
    let object = seq
        .children(root)
        .into_iter()
        .find(|&i| seq.get(i).map(|t| t.dep == "dobj").unwrap_or(false));
    let entity = match object {
        Some(obj) => seq.texts(&seq.subtree(obj)),
        None => {
            let rest: Vec<usize> = (hit.end..seq.len()).collect();
            seq.texts(&rest)
        }
    };
    if entity.is_empty() {
        return Err(missing("object"));
    }
    Ok(Extraction {
        entity,
        relation,
        auxiliary: None,
    })
}

/// "Which award did AC/DC receive in 2013": entity is the subject subtree;
/// the relation is the wh-determined object noun when the question fronts
/// one, otherwise the root verb lemma; a year token becomes the auxiliary.
fn did_x_verb_y(seq: &TokenSequence, _hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let entity = match seq.first_with_dep(&["nsubj", "nsubjpass"]) {
        Some(subject) => seq.texts(&seq.subtree(subject)),
        // The annotation engine's entity span is the last resort.
        None => seq
            .entity_spans()
            .into_iter()
            .next()
            .map(|span| seq.texts(&span))
            .ok_or_else(|| missing("subject"))?,
    };
    if entity.is_empty() {
        return Err(missing("subject"));
    }

    let root = seq.first_with_dep(&["ROOT"]).ok_or_else(|| missing("main verb"))?;
    let fronted_object = seq.iter().enumerate().position(|(i, t)| {
        t.dep == "dobj"
            && seq.lefts(i).iter().any(|&l| {
                seq.get(l)
                    .map(|d| {
                        let lowered = d.text.to_lowercase();
                        lowered == "which" || lowered == "what"
                    })
                    .unwrap_or(false)
            })
    });
    let relation = match fronted_object {
        Some(obj) => vec![seq.get(obj).ok_or_else(|| missing("object"))?.text.clone()],
        None => vec![seq.get(root).ok_or_else(|| missing("main verb"))?.lemma.to_lowercase()],
    };

    Ok(Extraction {
        entity,
        relation,
        auxiliary: find_year(seq),
    })
}

/// "What is the last album of Queen": the span's noun is the relation; the
/// entity is a prepositional object subtree when present, otherwise the
/// subject subtree.
fn superlative(seq: &TokenSequence, hit: &MatchResult) -> Result<Extraction, AnswerError> {
    let noun = seq
        .get(hit.end - 1)
        .ok_or_else(|| missing("relation noun"))?
        .text
        .clone();
    let anchor = seq
        .first_with_dep(&["pobj"])
        .or_else(|| seq.first_with_dep(&["nsubj", "nsubjpass"]))
        .ok_or_else(|| missing("subject"))?;
    Ok(Extraction {
        entity: seq.texts(&seq.subtree(anchor)),
        relation: vec![noun],
        auxiliary: None,
    })
}
