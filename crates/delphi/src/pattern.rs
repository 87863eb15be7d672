//! Token-level pattern matching for question classification.
//!
//! A pattern is an ordered list of constraints over the annotated tokens;
//! patterns are registered once, in priority order, and the first pattern
//! that matches anywhere in the sequence wins. Quantifiers are greedy.

use crate::token::{TaggedToken, TokenSequence};

/// The closed set of question shapes the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternId {
    /// "How many X does Y have"
    HowMany,
    /// "From which X did Y verb"
    FromWhich,
    /// "What does Y mean"
    Definition,
    /// "What is the last/latest/first X of Y"
    Superlative,
    /// "Who/what is Y" where Y is a name
    Identity,
    /// "When/where did Y verb", "When was Y verbed"
    WhenWhereDid,
    /// "Who/what is the X of Y"
    XOfY,
    /// "Who verbed Y"
    WhoDidX,
    /// "Did X verb Y", "Which X did Y verb in <year>"
    DidXVerbY,
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::HowMany => "how_many",
            Self::FromWhich => "from_which",
            Self::Definition => "definition",
            Self::Superlative => "superlative",
            Self::Identity => "identity",
            Self::WhenWhereDid => "when_where_did",
            Self::XOfY => "x_of_y",
            Self::WhoDidX => "who_did_x",
            Self::DidXVerbY => "did_x_verb_y",
        };
        write!(f, "{}", s)
    }
}

/// Repetition behavior of a single constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantifier {
    #[default]
    One,
    ZeroOrOne,
    ZeroOrMore,
}

/// Predicate over one token. Unset fields match anything; set fields are
/// set-membership tests. Text and lemma compare case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct TokenConstraint {
    text: Option<Vec<&'static str>>,
    lemma: Option<Vec<&'static str>>,
    pos: Option<Vec<&'static str>>,
    dep: Option<Vec<&'static str>>,
    quant: Quantifier,
}

impl TokenConstraint {
    /// Wildcard constraint matching any token.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn text(mut self, values: &[&'static str]) -> Self {
        self.text = Some(values.to_vec());
        self
    }

    pub fn lemma(mut self, values: &[&'static str]) -> Self {
        self.lemma = Some(values.to_vec());
        self
    }

    pub fn pos(mut self, values: &[&'static str]) -> Self {
        self.pos = Some(values.to_vec());
        self
    }

    pub fn dep(mut self, values: &[&'static str]) -> Self {
        self.dep = Some(values.to_vec());
        self
    }

    /// Zero-or-one repetition.
    pub fn opt(mut self) -> Self {
        self.quant = Quantifier::ZeroOrOne;
        self
    }

    /// Zero-or-more repetition.
    pub fn many(mut self) -> Self {
        self.quant = Quantifier::ZeroOrMore;
        self
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quant
    }

    pub fn matches(&self, token: &TaggedToken) -> bool {
        if let Some(texts) = &self.text {
            let lowered = token.text.to_lowercase();
            if !texts.iter().any(|t| *t == lowered) {
                return false;
            }
        }
        if let Some(lemmas) = &self.lemma {
            let lowered = token.lemma.to_lowercase();
            if !lemmas.iter().any(|l| *l == lowered) {
                return false;
            }
        }
        if let Some(poses) = &self.pos {
            if !poses.contains(&token.pos.as_str()) {
                return false;
            }
        }
        if let Some(deps) = &self.dep {
            if !deps.contains(&token.dep.as_str()) {
                return false;
            }
        }
        true
    }
}

/// One registered pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    id: PatternId,
    constraints: Vec<TokenConstraint>,
}

impl Pattern {
    pub fn new(id: PatternId, constraints: Vec<TokenConstraint>) -> Self {
        Self { id, constraints }
    }

    pub fn id(&self) -> PatternId {
        self.id
    }
}

/// Winning classification: pattern plus the half-open matched span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub id: PatternId,
    pub start: usize,
    pub end: usize,
}

/// Priority-ordered pattern table. Built once and never mutated.
#[derive(Debug)]
pub struct Matcher {
    patterns: Vec<Pattern>,
}

impl Matcher {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// The registered question shapes, most specific first. Registration
    /// order is priority order: an earlier pattern beats a later one even
    /// when the later one matches further left.
    pub fn with_default_patterns() -> Self {
        use PatternId::*;
        let c = TokenConstraint::any;
        Self::new(vec![
            Pattern::new(
                HowMany,
                vec![c().text(&["how"]), c().text(&["many"]), c().pos(&["NOUN"])],
            ),
            Pattern::new(
                FromWhich,
                vec![c().text(&["from"]), c().text(&["which"]), c().pos(&["NOUN"])],
            ),
            Pattern::new(
                Definition,
                vec![
                    c().text(&["what"]),
                    c().lemma(&["do"]),
                    c().many(),
                    c().lemma(&["mean"]),
                ],
            ),
            Pattern::new(
                Superlative,
                vec![
                    c().text(&["the"]),
                    c().text(&["last", "latest", "first", "most"]),
                    c().text(&["recent"]).opt(),
                    c().pos(&["NOUN"]),
                ],
            ),
            Pattern::new(
                Identity,
                vec![
                    c().text(&["who", "what"]).dep(&["attr", "nsubj"]),
                    c().lemma(&["be"]),
                    c().pos(&["PROPN"]),
                ],
            ),
            Pattern::new(
                WhenWhereDid,
                vec![
                    c().text(&["when", "where"]),
                    c().dep(&["ROOT", "aux", "auxpass"]),
                ],
            ),
            Pattern::new(
                XOfY,
                vec![
                    c().text(&["who", "what"]).dep(&["attr"]),
                    c().text(&["is", "are", "was", "were"]),
                ],
            ),
            Pattern::new(
                WhoDidX,
                vec![c().text(&["who"]).dep(&["nsubj"]), c().dep(&["ROOT"])],
            ),
            Pattern::new(
                DidXVerbY,
                vec![
                    c().text(&["did", "does"]),
                    c().many(),
                    c().dep(&["ROOT"]).pos(&["VERB"]),
                ],
            ),
        ])
    }

    /// First match by registration priority, then by leftmost position.
    /// Exactly one winning pattern per question; later matches are ignored.
    pub fn find(&self, seq: &TokenSequence) -> Option<MatchResult> {
        for pattern in &self.patterns {
            for start in 0..seq.len() {
                if let Some(end) = match_at(seq, &pattern.constraints, start) {
                    return Some(MatchResult {
                        id: pattern.id,
                        start,
                        end,
                    });
                }
            }
        }
        None
    }
}

/// Try the constraint list at a fixed start position; returns the end of
/// the span on success. Greedy with backtracking, like the annotation
/// engine's own matcher.
fn match_at(seq: &TokenSequence, constraints: &[TokenConstraint], start: usize) -> Option<usize> {
    match_from(seq, constraints, 0, start)
}

fn match_from(
    seq: &TokenSequence,
    constraints: &[TokenConstraint],
    ci: usize,
    pos: usize,
) -> Option<usize> {
    let Some(constraint) = constraints.get(ci) else {
        return Some(pos);
    };
    match constraint.quantifier() {
        Quantifier::One => {
            let token = seq.get(pos)?;
            if constraint.matches(token) {
                match_from(seq, constraints, ci + 1, pos + 1)
            } else {
                None
            }
        }
        Quantifier::ZeroOrOne => {
            if let Some(token) = seq.get(pos) {
                if constraint.matches(token) {
                    if let Some(end) = match_from(seq, constraints, ci + 1, pos + 1) {
                        return Some(end);
                    }
                }
            }
            match_from(seq, constraints, ci + 1, pos)
        }
        Quantifier::ZeroOrMore => {
            let mut max = pos;
            while let Some(token) = seq.get(max) {
                if constraint.matches(token) {
                    max += 1;
                } else {
                    break;
                }
            }
            let mut candidate = max;
            loop {
                if let Some(end) = match_from(seq, constraints, ci + 1, candidate) {
                    return Some(end);
                }
                if candidate == pos {
                    return None;
                }
                candidate -= 1;
            }
        }
    }
}
