//! Annotated token model produced by the annotation collaborator.
//!
//! A `TokenSequence` is read-only once built: the pipeline only ever walks
//! it through the enumeration helpers below.

use serde::{Deserialize, Serialize};

/// IOB entity-span tag attached to each token by the annotation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntIob {
    #[serde(rename = "B")]
    Begin,
    #[serde(rename = "I")]
    Inside,
    #[serde(rename = "O")]
    Outside,
}

/// One annotated token. `head` is the index of the syntactic head; the
/// root token points at itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub lemma: String,
    /// Coarse part of speech (NOUN, VERB, PROPN, ...)
    pub pos: String,
    /// Fine-grained tag (NN, VBD, WDT, ...)
    pub tag: String,
    /// Dependency label (nsubj, pobj, ROOT, ...)
    pub dep: String,
    pub head: usize,
    pub ent_iob: EntIob,
}

/// Ordered token sequence for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSequence {
    tokens: Vec<TaggedToken>,
}

impl TokenSequence {
    pub fn new(tokens: Vec<TaggedToken>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TaggedToken> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaggedToken> {
        self.tokens.iter()
    }

    /// Index of the head of `index`, clamped to the sequence.
    pub fn head_of(&self, index: usize) -> usize {
        self.tokens
            .get(index)
            .map(|t| t.head.min(self.tokens.len().saturating_sub(1)))
            .unwrap_or(index)
    }

    /// First token whose dependency label is in `deps`.
    pub fn first_with_dep(&self, deps: &[&str]) -> Option<usize> {
        self.tokens.iter().position(|t| deps.contains(&t.dep.as_str()))
    }

    /// Direct syntactic children of `head`, in token order.
    pub fn children(&self, head: usize) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(i, t)| t.head == head && *i != head)
            .map(|(i, _)| i)
            .collect()
    }

    /// Children of `head` that sit to its left, in token order.
    pub fn lefts(&self, head: usize) -> Vec<usize> {
        self.children(head).into_iter().filter(|&i| i < head).collect()
    }

    /// Children of `head` that sit to its right, in token order.
    pub fn rights(&self, head: usize) -> Vec<usize> {
        self.children(head).into_iter().filter(|&i| i > head).collect()
    }

    /// `root` plus all tokens transitively dependent on it, in token order.
    pub fn subtree(&self, root: usize) -> Vec<usize> {
        let mut member = vec![false; self.tokens.len()];
        if root >= self.tokens.len() {
            return Vec::new();
        }
        member[root] = true;
        let mut queue = vec![root];
        while let Some(head) = queue.pop() {
            for child in self.children(head) {
                if !member[child] {
                    member[child] = true;
                    queue.push(child);
                }
            }
        }
        member
            .iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(|(i, _)| i)
            .collect()
    }

    /// Token texts at the given indices, preserving order.
    pub fn texts(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|&i| self.tokens.get(i))
            .map(|t| t.text.clone())
            .collect()
    }

    /// Maximal runs of tokens tagged B/I by the annotation engine.
    pub fn entity_spans(&self) -> Vec<Vec<usize>> {
        let mut spans: Vec<Vec<usize>> = Vec::new();
        for (i, tok) in self.tokens.iter().enumerate() {
            match tok.ent_iob {
                EntIob::Begin => spans.push(vec![i]),
                EntIob::Inside => match spans.last_mut() {
                    Some(span) if span.last().copied() == Some(i.saturating_sub(1)) => {
                        span.push(i)
                    }
                    _ => spans.push(vec![i]),
                },
                EntIob::Outside => {}
            }
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str, dep: &str, head: usize, iob: EntIob) -> TaggedToken {
        TaggedToken {
            text: text.to_string(),
            lemma: text.to_lowercase(),
            pos: "NOUN".to_string(),
            tag: "NN".to_string(),
            dep: dep.to_string(),
            head,
            ent_iob: iob,
        }
    }

    // "the director of Titanic": director is root, "the" and "of" attach to
    // it, "Titanic" attaches to "of".
    fn sample() -> TokenSequence {
        TokenSequence::new(vec![
            tok("the", "det", 1, EntIob::Outside),
            tok("director", "ROOT", 1, EntIob::Outside),
            tok("of", "prep", 1, EntIob::Outside),
            tok("Titanic", "pobj", 2, EntIob::Begin),
        ])
    }

    #[test]
    fn subtree_is_transitive_and_ordered() {
        let seq = sample();
        assert_eq!(seq.subtree(1), vec![0, 1, 2, 3]);
        assert_eq!(seq.subtree(2), vec![2, 3]);
        assert_eq!(seq.subtree(3), vec![3]);
    }

    #[test]
    fn lefts_and_rights_split_children() {
        let seq = sample();
        assert_eq!(seq.lefts(1), vec![0]);
        assert_eq!(seq.rights(1), vec![2]);
    }

    #[test]
    fn entity_spans_group_adjacent_bi_tokens() {
        let seq = TokenSequence::new(vec![
            tok("Who", "nsubj", 2, EntIob::Outside),
            tok("is", "aux", 2, EntIob::Outside),
            tok("Tom", "compound", 3, EntIob::Begin),
            tok("Cruise", "attr", 3, EntIob::Inside),
        ]);
        assert_eq!(seq.entity_spans(), vec![vec![2, 3]]);
    }

    #[test]
    fn head_of_out_of_range_is_identity() {
        let seq = sample();
        assert_eq!(seq.head_of(99), 99);
    }
}
