//! Classification tests for the default pattern table.
//!
//! Each question shape gets a hand-annotated sequence; the matcher must
//! pick the registered shape and report a span whose tokens actually
//! satisfy the winning pattern.

use delphi::pattern::{Matcher, PatternId};
use delphi::token::{EntIob, TaggedToken, TokenSequence};

fn tok(text: &str, lemma: &str, pos: &str, dep: &str, head: usize) -> TaggedToken {
    TaggedToken {
        text: text.to_string(),
        lemma: lemma.to_string(),
        pos: pos.to_string(),
        tag: String::new(),
        dep: dep.to_string(),
        head,
        ent_iob: EntIob::Outside,
    }
}

// "When was Michael Jackson born"
fn when_was_born() -> TokenSequence {
    TokenSequence::new(vec![
        tok("When", "when", "ADV", "advmod", 4),
        tok("was", "be", "AUX", "auxpass", 4),
        tok("Michael", "michael", "PROPN", "compound", 3),
        tok("Jackson", "jackson", "PROPN", "nsubjpass", 4),
        tok("born", "bear", "VERB", "ROOT", 4),
    ])
}

// "Who is the director of Titanic"
fn who_is_the_director() -> TokenSequence {
    TokenSequence::new(vec![
        tok("Who", "who", "PRON", "attr", 1),
        tok("is", "be", "AUX", "ROOT", 1),
        tok("the", "the", "DET", "det", 3),
        tok("director", "director", "NOUN", "nsubj", 1),
        tok("of", "of", "ADP", "prep", 3),
        tok("Titanic", "titanic", "PROPN", "pobj", 4),
    ])
}

// "Who is Freddie Mercury"
fn who_is_freddie() -> TokenSequence {
    TokenSequence::new(vec![
        tok("Who", "who", "PRON", "nsubj", 1),
        tok("is", "be", "AUX", "ROOT", 1),
        tok("Freddie", "freddie", "PROPN", "compound", 3),
        tok("Mercury", "mercury", "PROPN", "attr", 1),
    ])
}

// "How many children does Michael Jackson have"
fn how_many_children() -> TokenSequence {
    TokenSequence::new(vec![
        tok("How", "how", "ADV", "advmod", 1),
        tok("many", "many", "ADJ", "amod", 2),
        tok("children", "child", "NOUN", "dobj", 6),
        tok("does", "do", "AUX", "aux", 6),
        tok("Michael", "michael", "PROPN", "compound", 5),
        tok("Jackson", "jackson", "PROPN", "nsubj", 6),
        tok("have", "have", "VERB", "ROOT", 6),
    ])
}

// "From which country did Queen originate"
fn from_which_country() -> TokenSequence {
    TokenSequence::new(vec![
        tok("From", "from", "ADP", "prep", 5),
        tok("which", "which", "DET", "det", 2),
        tok("country", "country", "NOUN", "pobj", 0),
        tok("did", "do", "AUX", "aux", 5),
        tok("Queen", "queen", "PROPN", "nsubj", 5),
        tok("originate", "originate", "VERB", "ROOT", 5),
    ])
}

// "What does serendipity mean"
fn what_does_mean() -> TokenSequence {
    TokenSequence::new(vec![
        tok("What", "what", "PRON", "dobj", 3),
        tok("does", "do", "AUX", "aux", 3),
        tok("serendipity", "serendipity", "NOUN", "nsubj", 3),
        tok("mean", "mean", "VERB", "ROOT", 3),
    ])
}

// "What is the last album of Queen"
fn the_last_album() -> TokenSequence {
    TokenSequence::new(vec![
        tok("What", "what", "PRON", "attr", 1),
        tok("is", "be", "AUX", "ROOT", 1),
        tok("the", "the", "DET", "det", 4),
        tok("last", "last", "ADJ", "amod", 4),
        tok("album", "album", "NOUN", "nsubj", 1),
        tok("of", "of", "ADP", "prep", 4),
        tok("Queen", "queen", "PROPN", "pobj", 5),
    ])
}

// "Who composed the St Matthew Passion"
fn who_composed() -> TokenSequence {
    TokenSequence::new(vec![
        tok("Who", "who", "PRON", "nsubj", 1),
        tok("composed", "compose", "VERB", "ROOT", 1),
        tok("the", "the", "DET", "det", 4),
        tok("St", "st", "PROPN", "compound", 4),
        tok("Matthew", "matthew", "PROPN", "compound", 4),
        tok("Passion", "passion", "PROPN", "dobj", 1),
    ])
}

// "Did the Beatles release Abbey Road in 1969"
fn did_release() -> TokenSequence {
    TokenSequence::new(vec![
        tok("Did", "do", "AUX", "aux", 3),
        tok("the", "the", "DET", "det", 2),
        tok("Beatles", "beatles", "PROPN", "nsubj", 3),
        tok("release", "release", "VERB", "ROOT", 3),
        tok("Abbey", "abbey", "PROPN", "compound", 5),
        tok("Road", "road", "PROPN", "dobj", 3),
        tok("in", "in", "ADP", "prep", 3),
        tok("1969", "1969", "NUM", "pobj", 6),
    ])
}

#[test]
fn each_shape_classifies_to_its_pattern() {
    let matcher = Matcher::with_default_patterns();
    let cases = [
        (when_was_born(), PatternId::WhenWhereDid),
        (who_is_the_director(), PatternId::XOfY),
        (who_is_freddie(), PatternId::Identity),
        (how_many_children(), PatternId::HowMany),
        (from_which_country(), PatternId::FromWhich),
        (what_does_mean(), PatternId::Definition),
        (the_last_album(), PatternId::Superlative),
        (who_composed(), PatternId::WhoDidX),
        (did_release(), PatternId::DidXVerbY),
    ];
    for (seq, expected) in cases {
        let hit = matcher.find(&seq).expect("no pattern matched");
        assert_eq!(hit.id, expected, "sequence starting {:?}", seq.get(0).map(|t| &t.text));
    }
}

#[test]
fn reported_span_lies_inside_the_sequence() {
    let matcher = Matcher::with_default_patterns();
    for seq in [when_was_born(), who_is_the_director(), did_release()] {
        let hit = matcher.find(&seq).unwrap();
        assert!(hit.start < hit.end);
        assert!(hit.end <= seq.len());
    }
}

#[test]
fn unmatchable_sequences_classify_to_nothing() {
    let matcher = Matcher::with_default_patterns();
    let seq = TokenSequence::new(vec![
        tok("Paint", "paint", "VERB", "ROOT", 0),
        tok("the", "the", "DET", "det", 2),
        tok("fence", "fence", "NOUN", "dobj", 0),
    ]);
    assert!(matcher.find(&seq).is_none());
}

#[test]
fn priority_order_decides_between_overlapping_shapes() {
    // "What is the last album of Queen" also satisfies the x-of-y shape;
    // the superlative shape is registered first and must win.
    let matcher = Matcher::with_default_patterns();
    assert_eq!(matcher.find(&the_last_album()).unwrap().id, PatternId::Superlative);
    // "What does serendipity mean" also satisfies the did-x-verb-y shape;
    // the definition shape outranks it.
    assert_eq!(matcher.find(&what_does_mean()).unwrap().id, PatternId::Definition);
}
