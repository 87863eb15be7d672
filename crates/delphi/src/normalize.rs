//! Relation normalization into knowledge-graph vocabulary.
//!
//! A pure function: stop words out, then a two-key lookup on the leading
//! interrogative and the main verb lemma. Phrases the table does not know
//! pass through verbatim, joined with single spaces.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Words stripped from entity and relation phrases before lookup.
pub static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["a", "by", "of", "the", "'s", "\"", "'"]));

static TRANSLATION: Lazy<HashMap<(&'static str, &'static str), &'static str>> = Lazy::new(|| {
    HashMap::from([
        (("who", "direct"), "director"),
        (("who", "write"), "author"),
        (("who", "compose"), "composer"),
        (("who", "invent"), "inventor"),
        (("who", "publish"), "publisher"),
        (("who", "be"), "occupation"),
        (("when", "direct"), "inception"),
        (("when", "write"), "inception"),
        (("when", "compose"), "inception"),
        (("when", "invent"), "inception"),
        (("when", "bear"), "date of birth"),
        (("when", "die"), "date of death"),
        (("when", "publish"), "publication date"),
        (("when", "release"), "publication date"),
        (("where", "bear"), "place of birth"),
        (("where", "die"), "place of death"),
        (("where", "live"), "residence"),
        (("what", "be"), "instance of"),
        (("what", "mean"), "definition"),
        // Re-entries keeping the common canonical phrases fixed points.
        (("date", "birth"), "date of birth"),
        (("date", "death"), "date of death"),
        (("place", "birth"), "place of birth"),
        (("place", "death"), "place of death"),
    ])
});

/// Is this word discarded before normalization and search?
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word.to_lowercase().as_str())
}

/// Normalize a raw relation phrase into a canonical relation string.
pub fn normalize(phrase: &[String]) -> String {
    let content: Vec<String> = phrase
        .iter()
        .map(|w| w.to_lowercase())
        .filter(|w| !STOP_WORDS.contains(w.as_str()))
        .collect();

    // Membership questions always resolve to the part-whole relation, no
    // matter how the rest of the phrase reads.
    if content.iter().any(|w| w == "members") {
        return "has part".to_string();
    }

    let joined = content.join(" ");
    if content.len() < 2 {
        return joined;
    }

    TRANSLATION
        .get(&(content[0].as_str(), content[1].as_str()))
        .map(|c| c.to_string())
        .unwrap_or(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrase(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn table_rows_translate() {
        assert_eq!(normalize(&phrase(&["who", "compose"])), "composer");
        assert_eq!(normalize(&phrase(&["when", "bear"])), "date of birth");
        assert_eq!(normalize(&phrase(&["where", "die"])), "place of death");
        assert_eq!(normalize(&phrase(&["where", "live"])), "residence");
    }

    #[test]
    fn members_containment_overrides_everything() {
        assert_eq!(normalize(&phrase(&["the", "members"])), "has part");
        assert_eq!(normalize(&phrase(&["who", "members", "be"])), "has part");
        assert_eq!(normalize(&phrase(&["members"])), "has part");
    }

    #[test]
    fn short_phrases_pass_through() {
        assert_eq!(normalize(&phrase(&["the", "director"])), "director");
        assert_eq!(normalize(&phrase(&["genre"])), "genre");
        assert_eq!(normalize(&phrase(&[])), "");
    }

    #[test]
    fn unknown_pairs_join_verbatim() {
        assert_eq!(normalize(&phrase(&["record", "label"])), "record label");
        assert_eq!(normalize(&phrase(&["birth", "name"])), "birth name");
    }

    #[test]
    fn normalization_is_idempotent_on_content_words() {
        for words in [
            vec!["record", "label"],
            vec!["genre"],
            vec!["when", "bear"],
            vec!["who", "compose"],
            vec!["members"],
        ] {
            let once = normalize(&phrase(&words));
            let words_again: Vec<String> = once.split(' ').map(|w| w.to_string()).collect();
            assert_eq!(normalize(&words_again), once, "not a fixed point: {:?}", words);
        }
    }

    #[test]
    fn case_is_folded_before_lookup() {
        assert_eq!(normalize(&phrase(&["The", "Members"])), "has part");
        assert_eq!(normalize(&phrase(&["Who", "Compose"])), "composer");
    }
}
