//! Answer post-formatting.
//!
//! Timestamps coming back from the knowledge graph are strict UTC strings;
//! anything else passes through untouched. Raw graph URIs are dropped in
//! favor of the label values sitting in the same row.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::query::BindingRow;

/// Values with this prefix are graph URIs, not human-readable answers.
const GRAPH_URI_PREFIX: &str = "http://www.wikidata.org";

/// Timestamp form the query collaborator emits.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// How recognized dates are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `MM/DD/YYYY`
    #[default]
    Mdy,
    /// `YYYY-MM-DD`
    Iso,
}

/// Flatten binding rows into display strings.
pub fn format_answers(rows: &[BindingRow], style: DateStyle) -> Vec<String> {
    let mut answers = Vec::new();
    for row in rows {
        for value in row.values() {
            if value.starts_with(GRAPH_URI_PREFIX) {
                continue;
            }
            answers.push(format_literal(value, style));
        }
    }
    answers
}

/// Render one literal: a strict-UTC timestamp becomes a display date,
/// everything else is returned as-is.
pub fn format_literal(value: &str, style: DateStyle) -> String {
    match NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        Ok(stamp) => match style {
            DateStyle::Mdy => stamp.format("%m/%d/%Y").to_string(),
            DateStyle::Iso => stamp.format("%Y-%m-%d").to_string(),
        },
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> BindingRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn timestamps_render_in_the_default_style() {
        assert_eq!(
            format_literal("1958-01-08T00:00:00Z", DateStyle::Mdy),
            "01/08/1958"
        );
    }

    #[test]
    fn timestamps_render_iso_when_configured() {
        assert_eq!(
            format_literal("1958-01-08T00:00:00Z", DateStyle::Iso),
            "1958-01-08"
        );
    }

    #[test]
    fn non_timestamps_pass_through() {
        assert_eq!(
            format_literal("Tupelo, Mississippi", DateStyle::Mdy),
            "Tupelo, Mississippi"
        );
        // A bare date without the time part is not a strict timestamp.
        assert_eq!(format_literal("1958-01-08", DateStyle::Mdy), "1958-01-08");
    }

    #[test]
    fn graph_uris_are_dropped_in_favor_of_labels() {
        let rows = vec![row(&[
            ("val", "http://www.wikidata.org/entity/Q905"),
            ("valLabel", "Franz Kafka"),
        ])];
        assert_eq!(format_answers(&rows, DateStyle::Mdy), vec!["Franz Kafka"]);
    }

    #[test]
    fn every_row_contributes_answers_in_order() {
        let rows = vec![
            row(&[("answerLabel", "John Lennon")]),
            row(&[("answerLabel", "Paul McCartney")]),
        ];
        assert_eq!(
            format_answers(&rows, DateStyle::Mdy),
            vec!["John Lennon", "Paul McCartney"]
        );
    }
}
