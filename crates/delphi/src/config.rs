//! Configuration for the answer pipeline.
//!
//! Loaded from a TOML file when one exists, otherwise every field falls
//! back to its default. The loaded value is built once and passed by
//! reference; nothing mutates it afterwards.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::answer::DateStyle;

/// Default config file path.
pub const CONFIG_PATH: &str = "/etc/delphi/config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// MediaWiki search endpoint of the knowledge graph.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// SPARQL endpoint of the knowledge graph.
    #[serde(default = "default_sparql_url")]
    pub sparql_url: String,

    /// Token-annotation service endpoint.
    #[serde(default = "default_annotator_url")]
    pub annotator_url: String,

    /// Search and label language.
    #[serde(default = "default_language")]
    pub language: String,

    /// Candidates requested per search call.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Relation candidates tried per entity candidate.
    #[serde(default = "default_relation_cap")]
    pub relation_cap: usize,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent to the collaborators.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How recognized dates are displayed.
    #[serde(default)]
    pub date_style: DateStyle,
}

fn default_search_url() -> String {
    "https://www.wikidata.org/w/api.php".to_string()
}

fn default_sparql_url() -> String {
    "https://query.wikidata.org/sparql".to_string()
}

fn default_annotator_url() -> String {
    "http://127.0.0.1:8042/annotate".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_search_limit() -> usize {
    5
}

fn default_relation_cap() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!(
        "Delphi/{} (+https://github.com/delphi-qa/delphi)",
        env!("CARGO_PKG_VERSION")
    )
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            sparql_url: default_sparql_url(),
            annotator_url: default_annotator_url(),
            language: default_language(),
            search_limit: default_search_limit(),
            relation_cap: default_relation_cap(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            date_style: DateStyle::default(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "bad config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_documented_limits() {
        let config = Config::default();
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.relation_cap, 10);
        assert_eq!(config.language, "en");
        assert_eq!(config.date_style, DateStyle::Mdy);
    }

    #[test]
    fn partial_files_keep_defaults_for_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search_limit = 7\ndate_style = \"iso\"").unwrap();
        let config = Config::load(file.path());
        assert_eq!(config.search_limit, 7);
        assert_eq!(config.date_style, DateStyle::Iso);
        assert_eq!(config.relation_cap, 10);
        assert_eq!(config.sparql_url, default_sparql_url());
    }

    #[test]
    fn missing_file_means_defaults() {
        let config = Config::load(Path::new("/nonexistent/delphi.toml"));
        assert_eq!(config.search_limit, 5);
    }
}
