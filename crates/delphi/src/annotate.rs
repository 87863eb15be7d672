//! Annotation collaborator seam.
//!
//! The syntactic annotation engine runs as a separate service; this module
//! only defines the call boundary and the HTTP client speaking its JSON
//! contract: one request with the raw question, one response with the
//! tagged token array.

use std::time::Duration;

use crate::config::Config;
use crate::error::TransportError;
use crate::token::{TaggedToken, TokenSequence};

/// Produces the annotated token sequence for one question.
pub trait Annotator {
    fn annotate(&self, text: &str) -> Result<TokenSequence, TransportError>;
}

/// HTTP client for the companion annotation service.
pub struct HttpAnnotator {
    http: reqwest::blocking::Client,
    url: String,
}

impl HttpAnnotator {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            url: config.annotator_url.clone(),
        })
    }
}

impl Annotator for HttpAnnotator {
    fn annotate(&self, text: &str) -> Result<TokenSequence, TransportError> {
        let response = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()?;
        if !response.status().is_success() {
            return Err(TransportError::Payload(format!(
                "HTTP {} from annotation collaborator",
                response.status()
            )));
        }
        let tokens: Vec<TaggedToken> = response.json()?;
        Ok(TokenSequence::new(tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::EntIob;

    #[test]
    fn token_wire_format_round_trips() {
        let wire = r#"[{
            "text": "Elvis",
            "lemma": "elvis",
            "pos": "PROPN",
            "tag": "NNP",
            "dep": "nsubj",
            "head": 1,
            "ent_iob": "B"
        }]"#;
        let tokens: Vec<TaggedToken> = serde_json::from_str(wire).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "Elvis");
        assert_eq!(tokens[0].ent_iob, EntIob::Begin);
        let seq = TokenSequence::new(tokens);
        assert_eq!(seq.len(), 1);
    }
}
