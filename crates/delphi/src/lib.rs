//! Delphi - factual question answering over a collaborative knowledge graph.
//!
//! A question comes in as raw text, gets annotated by the external
//! annotation service, is classified against a fixed pattern table,
//! split into an entity phrase and a relation phrase, resolved into
//! ranked knowledge-graph candidates, and answered by walking the
//! candidate cross product against the SPARQL endpoint.

pub mod annotate;
pub mod answer;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pattern;
pub mod pipeline;
pub mod query;
pub mod resolve;
pub mod token;

pub use answer::DateStyle;
pub use config::{Config, CONFIG_PATH};
pub use error::{AnswerError, TransportError};
pub use pipeline::Pipeline;
