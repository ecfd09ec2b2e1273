use ghap_core::Payload;
use serde::{Deserialize, Serialize};

/// A single scored hit handed over by a vector store client.
///
/// The store itself lives behind this crate's callers; every typed result
/// view is parsed from this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
  pub id: String,
  pub score: f32,
  pub payload: Payload,
  /// Present only when the caller asked for vectors back
  pub vector: Option<Vec<f32>>,
}

impl SearchResult {
  pub fn new(id: impl Into<String>, score: f32, payload: Payload) -> Self {
    Self {
      id: id.into(),
      score,
      payload,
      vector: None,
    }
  }
}
