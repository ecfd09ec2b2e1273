//! Collection names and experience embedding axes
//!
//! Experience entries are embedded along four independent axes, each stored
//! in its own collection so a query can target the view that matches its
//! intent (whole entries, strategy phrasing, surprises, or root causes).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A searchable collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Memories,
  Code,
  ExperiencesFull,
  ExperiencesStrategy,
  ExperiencesSurprise,
  ExperiencesRootCause,
  Values,
  Commits,
}

impl Collection {
  /// The collection name as stored
  pub fn as_str(&self) -> &'static str {
    match self {
      Collection::Memories => "memories",
      Collection::Code => "code",
      Collection::ExperiencesFull => "ghap_full",
      Collection::ExperiencesStrategy => "ghap_strategy",
      Collection::ExperiencesSurprise => "ghap_surprise",
      Collection::ExperiencesRootCause => "ghap_root_cause",
      Collection::Values => "values",
      Collection::Commits => "commits",
    }
  }
}

impl std::str::FromStr for Collection {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "memories" => Ok(Collection::Memories),
      "code" => Ok(Collection::Code),
      "ghap_full" => Ok(Collection::ExperiencesFull),
      "ghap_strategy" => Ok(Collection::ExperiencesStrategy),
      "ghap_surprise" => Ok(Collection::ExperiencesSurprise),
      "ghap_root_cause" => Ok(Collection::ExperiencesRootCause),
      "values" => Ok(Collection::Values),
      "commits" => Ok(Collection::Commits),
      _ => Err(format!("Unknown collection: {}", s)),
    }
  }
}

/// Embedding axis for experience search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
  Full,
  Strategy,
  Surprise,
  RootCause,
}

impl Axis {
  pub const ALL: [Axis; 4] = [Axis::Full, Axis::Strategy, Axis::Surprise, Axis::RootCause];

  /// The collection this axis is stored in
  pub fn collection(&self) -> Collection {
    match self {
      Axis::Full => Collection::ExperiencesFull,
      Axis::Strategy => Collection::ExperiencesStrategy,
      Axis::Surprise => Collection::ExperiencesSurprise,
      Axis::RootCause => Collection::ExperiencesRootCause,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Axis::Full => "full",
      Axis::Strategy => "strategy",
      Axis::Surprise => "surprise",
      Axis::RootCause => "root_cause",
    }
  }
}

impl std::str::FromStr for Axis {
  type Err = InvalidAxisError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "full" => Ok(Axis::Full),
      "strategy" => Ok(Axis::Strategy),
      "surprise" => Ok(Axis::Surprise),
      "root_cause" => Ok(Axis::RootCause),
      _ => Err(InvalidAxisError::new(s)),
    }
  }
}

/// Unknown experience axis name
#[derive(Debug, Clone, Error)]
#[error("Invalid axis '{axis}'. Valid axes: full, strategy, surprise, root_cause")]
pub struct InvalidAxisError {
  pub axis: String,
}

impl InvalidAxisError {
  pub fn new(axis: impl Into<String>) -> Self {
    Self { axis: axis.into() }
  }
}
