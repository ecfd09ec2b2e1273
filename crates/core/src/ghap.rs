//! GHAP experience records
//!
//! A GHAP entry captures one Goal-Hypothesis-Action-Prediction loop: the goal
//! being pursued, the current hypothesis/action/prediction triple, every
//! superseded triple in `history`, and the resolution artifacts once the
//! prediction has been tested.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DeserializationError, Error, ValidationError};
use crate::payload::{
  Payload, PayloadResult, format_timestamp, optional_array, optional_object, optional_string, optional_string_array,
  optional_u32, require_string, require_timestamp,
};
use crate::resolution::{ConfidenceTier, Lesson, Outcome, OutcomeStatus, RootCause};
use crate::text::{MAX_TEXT_LEN, truncate_text};

fn generate_id(prefix: &str) -> String {
  let now = Utc::now();
  let suffix = Uuid::new_v4().simple().to_string();
  format!("{}_{}_{}", prefix, now.format("%Y%m%d_%H%M%S"), &suffix[..6])
}

/// Unique identifier for a GHAP entry (newtype for type safety)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GhapId(String);

impl GhapId {
  /// Generate a fresh id of the form `ghap_{date}_{time}_{suffix}`
  pub fn generate() -> Self {
    Self(generate_id("ghap"))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for GhapId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<String> for GhapId {
  fn from(s: String) -> Self {
    Self(s)
  }
}

impl From<&str> for GhapId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

/// Identifier for the session an entry was captured in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
  /// Generate a fresh id of the form `session_{date}_{time}_{suffix}`
  pub fn generate() -> Self {
    Self(generate_id("session"))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for SessionId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<String> for SessionId {
  fn from(s: String) -> Self {
    Self(s)
  }
}

impl From<&str> for SessionId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

/// The kind of work an experience was recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
  Debugging,
  Refactoring,
  Feature,
  Testing,
  Configuration,
  Documentation,
  Performance,
  Security,
  Integration,
}

impl Domain {
  pub fn as_str(&self) -> &'static str {
    match self {
      Domain::Debugging => "debugging",
      Domain::Refactoring => "refactoring",
      Domain::Feature => "feature",
      Domain::Testing => "testing",
      Domain::Configuration => "configuration",
      Domain::Documentation => "documentation",
      Domain::Performance => "performance",
      Domain::Security => "security",
      Domain::Integration => "integration",
    }
  }
}

impl std::str::FromStr for Domain {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "debugging" => Ok(Domain::Debugging),
      "refactoring" => Ok(Domain::Refactoring),
      "feature" => Ok(Domain::Feature),
      "testing" => Ok(Domain::Testing),
      "configuration" => Ok(Domain::Configuration),
      "documentation" => Ok(Domain::Documentation),
      "performance" => Ok(Domain::Performance),
      "security" => Ok(Domain::Security),
      "integration" => Ok(Domain::Integration),
      _ => Err(format!("Unknown domain: {}", s)),
    }
  }
}

/// The declared approach for testing the current hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
  SystematicElimination,
  TrialAndError,
  ResearchFirst,
  DivideAndConquer,
  RootCauseAnalysis,
  CopyFromSimilar,
  CheckAssumptions,
  ReadTheError,
  AskUser,
}

impl Strategy {
  pub fn as_str(&self) -> &'static str {
    match self {
      Strategy::SystematicElimination => "systematic-elimination",
      Strategy::TrialAndError => "trial-and-error",
      Strategy::ResearchFirst => "research-first",
      Strategy::DivideAndConquer => "divide-and-conquer",
      Strategy::RootCauseAnalysis => "root-cause-analysis",
      Strategy::CopyFromSimilar => "copy-from-similar",
      Strategy::CheckAssumptions => "check-assumptions",
      Strategy::ReadTheError => "read-the-error",
      Strategy::AskUser => "ask-user",
    }
  }
}

impl std::str::FromStr for Strategy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "systematic-elimination" => Ok(Strategy::SystematicElimination),
      "trial-and-error" => Ok(Strategy::TrialAndError),
      "research-first" => Ok(Strategy::ResearchFirst),
      "divide-and-conquer" => Ok(Strategy::DivideAndConquer),
      "root-cause-analysis" => Ok(Strategy::RootCauseAnalysis),
      "copy-from-similar" => Ok(Strategy::CopyFromSimilar),
      "check-assumptions" => Ok(Strategy::CheckAssumptions),
      "read-the-error" => Ok(Strategy::ReadTheError),
      "ask-user" => Ok(Strategy::AskUser),
      _ => Err(format!("Unknown strategy: {}", s)),
    }
  }
}

/// A superseded hypothesis/action/prediction triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
  pub timestamp: DateTime<Utc>,
  pub hypothesis: String,
  pub action: String,
  pub prediction: String,
}

impl HistoryEntry {
  pub fn to_payload(&self) -> Payload {
    let mut payload = Payload::new();
    payload.insert("timestamp".into(), Value::String(format_timestamp(self.timestamp)));
    payload.insert("hypothesis".into(), Value::String(self.hypothesis.clone()));
    payload.insert("action".into(), Value::String(self.action.clone()));
    payload.insert("prediction".into(), Value::String(self.prediction.clone()));
    payload
  }

  pub fn from_payload(payload: &Payload) -> PayloadResult<Self> {
    Ok(Self {
      timestamp: require_timestamp(payload.get("timestamp"), "timestamp")?,
      hypothesis: require_string(payload.get("hypothesis"), "hypothesis")?,
      action: require_string(payload.get("action"), "action")?,
      prediction: require_string(payload.get("prediction"), "prediction")?,
    })
  }
}

fn required_text(value: String, field: &str) -> Result<String, ValidationError> {
  if value.trim().is_empty() {
    return Err(ValidationError::blank(field));
  }
  Ok(truncate_text(&value, MAX_TEXT_LEN))
}

fn optional_revision(value: Option<&str>, field: &str) -> Result<Option<String>, ValidationError> {
  match value {
    Some(v) if v.trim().is_empty() => Err(ValidationError::blank(field)),
    Some(v) => Ok(Some(truncate_text(v, MAX_TEXT_LEN))),
    None => Ok(None),
  }
}

/// One Goal-Hypothesis-Action-Prediction experience record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhapEntry {
  pub id: GhapId,
  pub session_id: SessionId,
  pub created_at: DateTime<Utc>,
  pub domain: Domain,
  pub strategy: Strategy,
  pub goal: String,

  // Current loop state
  pub hypothesis: String,
  pub action: String,
  pub prediction: String,
  pub history: Vec<HistoryEntry>,
  pub iteration_count: u32,

  // Resolution artifacts, absent until resolved
  pub outcome: Option<Outcome>,
  pub surprise: Option<String>,
  pub root_cause: Option<RootCause>,
  pub lesson: Option<Lesson>,
  pub confidence_tier: Option<ConfidenceTier>,

  pub notes: Vec<String>,
}

impl GhapEntry {
  /// Create a new unresolved entry
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    id: GhapId,
    session_id: SessionId,
    domain: Domain,
    strategy: Strategy,
    goal: impl Into<String>,
    hypothesis: impl Into<String>,
    action: impl Into<String>,
    prediction: impl Into<String>,
  ) -> Result<Self, ValidationError> {
    Ok(Self {
      id,
      session_id,
      created_at: Utc::now(),
      domain,
      strategy,
      goal: required_text(goal.into(), "goal")?,
      hypothesis: required_text(hypothesis.into(), "hypothesis")?,
      action: required_text(action.into(), "action")?,
      prediction: required_text(prediction.into(), "prediction")?,
      history: Vec::new(),
      iteration_count: 1,
      outcome: None,
      surprise: None,
      root_cause: None,
      lesson: None,
      confidence_tier: None,
      notes: Vec::new(),
    })
  }

  /// Revise the hypothesis/action/prediction triple.
  ///
  /// When at least one provided field differs from the current value, the
  /// current triple is pushed onto `history` and `iteration_count` bumps.
  /// Returns whether that happened. Changes are detected after truncation.
  pub fn revise(
    &mut self,
    hypothesis: Option<&str>,
    action: Option<&str>,
    prediction: Option<&str>,
  ) -> Result<bool, ValidationError> {
    let hypothesis = optional_revision(hypothesis, "hypothesis")?;
    let action = optional_revision(action, "action")?;
    let prediction = optional_revision(prediction, "prediction")?;

    let changed = hypothesis.as_deref().is_some_and(|h| h != self.hypothesis)
      || action.as_deref().is_some_and(|a| a != self.action)
      || prediction.as_deref().is_some_and(|p| p != self.prediction);

    if changed {
      self.history.push(HistoryEntry {
        timestamp: Utc::now(),
        hypothesis: self.hypothesis.clone(),
        action: self.action.clone(),
        prediction: self.prediction.clone(),
      });
      self.iteration_count += 1;
    }

    if let Some(h) = hypothesis {
      self.hypothesis = h;
    }
    if let Some(a) = action {
      self.action = a;
    }
    if let Some(p) = prediction {
      self.prediction = p;
    }

    if changed {
      debug!("Entry {} revised to iteration {}", self.id, self.iteration_count);
    }

    Ok(changed)
  }

  /// Change the declared strategy; strategy changes never create history entries
  pub fn set_strategy(&mut self, strategy: Strategy) {
    self.strategy = strategy;
  }

  /// Append a free-text note
  pub fn add_note(&mut self, note: &str) -> Result<(), ValidationError> {
    if note.trim().is_empty() {
      return Err(ValidationError::blank("note"));
    }
    self.notes.push(truncate_text(note, MAX_TEXT_LEN));
    Ok(())
  }

  /// Attach resolution artifacts and derive the confidence tier.
  ///
  /// Resolving an already-resolved entry replaces the previous resolution
  /// wholesale; refusing repeat resolution is a session-management concern
  /// that lives above this layer.
  pub fn resolve(
    &mut self,
    outcome: Outcome,
    surprise: Option<&str>,
    root_cause: Option<RootCause>,
    lesson: Option<Lesson>,
  ) -> Result<(), ValidationError> {
    let surprise = optional_revision(surprise, "surprise")?;
    let tier = ConfidenceTier::for_outcome(&outcome);

    debug!("Entry {} resolved as {} ({})", self.id, outcome.status.as_str(), tier.as_str());

    self.outcome = Some(outcome);
    self.surprise = surprise;
    self.root_cause = root_cause;
    self.lesson = lesson;
    self.confidence_tier = Some(tier);
    Ok(())
  }

  /// Resolve as abandoned, with the reason captured as the outcome result
  pub fn abandon(&mut self, reason: &str) -> Result<(), ValidationError> {
    let outcome = Outcome::new(OutcomeStatus::Abandoned, reason, false)?;
    self.resolve(outcome, None, None, None)
  }

  pub fn is_resolved(&self) -> bool {
    self.outcome.is_some()
  }

  /// Produce the persisted mapping form.
  ///
  /// Resolution fields are omitted entirely while absent rather than
  /// emitted as null.
  pub fn to_payload(&self) -> Payload {
    let mut payload = Payload::new();
    payload.insert("id".into(), Value::String(self.id.to_string()));
    payload.insert("session_id".into(), Value::String(self.session_id.to_string()));
    payload.insert("created_at".into(), Value::String(format_timestamp(self.created_at)));
    payload.insert("domain".into(), Value::String(self.domain.as_str().into()));
    payload.insert("strategy".into(), Value::String(self.strategy.as_str().into()));
    payload.insert("goal".into(), Value::String(self.goal.clone()));
    payload.insert("hypothesis".into(), Value::String(self.hypothesis.clone()));
    payload.insert("action".into(), Value::String(self.action.clone()));
    payload.insert("prediction".into(), Value::String(self.prediction.clone()));
    payload.insert(
      "history".into(),
      Value::Array(self.history.iter().map(|h| Value::Object(h.to_payload())).collect()),
    );
    payload.insert("iteration_count".into(), Value::Number(self.iteration_count.into()));
    payload.insert(
      "notes".into(),
      Value::Array(self.notes.iter().map(|n| Value::String(n.clone())).collect()),
    );

    if let Some(outcome) = &self.outcome {
      payload.insert("outcome".into(), Value::Object(outcome.to_payload()));
    }
    if let Some(surprise) = &self.surprise {
      payload.insert("surprise".into(), Value::String(surprise.clone()));
    }
    if let Some(root_cause) = &self.root_cause {
      payload.insert("root_cause".into(), Value::Object(root_cause.to_payload()));
    }
    if let Some(lesson) = &self.lesson {
      payload.insert("lesson".into(), Value::Object(lesson.to_payload()));
    }
    if let Some(tier) = &self.confidence_tier {
      payload.insert("confidence_tier".into(), Value::String(tier.as_str().into()));
    }

    payload
  }

  /// Reconstruct an entry from its persisted mapping form.
  ///
  /// `history` and `notes` default to empty and `iteration_count` to 1 when
  /// the keys are absent; missing or null resolution fields stay `None`.
  pub fn from_payload(payload: &Payload) -> PayloadResult<Self> {
    let domain = require_string(payload.get("domain"), "domain")?
      .parse::<Domain>()
      .map_err(|e| DeserializationError::invalid_value("domain", e))?;
    let strategy = require_string(payload.get("strategy"), "strategy")?
      .parse::<Strategy>()
      .map_err(|e| DeserializationError::invalid_value("strategy", e))?;

    let history = match optional_array(payload.get("history"), "history")? {
      Some(items) => {
        let mut history = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
          let object = item
            .as_object()
            .ok_or_else(|| DeserializationError::invalid_type(format!("history[{}]", i), "object"))?;
          history.push(HistoryEntry::from_payload(object).map_err(|e| e.prefixed(&format!("history[{}]", i)))?);
        }
        history
      }
      None => Vec::new(),
    };

    let outcome = match optional_object(payload.get("outcome"), "outcome")? {
      Some(object) => Some(Outcome::from_payload(object).map_err(|e| e.prefixed("outcome"))?),
      None => None,
    };
    let root_cause = match optional_object(payload.get("root_cause"), "root_cause")? {
      Some(object) => Some(RootCause::from_payload(object).map_err(|e| e.prefixed("root_cause"))?),
      None => None,
    };
    let lesson = match optional_object(payload.get("lesson"), "lesson")? {
      Some(object) => Some(Lesson::from_payload(object).map_err(|e| e.prefixed("lesson"))?),
      None => None,
    };
    let confidence_tier = match optional_string(payload.get("confidence_tier"), "confidence_tier")? {
      Some(s) => Some(
        s.parse::<ConfidenceTier>()
          .map_err(|e| DeserializationError::invalid_value("confidence_tier", e))?,
      ),
      None => None,
    };

    Ok(Self {
      id: GhapId::from(require_string(payload.get("id"), "id")?),
      session_id: SessionId::from(require_string(payload.get("session_id"), "session_id")?),
      created_at: require_timestamp(payload.get("created_at"), "created_at")?,
      domain,
      strategy,
      goal: require_string(payload.get("goal"), "goal")?,
      hypothesis: require_string(payload.get("hypothesis"), "hypothesis")?,
      action: require_string(payload.get("action"), "action")?,
      prediction: require_string(payload.get("prediction"), "prediction")?,
      history,
      iteration_count: optional_u32(payload.get("iteration_count"), "iteration_count")?.unwrap_or(1),
      outcome,
      surprise: optional_string(payload.get("surprise"), "surprise")?,
      root_cause,
      lesson,
      confidence_tier,
      notes: optional_string_array(payload.get("notes"), "notes")?.unwrap_or_default(),
    })
  }

  /// Serialize to a JSON document string
  pub fn to_json(&self) -> String {
    Value::Object(self.to_payload()).to_string()
  }

  /// Parse from a JSON document string
  pub fn from_json(json: &str) -> Result<Self, Error> {
    let value: Value = serde_json::from_str(json)?;
    let payload = value
      .as_object()
      .ok_or_else(|| DeserializationError::invalid_type("entry", "object"))?;
    Ok(Self::from_payload(payload)?)
  }
}
