//! Resolution artifacts captured when a GHAP experience concludes
//!
//! `RootCause` and `Lesson` are defined here once. Every other crate in the
//! workspace imports these types; none declares a local copy of either shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DeserializationError, ValidationError};
use crate::payload::{
  Payload, PayloadResult, format_timestamp, optional_bool, optional_string, require_string, require_timestamp,
};
use crate::text::{MAX_TEXT_LEN, truncate_text};

/// How a resolved experience turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
  /// The prediction held
  Confirmed,
  /// The prediction was wrong
  Falsified,
  /// The goal was dropped before the prediction was tested
  Abandoned,
}

impl OutcomeStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OutcomeStatus::Confirmed => "confirmed",
      OutcomeStatus::Falsified => "falsified",
      OutcomeStatus::Abandoned => "abandoned",
    }
  }
}

impl std::str::FromStr for OutcomeStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "confirmed" => Ok(OutcomeStatus::Confirmed),
      "falsified" => Ok(OutcomeStatus::Falsified),
      "abandoned" => Ok(OutcomeStatus::Abandoned),
      _ => Err(format!("Unknown outcome status: {}", s)),
    }
  }
}

/// Confidence grade for a resolved experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
  /// Auto-captured outcome (test/build triggered resolution)
  Gold,
  /// Manual resolution (agent explicitly resolved)
  Silver,
  /// Poor quality hypothesis, downgraded by later re-scoring
  Bronze,
  /// Goal abandoned before resolution
  Abandoned,
}

impl ConfidenceTier {
  /// Derive the tier for a freshly captured outcome
  pub fn for_outcome(outcome: &Outcome) -> Self {
    if outcome.status == OutcomeStatus::Abandoned {
      ConfidenceTier::Abandoned
    } else if outcome.auto_captured {
      ConfidenceTier::Gold
    } else {
      ConfidenceTier::Silver
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      ConfidenceTier::Gold => "gold",
      ConfidenceTier::Silver => "silver",
      ConfidenceTier::Bronze => "bronze",
      ConfidenceTier::Abandoned => "abandoned",
    }
  }
}

impl std::str::FromStr for ConfidenceTier {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "gold" => Ok(ConfidenceTier::Gold),
      "silver" => Ok(ConfidenceTier::Silver),
      "bronze" => Ok(ConfidenceTier::Bronze),
      "abandoned" => Ok(ConfidenceTier::Abandoned),
      _ => Err(format!("Unknown confidence tier: {}", s)),
    }
  }
}

/// The diagnosed underlying cause of an observed failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCause {
  pub category: String, // wrong-assumption, missing-knowledge, oversight, etc.
  pub description: String,
}

impl RootCause {
  pub fn new(category: impl Into<String>, description: impl Into<String>) -> Result<Self, ValidationError> {
    let category = category.into();
    let description = description.into();
    if category.trim().is_empty() {
      return Err(ValidationError::blank("category"));
    }
    if description.trim().is_empty() {
      return Err(ValidationError::blank("description"));
    }
    Ok(Self { category, description })
  }

  /// Produce the persisted mapping form; both keys are always emitted
  pub fn to_payload(&self) -> Payload {
    let mut payload = Payload::new();
    payload.insert("category".into(), Value::String(self.category.clone()));
    payload.insert("description".into(), Value::String(self.description.clone()));
    payload
  }

  /// Reconstruct from the persisted mapping form
  pub fn from_payload(payload: &Payload) -> PayloadResult<Self> {
    Ok(Self {
      category: require_string(payload.get("category"), "category")?,
      description: require_string(payload.get("description"), "description")?,
    })
  }
}

/// A learned takeaway derived from a resolved experience
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
  pub what_worked: String,
  pub takeaway: Option<String>,
}

impl Lesson {
  pub fn new(what_worked: impl Into<String>, takeaway: Option<String>) -> Result<Self, ValidationError> {
    let what_worked = what_worked.into();
    if what_worked.trim().is_empty() {
      return Err(ValidationError::blank("what_worked"));
    }
    Ok(Self { what_worked, takeaway })
  }

  /// Produce the persisted mapping form; `takeaway` is emitted as null when unset
  pub fn to_payload(&self) -> Payload {
    let mut payload = Payload::new();
    payload.insert("what_worked".into(), Value::String(self.what_worked.clone()));
    payload.insert(
      "takeaway".into(),
      match &self.takeaway {
        Some(t) => Value::String(t.clone()),
        None => Value::Null,
      },
    );
    payload
  }

  /// Reconstruct from the persisted mapping form; a missing or null `takeaway` is `None`
  pub fn from_payload(payload: &Payload) -> PayloadResult<Self> {
    Ok(Self {
      what_worked: require_string(payload.get("what_worked"), "what_worked")?,
      takeaway: optional_string(payload.get("takeaway"), "takeaway")?,
    })
  }
}

/// The captured result of testing a prediction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
  pub status: OutcomeStatus,
  pub result: String,
  pub captured_at: DateTime<Utc>,
  pub auto_captured: bool,
}

impl Outcome {
  pub fn new(status: OutcomeStatus, result: impl Into<String>, auto_captured: bool) -> Result<Self, ValidationError> {
    let result = result.into();
    if result.trim().is_empty() {
      return Err(ValidationError::blank("result"));
    }
    Ok(Self {
      status,
      result: truncate_text(&result, MAX_TEXT_LEN),
      captured_at: Utc::now(),
      auto_captured,
    })
  }

  pub fn to_payload(&self) -> Payload {
    let mut payload = Payload::new();
    payload.insert("status".into(), Value::String(self.status.as_str().into()));
    payload.insert("result".into(), Value::String(self.result.clone()));
    payload.insert("captured_at".into(), Value::String(format_timestamp(self.captured_at)));
    payload.insert("auto_captured".into(), Value::Bool(self.auto_captured));
    payload
  }

  /// Reconstruct from the persisted mapping form; `auto_captured` defaults to false
  pub fn from_payload(payload: &Payload) -> PayloadResult<Self> {
    let status = require_string(payload.get("status"), "status")?
      .parse::<OutcomeStatus>()
      .map_err(|e| DeserializationError::invalid_value("status", e))?;

    Ok(Self {
      status,
      result: require_string(payload.get("result"), "result")?,
      captured_at: require_timestamp(payload.get("captured_at"), "captured_at")?,
      auto_captured: optional_bool(payload.get("auto_captured"), "auto_captured")?.unwrap_or(false),
    })
  }
}
