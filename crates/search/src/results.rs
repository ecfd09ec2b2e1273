//! Typed views over raw search hits
//!
//! Each result type parses the payload persisted for its collection. The
//! `root_cause` and `lesson` fields on [`ExperienceResult`] are the
//! observation model's own types; this crate defines no local copy of
//! either shape.

use chrono::{DateTime, Utc};
use ghap_core::DeserializationError;
use ghap_core::payload::{
  optional_f32, optional_object, optional_string, optional_string_array, optional_timestamp, require_f32,
  require_string, require_string_array, require_timestamp, require_u32, require_usize,
};

use crate::store::SearchResult;

// Re-exported for search-side callers; the defining location stays the
// observation model.
pub use ghap_core::resolution::{Lesson, RootCause};

/// A memory search hit
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryResult {
  pub id: String,
  pub category: String,
  pub content: String,
  pub score: f32,
  pub importance: f32,
  pub tags: Vec<String>,
  pub created_at: DateTime<Utc>,
  pub verified_at: Option<DateTime<Utc>>,
  pub verification_status: Option<String>, // "passed" | "failed" | "pending"
}

impl MemoryResult {
  /// Parse from a raw search hit; `importance` defaults to 0.0 and `tags` to empty
  pub fn from_search_result(result: &SearchResult) -> Result<Self, DeserializationError> {
    let payload = &result.payload;
    Ok(Self {
      id: result.id.clone(),
      category: require_string(payload.get("category"), "category")?,
      content: require_string(payload.get("content"), "content")?,
      score: result.score,
      importance: optional_f32(payload.get("importance"), "importance")?.unwrap_or(0.0),
      tags: optional_string_array(payload.get("tags"), "tags")?.unwrap_or_default(),
      created_at: require_timestamp(payload.get("created_at"), "created_at")?,
      verified_at: optional_timestamp(payload.get("verified_at"), "verified_at")?,
      verification_status: optional_string(payload.get("verification_status"), "verification_status")?,
    })
  }
}

/// A code search hit
#[derive(Debug, Clone, PartialEq)]
pub struct CodeResult {
  pub id: String,
  pub project: String,
  pub file_path: String,
  pub language: String,
  pub unit_type: String, // "function" | "class" | "method"
  pub qualified_name: String,
  pub code: String,
  pub docstring: Option<String>,
  pub score: f32,
  pub line_start: u32,
  pub line_end: u32,
}

impl CodeResult {
  /// Parse from a raw search hit
  pub fn from_search_result(result: &SearchResult) -> Result<Self, DeserializationError> {
    let payload = &result.payload;
    Ok(Self {
      id: result.id.clone(),
      project: require_string(payload.get("project"), "project")?,
      file_path: require_string(payload.get("file_path"), "file_path")?,
      language: require_string(payload.get("language"), "language")?,
      unit_type: require_string(payload.get("unit_type"), "unit_type")?,
      qualified_name: require_string(payload.get("qualified_name"), "qualified_name")?,
      code: require_string(payload.get("code"), "code")?,
      docstring: optional_string(payload.get("docstring"), "docstring")?,
      score: result.score,
      line_start: require_u32(payload.get("line_start"), "line_start")?,
      line_end: require_u32(payload.get("line_end"), "line_end")?,
    })
  }
}

/// An experience search hit.
///
/// Taxonomy fields carry the raw strings the index stored; `root_cause` and
/// `lesson` are the structured observation types.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceResult {
  pub id: String,
  pub ghap_id: String,
  pub axis: String, // "full" | "strategy" | "surprise" | "root_cause"
  pub domain: String,
  pub strategy: String,
  pub goal: String,
  pub hypothesis: String,
  pub action: String,
  pub prediction: String,
  pub outcome_status: String, // "confirmed" | "falsified" | "abandoned"
  pub outcome_result: String,
  pub surprise: Option<String>,
  pub root_cause: Option<RootCause>,
  pub lesson: Option<Lesson>,
  pub confidence_tier: String, // "gold" | "silver" | "bronze" | "abandoned"
  pub iteration_count: u32,
  pub score: f32,
  pub created_at: DateTime<Utc>,
}

impl ExperienceResult {
  /// Parse from a raw search hit
  pub fn from_search_result(result: &SearchResult) -> Result<Self, DeserializationError> {
    let payload = &result.payload;

    let root_cause = match optional_object(payload.get("root_cause"), "root_cause")? {
      Some(object) => Some(RootCause::from_payload(object).map_err(|e| e.prefixed("root_cause"))?),
      None => None,
    };
    let lesson = match optional_object(payload.get("lesson"), "lesson")? {
      Some(object) => Some(Lesson::from_payload(object).map_err(|e| e.prefixed("lesson"))?),
      None => None,
    };

    Ok(Self {
      id: result.id.clone(),
      ghap_id: require_string(payload.get("ghap_id"), "ghap_id")?,
      axis: require_string(payload.get("axis"), "axis")?,
      domain: require_string(payload.get("domain"), "domain")?,
      strategy: require_string(payload.get("strategy"), "strategy")?,
      goal: require_string(payload.get("goal"), "goal")?,
      hypothesis: require_string(payload.get("hypothesis"), "hypothesis")?,
      action: require_string(payload.get("action"), "action")?,
      prediction: require_string(payload.get("prediction"), "prediction")?,
      outcome_status: require_string(payload.get("outcome_status"), "outcome_status")?,
      outcome_result: require_string(payload.get("outcome_result"), "outcome_result")?,
      surprise: optional_string(payload.get("surprise"), "surprise")?,
      root_cause,
      lesson,
      confidence_tier: require_string(payload.get("confidence_tier"), "confidence_tier")?,
      iteration_count: require_u32(payload.get("iteration_count"), "iteration_count")?,
      score: result.score,
      created_at: require_timestamp(payload.get("created_at"), "created_at")?,
    })
  }
}

/// A distilled-value search hit
#[derive(Debug, Clone, PartialEq)]
pub struct ValueResult {
  pub id: String,
  pub axis: String,
  pub cluster_id: String,
  pub text: String,
  pub score: f32,
  pub member_count: usize,
  pub avg_confidence: f32,
  pub created_at: DateTime<Utc>,
}

impl ValueResult {
  /// Parse from a raw search hit
  pub fn from_search_result(result: &SearchResult) -> Result<Self, DeserializationError> {
    let payload = &result.payload;
    Ok(Self {
      id: result.id.clone(),
      axis: require_string(payload.get("axis"), "axis")?,
      cluster_id: require_string(payload.get("cluster_id"), "cluster_id")?,
      text: require_string(payload.get("text"), "text")?,
      score: result.score,
      member_count: require_usize(payload.get("member_count"), "member_count")?,
      avg_confidence: require_f32(payload.get("avg_confidence"), "avg_confidence")?,
      created_at: require_timestamp(payload.get("created_at"), "created_at")?,
    })
  }
}

/// A commit search hit
#[derive(Debug, Clone, PartialEq)]
pub struct CommitResult {
  pub id: String,
  pub sha: String,
  pub message: String,
  pub author: String,
  pub author_email: String,
  pub committed_at: DateTime<Utc>,
  pub files_changed: Vec<String>,
  pub score: f32,
}

impl CommitResult {
  /// Parse from a raw search hit
  pub fn from_search_result(result: &SearchResult) -> Result<Self, DeserializationError> {
    let payload = &result.payload;
    Ok(Self {
      id: result.id.clone(),
      sha: require_string(payload.get("sha"), "sha")?,
      message: require_string(payload.get("message"), "message")?,
      author: require_string(payload.get("author"), "author")?,
      author_email: require_string(payload.get("author_email"), "author_email")?,
      committed_at: require_timestamp(payload.get("committed_at"), "committed_at")?,
      files_changed: require_string_array(payload.get("files_changed"), "files_changed")?,
      score: result.score,
    })
  }
}
