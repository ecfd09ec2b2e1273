//! End-to-end tests for the experience pipeline
//!
//! A resolved GHAP entry is journaled, indexed per axis, and read back as a
//! typed search result. The structured resolution artifacts must survive the
//! whole trip as the same types the observation side produced.

use ghap_core::{
  Domain, GhapEntry, GhapId, Lesson, Outcome, OutcomeStatus, Payload, RootCause, SessionId, Strategy,
  format_timestamp,
};
use search::{Axis, ExperienceResult, SearchResult};
use serde_json::Value;

/// Build an entry that chased an upstream timeout to resolution
fn resolved_entry() -> GhapEntry {
  let mut entry = GhapEntry::new(
    GhapId::from("ghap_20240115_103000_a1b2c3"),
    SessionId::from("session_20240115_100000_d4e5f6"),
    Domain::Debugging,
    Strategy::RootCauseAnalysis,
    "Stop intermittent 504s on the checkout endpoint",
    "The connection pool is exhausted under load",
    "Capture pool metrics during a load test",
    "Pool utilization will hit 100% before the 504s appear",
  )
  .expect("entry should build");

  entry
    .revise(
      Some("The upstream payment service is timing out, not the pool"),
      Some("Trace one failing request across both services"),
      Some("The upstream call will exceed our client deadline"),
    )
    .expect("revision should apply");

  let outcome = Outcome::new(
    OutcomeStatus::Confirmed,
    "Upstream latency exceeded the client deadline; raised it and added retry",
    true,
  )
  .expect("outcome should build");

  entry
    .resolve(
      outcome,
      Some("Pool utilization never went above 40%"),
      Some(RootCause::new("timeout", "upstream latency").expect("root cause should build")),
      Some(
        Lesson::new(
          "Tracing a single request end to end",
          Some("Measure before blaming the usual suspect".into()),
        )
        .expect("lesson should build"),
      ),
    )
    .expect("resolve should succeed");

  entry
}

/// Build the per-axis document an indexer would persist for a resolved entry
fn index_payload(entry: &GhapEntry, axis: Axis) -> Payload {
  let outcome = entry.outcome.as_ref().expect("entry must be resolved");
  let tier = entry.confidence_tier.expect("resolved entry has a tier");

  let mut payload = Payload::new();
  payload.insert("ghap_id".into(), Value::String(entry.id.as_str().into()));
  payload.insert("session_id".into(), Value::String(entry.session_id.as_str().into()));
  payload.insert("created_at".into(), Value::String(format_timestamp(entry.created_at)));
  payload.insert("captured_at".into(), Value::from(outcome.captured_at.timestamp()));
  payload.insert("domain".into(), Value::String(entry.domain.as_str().into()));
  payload.insert("strategy".into(), Value::String(entry.strategy.as_str().into()));
  payload.insert("outcome_status".into(), Value::String(outcome.status.as_str().into()));
  payload.insert("confidence_tier".into(), Value::String(tier.as_str().into()));
  payload.insert("iteration_count".into(), Value::from(entry.iteration_count));

  payload.insert("axis".into(), Value::String(axis.as_str().into()));
  payload.insert("goal".into(), Value::String(entry.goal.clone()));
  payload.insert("hypothesis".into(), Value::String(entry.hypothesis.clone()));
  payload.insert("action".into(), Value::String(entry.action.clone()));
  payload.insert("prediction".into(), Value::String(entry.prediction.clone()));
  payload.insert("outcome_result".into(), Value::String(outcome.result.clone()));

  if let Some(surprise) = &entry.surprise {
    payload.insert("surprise".into(), Value::String(surprise.clone()));
  }
  if let Some(root_cause) = &entry.root_cause {
    payload.insert("root_cause".into(), Value::Object(root_cause.to_payload()));
  }
  if let Some(lesson) = &entry.lesson {
    payload.insert("lesson".into(), Value::Object(lesson.to_payload()));
  }

  payload
}

#[test]
fn test_resolved_entry_flows_into_experience_result() {
  let entry = resolved_entry();
  let hit = SearchResult::new(entry.id.as_str(), 0.93, index_payload(&entry, Axis::Full));

  let experience = ExperienceResult::from_search_result(&hit).expect("hit should parse");

  assert_eq!(experience.ghap_id, entry.id.as_str());
  assert_eq!(experience.axis, "full");
  assert_eq!(experience.domain, "debugging");
  assert_eq!(experience.strategy, "root-cause-analysis");
  assert_eq!(experience.outcome_status, "confirmed");
  assert_eq!(experience.confidence_tier, "gold");
  assert_eq!(experience.iteration_count, 2);
  assert_eq!(experience.surprise.as_deref(), Some("Pool utilization never went above 40%"));
  assert_eq!(experience.created_at, entry.created_at);

  // The structured artifacts arrive unchanged.
  assert_eq!(experience.root_cause, entry.root_cause);
  assert_eq!(experience.lesson, entry.lesson);
}

#[test]
fn test_root_cause_type_is_shared_across_crates() {
  let entry = resolved_entry();
  let hit = SearchResult::new(entry.id.as_str(), 0.93, index_payload(&entry, Axis::RootCause));
  let experience = ExperienceResult::from_search_result(&hit).expect("hit should parse");

  // No conversion: the search-side field IS the observation type.
  let canonical: ghap_core::resolution::RootCause = experience.root_cause.clone().expect("root cause present");
  assert_eq!(canonical, RootCause::new("timeout", "upstream latency").unwrap());

  let lesson: ghap_core::resolution::Lesson = experience.lesson.clone().expect("lesson present");
  assert_eq!(lesson.what_worked, "Tracing a single request end to end");
}

#[test]
fn test_journal_round_trip_then_index() {
  let entry = resolved_entry();

  let journaled = GhapEntry::from_json(&entry.to_json()).expect("journal line should parse");
  assert_eq!(journaled, entry);

  let hit = SearchResult::new(
    journaled.id.as_str(),
    0.88,
    index_payload(&journaled, Axis::Surprise),
  );
  let experience = ExperienceResult::from_search_result(&hit).expect("hit should parse");

  assert_eq!(experience.axis, "surprise");
  assert_eq!(experience.root_cause, entry.root_cause);
}

#[test]
fn test_every_axis_document_parses() {
  let entry = resolved_entry();

  for axis in Axis::ALL {
    let hit = SearchResult::new(entry.id.as_str(), 0.5, index_payload(&entry, axis));
    let experience = ExperienceResult::from_search_result(&hit).expect("every axis payload should parse");
    assert_eq!(experience.axis, axis.as_str());
  }
}

#[test]
fn test_axis_collections_are_distinct() {
  let collections: Vec<&str> = Axis::ALL.iter().map(|a| a.collection().as_str()).collect();
  assert_eq!(
    collections,
    vec!["ghap_full", "ghap_strategy", "ghap_surprise", "ghap_root_cause"]
  );
}

#[test]
fn test_abandoned_entry_round_trip() {
  let mut entry = GhapEntry::new(
    GhapId::generate(),
    SessionId::generate(),
    Domain::Performance,
    Strategy::TrialAndError,
    "Shave 200ms off cold start",
    "Lazy-loading the parser will help",
    "Defer parser construction",
    "Cold start drops below 1s",
  )
  .unwrap();
  entry.abandon("Deprioritized for the release").unwrap();

  let hit = SearchResult::new(entry.id.as_str(), 0.4, index_payload(&entry, Axis::Full));
  let experience = ExperienceResult::from_search_result(&hit).unwrap();

  assert_eq!(experience.outcome_status, "abandoned");
  assert_eq!(experience.confidence_tier, "abandoned");
  assert!(experience.root_cause.is_none());
  assert!(experience.lesson.is_none());
}
