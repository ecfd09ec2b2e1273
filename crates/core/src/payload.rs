//! Payload field extraction utilities
//!
//! Provides centralized extraction functions with consistent error messages
//! for reading typed fields back out of persisted payload mappings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::DeserializationError;

/// The mapping representation every record serializes to and from
pub type Payload = serde_json::Map<String, Value>;

/// Result type for payload extraction
pub type PayloadResult<T> = Result<T, DeserializationError>;

/// Format a timestamp as RFC 3339 UTC with a `Z` suffix
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
  ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an RFC 3339 timestamp, accepting both `Z` and numeric offsets
pub fn parse_timestamp(s: &str, field: &str) -> PayloadResult<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| DeserializationError::invalid_value(field, format!("invalid timestamp: {}", e)))
}

/// Extract a required string field
pub fn require_string(value: Option<&Value>, field: &str) -> PayloadResult<String> {
  match value {
    Some(v) => v
      .as_str()
      .map(String::from)
      .ok_or_else(|| DeserializationError::invalid_type(field, "string")),
    None => Err(DeserializationError::missing(field)),
  }
}

/// Extract an optional string field
pub fn optional_string(value: Option<&Value>, field: &str) -> PayloadResult<Option<String>> {
  match value {
    Some(v) if v.is_null() => Ok(None),
    Some(v) => v
      .as_str()
      .map(|s| Some(s.to_string()))
      .ok_or_else(|| DeserializationError::invalid_type(field, "string")),
    None => Ok(None),
  }
}

/// Extract a required unsigned integer field
pub fn require_u32(value: Option<&Value>, field: &str) -> PayloadResult<u32> {
  match value {
    Some(v) => v
      .as_u64()
      .and_then(|n| u32::try_from(n).ok())
      .ok_or_else(|| DeserializationError::invalid_type(field, "non-negative integer")),
    None => Err(DeserializationError::missing(field)),
  }
}

/// Extract an optional unsigned integer field
pub fn optional_u32(value: Option<&Value>, field: &str) -> PayloadResult<Option<u32>> {
  match value {
    Some(v) if v.is_null() => Ok(None),
    Some(v) => v
      .as_u64()
      .and_then(|n| u32::try_from(n).ok())
      .map(Some)
      .ok_or_else(|| DeserializationError::invalid_type(field, "non-negative integer")),
    None => Ok(None),
  }
}

/// Extract a required count field
pub fn require_usize(value: Option<&Value>, field: &str) -> PayloadResult<usize> {
  match value {
    Some(v) => v
      .as_u64()
      .and_then(|n| usize::try_from(n).ok())
      .ok_or_else(|| DeserializationError::invalid_type(field, "non-negative integer")),
    None => Err(DeserializationError::missing(field)),
  }
}

/// Extract a required float field
pub fn require_f32(value: Option<&Value>, field: &str) -> PayloadResult<f32> {
  match value {
    Some(v) => v
      .as_f64()
      .map(|n| n as f32)
      .ok_or_else(|| DeserializationError::invalid_type(field, "number")),
    None => Err(DeserializationError::missing(field)),
  }
}

/// Extract an optional float field
pub fn optional_f32(value: Option<&Value>, field: &str) -> PayloadResult<Option<f32>> {
  match value {
    Some(v) if v.is_null() => Ok(None),
    Some(v) => v
      .as_f64()
      .map(|n| Some(n as f32))
      .ok_or_else(|| DeserializationError::invalid_type(field, "number")),
    None => Ok(None),
  }
}

/// Extract an optional boolean field
pub fn optional_bool(value: Option<&Value>, field: &str) -> PayloadResult<Option<bool>> {
  match value {
    Some(v) if v.is_null() => Ok(None),
    Some(v) => v
      .as_bool()
      .map(Some)
      .ok_or_else(|| DeserializationError::invalid_type(field, "boolean")),
    None => Ok(None),
  }
}

/// Extract a required array field
pub fn require_array(value: Option<&Value>, field: &str) -> PayloadResult<Vec<Value>> {
  match value {
    Some(v) => v
      .as_array()
      .cloned()
      .ok_or_else(|| DeserializationError::invalid_type(field, "array")),
    None => Err(DeserializationError::missing(field)),
  }
}

/// Extract an optional array field
pub fn optional_array(value: Option<&Value>, field: &str) -> PayloadResult<Option<Vec<Value>>> {
  match value {
    Some(v) if v.is_null() => Ok(None),
    Some(v) => v
      .as_array()
      .map(|a| Some(a.clone()))
      .ok_or_else(|| DeserializationError::invalid_type(field, "array")),
    None => Ok(None),
  }
}

/// Extract a required array of strings
pub fn require_string_array(value: Option<&Value>, field: &str) -> PayloadResult<Vec<String>> {
  let arr = require_array(value, field)?;
  arr
    .into_iter()
    .enumerate()
    .map(|(i, v)| {
      v.as_str()
        .map(String::from)
        .ok_or_else(|| DeserializationError::invalid_type(format!("{}[{}]", field, i), "string"))
    })
    .collect()
}

/// Extract an optional array of strings
pub fn optional_string_array(value: Option<&Value>, field: &str) -> PayloadResult<Option<Vec<String>>> {
  match optional_array(value, field)? {
    Some(arr) => {
      let result: PayloadResult<Vec<String>> = arr
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
          v.as_str()
            .map(String::from)
            .ok_or_else(|| DeserializationError::invalid_type(format!("{}[{}]", field, i), "string"))
        })
        .collect();
      result.map(Some)
    }
    None => Ok(None),
  }
}

/// Extract an optional nested object field
pub fn optional_object<'a>(value: Option<&'a Value>, field: &str) -> PayloadResult<Option<&'a Payload>> {
  match value {
    Some(v) if v.is_null() => Ok(None),
    Some(v) => v
      .as_object()
      .map(Some)
      .ok_or_else(|| DeserializationError::invalid_type(field, "object")),
    None => Ok(None),
  }
}

/// Extract a required timestamp field
pub fn require_timestamp(value: Option<&Value>, field: &str) -> PayloadResult<DateTime<Utc>> {
  let s = require_string(value, field)?;
  parse_timestamp(&s, field)
}

/// Extract an optional timestamp field
pub fn optional_timestamp(value: Option<&Value>, field: &str) -> PayloadResult<Option<DateTime<Utc>>> {
  match optional_string(value, field)? {
    Some(s) => parse_timestamp(&s, field).map(Some),
    None => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use serde_json::json;

  #[test]
  fn test_require_string() {
    let obj = json!({"goal": "fix the build"});
    assert_eq!(require_string(obj.get("goal"), "goal").unwrap(), "fix the build");

    let err = require_string(obj.get("missing"), "missing").unwrap_err();
    assert_eq!(err.field, "missing");
    assert!(err.message.contains("required key"));

    let obj = json!({"goal": 123});
    assert!(require_string(obj.get("goal"), "goal").is_err());
  }

  #[test]
  fn test_require_string_rejects_null() {
    let obj = json!({"goal": null});
    let err = require_string(obj.get("goal"), "goal").unwrap_err();
    assert!(err.message.contains("expected string"));
  }

  #[test]
  fn test_optional_string() {
    let obj = json!({"surprise": "it was DNS"});
    assert_eq!(
      optional_string(obj.get("surprise"), "surprise").unwrap(),
      Some("it was DNS".to_string())
    );
    assert_eq!(optional_string(obj.get("missing"), "missing").unwrap(), None);

    let obj = json!({"surprise": null});
    assert_eq!(optional_string(obj.get("surprise"), "surprise").unwrap(), None);
  }

  #[test]
  fn test_require_u32() {
    let obj = json!({"iteration_count": 3});
    assert_eq!(require_u32(obj.get("iteration_count"), "iteration_count").unwrap(), 3);

    let obj = json!({"iteration_count": -1});
    assert!(require_u32(obj.get("iteration_count"), "iteration_count").is_err());

    let obj = json!({"iteration_count": "three"});
    assert!(require_u32(obj.get("iteration_count"), "iteration_count").is_err());
  }

  #[test]
  fn test_optional_u32_default_path() {
    let obj = json!({});
    assert_eq!(optional_u32(obj.get("iteration_count"), "iteration_count").unwrap(), None);
  }

  #[test]
  fn test_require_f32() {
    let obj = json!({"avg_confidence": 0.75});
    let n = require_f32(obj.get("avg_confidence"), "avg_confidence").unwrap();
    assert!((n - 0.75).abs() < f32::EPSILON);

    // Integers are valid numbers
    let obj = json!({"avg_confidence": 1});
    assert!((require_f32(obj.get("avg_confidence"), "avg_confidence").unwrap() - 1.0).abs() < f32::EPSILON);
  }

  #[test]
  fn test_optional_bool() {
    let obj = json!({"auto_captured": true});
    assert_eq!(optional_bool(obj.get("auto_captured"), "auto_captured").unwrap(), Some(true));
    assert_eq!(optional_bool(obj.get("missing"), "missing").unwrap(), None);

    let obj = json!({"auto_captured": "yes"});
    assert!(optional_bool(obj.get("auto_captured"), "auto_captured").is_err());
  }

  #[test]
  fn test_require_string_array() {
    let obj = json!({"files_changed": ["src/main.rs", "src/lib.rs"]});
    let files = require_string_array(obj.get("files_changed"), "files_changed").unwrap();
    assert_eq!(files, vec!["src/main.rs", "src/lib.rs"]);

    let obj = json!({"files_changed": ["src/main.rs", 2]});
    let err = require_string_array(obj.get("files_changed"), "files_changed").unwrap_err();
    assert_eq!(err.field, "files_changed[1]");
  }

  #[test]
  fn test_optional_string_array() {
    let obj = json!({});
    assert_eq!(optional_string_array(obj.get("tags"), "tags").unwrap(), None);

    let obj = json!({"tags": null});
    assert_eq!(optional_string_array(obj.get("tags"), "tags").unwrap(), None);

    let obj = json!({"tags": ["rust", "async"]});
    assert_eq!(
      optional_string_array(obj.get("tags"), "tags").unwrap(),
      Some(vec!["rust".to_string(), "async".to_string()])
    );
  }

  #[test]
  fn test_optional_object() {
    let obj = json!({"root_cause": {"category": "timeout"}});
    let nested = optional_object(obj.get("root_cause"), "root_cause").unwrap().unwrap();
    assert_eq!(nested.get("category").unwrap(), "timeout");

    let obj = json!({"root_cause": null});
    assert!(optional_object(obj.get("root_cause"), "root_cause").unwrap().is_none());

    let obj = json!({"root_cause": "timeout"});
    assert!(optional_object(obj.get("root_cause"), "root_cause").is_err());
  }

  #[test]
  fn test_format_timestamp_uses_z_suffix() {
    let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    let s = format_timestamp(ts);
    assert!(s.ends_with('Z'));
    assert!(s.starts_with("2024-01-15T10:30:00"));
  }

  #[test]
  fn test_parse_timestamp_accepts_both_offsets() {
    let z = parse_timestamp("2024-01-15T10:30:00Z", "created_at").unwrap();
    let offset = parse_timestamp("2024-01-15T10:30:00+00:00", "created_at").unwrap();
    assert_eq!(z, offset);

    let err = parse_timestamp("not a timestamp", "created_at").unwrap_err();
    assert_eq!(err.field, "created_at");
    assert!(err.message.contains("invalid timestamp"));
  }

  #[test]
  fn test_timestamp_round_trip_preserves_subseconds() {
    let ts = Utc::now();
    let parsed = parse_timestamp(&format_timestamp(ts), "ts").unwrap();
    assert_eq!(ts, parsed);
  }

  #[test]
  fn test_require_timestamp() {
    let obj = json!({"created_at": "2024-01-15T10:30:00Z"});
    assert!(require_timestamp(obj.get("created_at"), "created_at").is_ok());

    let obj = json!({});
    assert!(require_timestamp(obj.get("created_at"), "created_at").is_err());
  }

  #[test]
  fn test_optional_timestamp() {
    let obj = json!({"verified_at": null});
    assert_eq!(optional_timestamp(obj.get("verified_at"), "verified_at").unwrap(), None);

    let obj = json!({"verified_at": "2024-01-15T10:30:00Z"});
    assert!(optional_timestamp(obj.get("verified_at"), "verified_at").unwrap().is_some());
  }
}
