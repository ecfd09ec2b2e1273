use std::fmt;
use thiserror::Error;

/// A construction-time validation error with field information
#[derive(Debug, Clone, Error)]
pub struct ValidationError {
  pub field: String,
  pub message: String,
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.field, self.message)
  }
}

impl ValidationError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      message: message.into(),
    }
  }

  /// Create error for a required text field that is empty or whitespace
  pub fn blank(field: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      message: "must not be blank".to_string(),
    }
  }
}

/// A payload reconstruction error carrying the field path that failed
#[derive(Debug, Clone, Error)]
pub struct DeserializationError {
  pub field: String,
  pub message: String,
}

impl fmt::Display for DeserializationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.field, self.message)
  }
}

impl DeserializationError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      message: message.into(),
    }
  }

  /// Create error for a missing required key
  pub fn missing(field: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      message: "required key missing".to_string(),
    }
  }

  /// Create error for a value with the wrong JSON type
  pub fn invalid_type(field: impl Into<String>, expected: &str) -> Self {
    Self {
      field: field.into(),
      message: format!("expected {}", expected),
    }
  }

  /// Create error for a well-typed value that fails to parse
  pub fn invalid_value(field: impl Into<String>, detail: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      message: detail.into(),
    }
  }

  /// Prefix the field path when an error surfaces from a nested payload
  pub fn prefixed(mut self, parent: &str) -> Self {
    self.field = format!("{}.{}", parent, self.field);
    self
  }
}

#[derive(Error, Debug)]
pub enum Error {
  #[error("Validation: {0}")]
  Validation(#[from] ValidationError),

  #[error("Deserialization: {0}")]
  Deserialization(#[from] DeserializationError),

  #[error("Json: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
