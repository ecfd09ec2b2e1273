pub mod error;
pub mod ghap;
pub mod payload;
pub mod resolution;
pub mod text;

pub use error::{DeserializationError, Error, Result, ValidationError};
pub use ghap::{Domain, GhapEntry, GhapId, HistoryEntry, SessionId, Strategy};
pub use payload::{
  Payload, PayloadResult, format_timestamp, optional_array, optional_bool, optional_f32, optional_object,
  optional_string, optional_string_array, optional_timestamp, optional_u32, parse_timestamp, require_array,
  require_f32, require_string, require_string_array, require_timestamp, require_u32, require_usize,
};
pub use resolution::{ConfidenceTier, Lesson, Outcome, OutcomeStatus, RootCause};
pub use text::{MAX_TEXT_LEN, truncate_text};
