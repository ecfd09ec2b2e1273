use tracing::warn;

/// Maximum length in characters for any free-text field on a GHAP record
pub const MAX_TEXT_LEN: usize = 10_000;

/// Truncate text to at most `max_len` characters, logging when truncation fires.
///
/// Counts characters rather than bytes so multi-byte input is never split
/// mid code point.
pub fn truncate_text(text: &str, max_len: usize) -> String {
  let char_count = text.chars().count();
  if char_count <= max_len {
    return text.to_string();
  }

  warn!("Truncating text from {} to {} chars", char_count, max_len);
  text.chars().take(max_len).collect()
}
