//! Field rules for problem metadata.
//!
//! - title: 3 to 200 characters after trimming
//! - url: absolute `http://` or `https://` link with a host, parsed by `url`
//! - insight note: at most 2000 characters

use url::Url;

use crate::domain::DomainError;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;
pub const INSIGHT_NOTE_MAX_CHARS: usize = 2000;
pub const URL_MAX_LEN: usize = 2048;

pub fn validate_title(title: &str) -> Result<String, DomainError> {
  let trimmed = title.trim();
  let len = trimmed.chars().count();
  if len < TITLE_MIN_CHARS || len > TITLE_MAX_CHARS {
    return Err(DomainError::Validation(format!(
      "title must be between {} and {} characters",
      TITLE_MIN_CHARS, TITLE_MAX_CHARS
    )));
  }
  Ok(trimmed.to_string())
}

pub fn validate_url(url: &str) -> Result<String, DomainError> {
  let trimmed = url.trim();
  if trimmed.len() > URL_MAX_LEN {
    return Err(DomainError::Validation(format!(
      "url must be at most {} characters",
      URL_MAX_LEN
    )));
  }

  let parsed = Url::parse(trimmed)
    .map_err(|e| DomainError::Validation(format!("url is not valid: {}", e)))?;

  if !matches!(parsed.scheme(), "http" | "https") {
    return Err(DomainError::Validation("url must use http or https".into()));
  }
  if parsed.host_str().is_none_or(str::is_empty) {
    return Err(DomainError::Validation("url must include a host".into()));
  }
  Ok(trimmed.to_string())
}

pub fn validate_insight_note(note: &str) -> Result<String, DomainError> {
  if note.chars().count() > INSIGHT_NOTE_MAX_CHARS {
    return Err(DomainError::Validation(format!(
      "insight note must be at most {} characters",
      INSIGHT_NOTE_MAX_CHARS
    )));
  }
  Ok(note.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_title_trimmed() {
    assert_eq!(validate_title("  Two Sum  ").unwrap(), "Two Sum");
  }

  #[test]
  fn test_title_too_short() {
    assert!(matches!(validate_title("ab"), Err(DomainError::Validation(_))));
    assert!(validate_title("   ").is_err());
  }

  #[test]
  fn test_title_too_long() {
    let long = "x".repeat(TITLE_MAX_CHARS + 1);
    assert!(validate_title(&long).is_err());
    assert!(validate_title(&"x".repeat(TITLE_MAX_CHARS)).is_ok());
  }

  #[test]
  fn test_title_counts_chars_not_bytes() {
    // 3 chars, 9 bytes
    assert!(validate_title("한국어").is_ok());
  }

  #[test]
  fn test_url_accepts_http_and_https() {
    assert!(validate_url("https://leetcode.com/problems/two-sum/").is_ok());
    assert!(validate_url("http://localhost:8080").is_ok());
  }

  #[test]
  fn test_url_rejects_missing_scheme() {
    assert!(validate_url("leetcode.com/problems/two-sum").is_err());
    assert!(validate_url("ftp://example.com").is_err());
  }

  #[test]
  fn test_url_rejects_missing_host() {
    assert!(validate_url("https://").is_err());
    assert!(validate_url("https://bad host/x").is_err());
  }

  #[test]
  fn test_url_rejects_malformed_authority() {
    for bad in ["https://:80/x", "https://@@@", "http://%%%/", "https://[::/"] {
      assert!(
        matches!(validate_url(bad), Err(DomainError::Validation(_))),
        "{} should be rejected",
        bad
      );
    }
  }

  #[test]
  fn test_url_keeps_original_text() {
    assert_eq!(
      validate_url("  https://leetcode.com/problems/two-sum  ").unwrap(),
      "https://leetcode.com/problems/two-sum"
    );
    assert!(validate_url(&format!("https://x.dev/{}", "a".repeat(URL_MAX_LEN))).is_err());
  }

  #[test]
  fn test_insight_note_limit() {
    assert!(validate_insight_note("").is_ok());
    assert!(validate_insight_note(&"n".repeat(INSIGHT_NOTE_MAX_CHARS)).is_ok());
    assert!(validate_insight_note(&"n".repeat(INSIGHT_NOTE_MAX_CHARS + 1)).is_err());
  }
}
