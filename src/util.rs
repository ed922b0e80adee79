//! Small utility helpers used across modules.

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

/// First `n` whitespace-separated words, single-spaced.
pub fn first_words(text: &str, n: usize) -> String {
  text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}
