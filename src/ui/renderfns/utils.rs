/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// First `max_lines` lines of `text`, marking the last kept line when more follow
pub fn preview_lines(text: &str, max_lines: usize) -> Vec<String> {
  let lines: Vec<&str> = text.lines().collect();
  let mut preview: Vec<String> = lines.iter().take(max_lines).map(|l| l.to_string()).collect();
  if lines.len() > max_lines {
    if let Some(last) = preview.last_mut() {
      last.push_str(" ...");
    }
  }
  preview
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("ééééééé", 5), "éé...");
  }

  #[test]
  fn test_preview_caps_lines() {
    let preview = preview_lines("a\nb\nc\nd", 3);
    assert_eq!(preview, vec!["a", "b", "c ..."]);
  }

  #[test]
  fn test_preview_short_text() {
    assert_eq!(preview_lines("only", 3), vec!["only"]);
    assert!(preview_lines("", 3).is_empty());
  }
}
