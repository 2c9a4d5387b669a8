//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters for log lines and error
/// messages, appending `...` when something was cut.
pub fn excerpt(s: &str, max_chars: usize) -> String {
    let mut chars = s.char_indices();
    match chars.nth(max_chars) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}...", &s[..cut]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_short_string_unchanged() {
        assert_eq!(excerpt("hi", 10), "hi");
        assert_eq!(excerpt("hello", 5), "hello");
    }

    #[test]
    fn excerpt_cuts_and_marks() {
        assert_eq!(excerpt("hello world", 5), "hello...");
    }

    #[test]
    fn excerpt_counts_chars_not_bytes() {
        assert_eq!(excerpt("あのね", 2), "あの...");
    }

    #[test]
    fn excerpt_empty() {
        assert_eq!(excerpt("", 3), "");
    }
}
