//! String utilities for the domain layer.

/// Take the first `max_chars` characters of a string (UTF-8 safe).
///
/// Returns a sub-slice of the original string.
pub fn preview(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Truncate a string to at most `max_chars` characters, ending in `...`
/// when anything was cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", preview(s, max_chars.saturating_sub(3)))
    }
}

/// Collapse runs of whitespace into single spaces and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_ascii() {
        assert_eq!(preview("hello world", 5), "hello");
        assert_eq!(preview("hi", 10), "hi");
    }

    #[test]
    fn test_preview_multibyte() {
        assert_eq!(preview("βγδεζ", 2), "βγ");
        assert_eq!(preview("日本語テスト", 3), "日本語");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("ααααααααα", 6), "ααα...");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }
}
