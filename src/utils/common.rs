//! Common utility functions used across the pipeline

/// Format seconds as `M:SS`, flooring to whole seconds.
pub fn duration_label(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Whether `name` is a single path component that cannot escape its directory.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(&['/', '\\', '\0'][..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_label() {
        assert_eq!(duration_label(125.0), "2:05");
        assert_eq!(duration_label(59.9), "0:59");
        assert_eq!(duration_label(0.0), "0:00");
        assert_eq!(duration_label(3600.0), "60:00");
        assert_eq!(duration_label(f64::NAN), "0:00");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  hello \n world\tagain "), 3);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_is_safe_file_name() {
        assert!(is_safe_file_name("video_1.mp4"));
        assert!(!is_safe_file_name("../secret"));
        assert!(!is_safe_file_name("a/b.mp4"));
        assert!(!is_safe_file_name(".."));
        assert!(!is_safe_file_name(""));
    }
}
