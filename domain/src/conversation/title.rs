//! Conversation title cleanup

use crate::util::truncate_with_ellipsis;

/// Title given to conversations before (or instead of) a generated one.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Longest title kept as-is; longer ones are cut with an ellipsis.
pub const MAX_TITLE_CHARS: usize = 50;

/// Normalize a model-generated title.
///
/// Trims whitespace, strips surrounding quotes and shortens anything longer
/// than [`MAX_TITLE_CHARS`] to 47 characters plus `...`.
pub fn clean_title(raw: &str) -> String {
    let title = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    if title.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    truncate_with_ellipsis(title, MAX_TITLE_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_quotes_and_whitespace() {
        assert_eq!(clean_title("  \"Rust Error Handling\"\n"), "Rust Error Handling");
        assert_eq!(clean_title("'Lifetimes'"), "Lifetimes");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(clean_title("   "), DEFAULT_TITLE);
        assert_eq!(clean_title("\"\""), DEFAULT_TITLE);
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let raw = "a".repeat(60);
        let title = clean_title(&raw);
        assert_eq!(title.chars().count(), 50);
        assert!(title.ends_with("..."));

        let exact = "b".repeat(50);
        assert_eq!(clean_title(&exact), exact);
    }
}
