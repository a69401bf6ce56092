//! Ranking extraction for Stage 2.
//!
//! Raters are asked to end their critique with a strict trailer:
//!
//! ```text
//! FINAL RANKING:
//! 1. Response C
//! 2. Response A
//! ```
//!
//! [`parse_ranking_from_text`] is total: malformed output degrades to a
//! partial or empty list, never an error.

use regex::Regex;
use std::sync::LazyLock;

/// Literal line that opens the ranking trailer.
pub const FINAL_RANKING_MARKER: &str = "FINAL RANKING:";

static NUMBERED_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s*(Response [A-Z])").expect("valid regex"));

static RESPONSE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Response [A-Z]").expect("valid regex"));

/// Extract the ordered list of `"Response X"` labels from a rater's text.
///
/// Strategy, in order:
/// 1. After the first `FINAL RANKING:` marker, take numbered entries
///    (`<digits>. Response X`, whitespace after the period optional).
/// 2. If there are none, take any `Response X` occurrences after the marker.
/// 3. Without a marker, take any `Response X` occurrences in the whole text.
///
/// # Examples
///
/// ```
/// use council_domain::parse_ranking_from_text;
///
/// let text = "A is fine.\n\nFINAL RANKING:\n1. Response B\n2. Response A\n";
/// assert_eq!(parse_ranking_from_text(text), vec!["Response B", "Response A"]);
/// assert!(parse_ranking_from_text("no labels at all").is_empty());
/// ```
pub fn parse_ranking_from_text(ranking_text: &str) -> Vec<String> {
    if let Some((_, section)) = ranking_text.split_once(FINAL_RANKING_MARKER) {
        // Only the text up to a second marker counts as the trailer.
        let section = section
            .split_once(FINAL_RANKING_MARKER)
            .map_or(section, |(first, _)| first);

        let numbered: Vec<String> = NUMBERED_ENTRY
            .captures_iter(section)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect();
        if !numbered.is_empty() {
            return numbered;
        }

        return find_labels(section);
    }

    find_labels(ranking_text)
}

fn find_labels(text: &str) -> Vec<String> {
    RESPONSE_LABEL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Render labels in the canonical trailer format.
pub fn format_ranking(labels: &[String]) -> String {
    let mut out = String::from(FINAL_RANKING_MARKER);
    for (i, label) in labels.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", i + 1, label));
    }
    out
}
