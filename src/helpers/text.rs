//! Plain-text helpers: excerpts, reading time, word counts

use lazy_static::lazy_static;
use regex::Regex;

/// Average reading speed used for estimates
pub const WORDS_PER_MINUTE: usize = 200;

lazy_static! {
    static ref MARKDOWN_MARKS: Regex = Regex::new(r"[#*`_~\[\]]").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Count whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated minutes to read `text`, rounded up
pub fn calculate_reading_time(text: &str) -> u32 {
    word_count(text).div_ceil(WORDS_PER_MINUTE) as u32
}

/// Remove HTML tags, keeping the text between them
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

/// Build a plain-text excerpt of at most `length` characters.
///
/// Markdown punctuation and HTML tags are removed first. Truncated output
/// ends with `...`.
pub fn generate_excerpt(content: &str, length: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let without_marks = MARKDOWN_MARKS.replace_all(content, "");
    let plain = HTML_TAG.replace_all(&without_marks, "");
    let plain = plain.trim();

    if plain.chars().count() <= length {
        return plain.to_string();
    }

    let truncated: String = plain.chars().take(length).collect();
    format!("{}...", truncated.trim_end())
}
