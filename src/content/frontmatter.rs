//! Front-matter parsing
//!
//! Front-matter is a `---` delimited block of `key: value` lines at the start
//! of a markdown document. Parsing is split in two steps that never touch the
//! filesystem: [`split_front_matter`] finds the block and [`tokenize`] turns it
//! into an ordered key/value mapping. [`FrontMatter::from_fields`] then picks
//! out the keys the content store understands.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

/// Split a document into its front-matter block and the remaining body.
///
/// Returns `None` when the document does not open with `---` or the block is
/// never closed.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start();
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    // The block closes on the first line that is exactly `---`
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let block = rest[..offset].trim_end_matches(|c: char| c == '\r' || c == '\n');
            return Some((block, &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Tokenize a front-matter block into `key -> raw value`.
///
/// Blank lines, `#` comments and lines that are not `key: value` are skipped.
/// Values are trimmed but otherwise left raw. A repeated key keeps its first
/// position and its last value.
pub fn tokenize(block: &str) -> IndexMap<String, String> {
    let mut fields = IndexMap::new();

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };

        let key = key.trim();
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !is_valid_key {
            continue;
        }

        fields.insert(key.to_string(), value.trim().to_string());
    }

    fields
}

/// Strip one pair of matching single or double quotes
pub fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse the inline list syntax `[a, "b", 'c']`.
///
/// Elements are trimmed and unquoted; commas inside quotes do not split.
/// Empty elements and repeats are dropped, first occurrence wins. A value
/// without brackets is a single-element list.
pub fn parse_inline_list(value: &str) -> Vec<String> {
    let value = value.trim();
    let inner = match value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
    {
        Some(inner) => inner,
        None => {
            let single = unquote(value).trim();
            return if single.is_empty() {
                Vec::new()
            } else {
                vec![single.to_string()]
            };
        }
    };

    let mut raw_items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in inner.chars() {
        match (c, quote) {
            ('"' | '\'', None) => {
                quote = Some(c);
                current.push(c);
            }
            (c, Some(q)) if c == q => {
                quote = None;
                current.push(c);
            }
            (',', None) => raw_items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    raw_items.push(current);

    let mut items: Vec<String> = Vec::new();
    for raw in raw_items {
        let item = unquote(raw.trim()).trim();
        if !item.is_empty() && !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}

fn parse_bool(value: &str) -> Option<bool> {
    match unquote(value).trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Recognized front-matter fields of a content document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub featured: Option<bool>,
    pub published: Option<bool>,
    pub slug: Option<String>,
    pub reading_time: Option<u32>,
    pub image: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content), or `None` without a block
    pub fn parse(content: &str) -> Option<(Self, &str)> {
        let (block, body) = split_front_matter(content)?;
        Some((Self::from_fields(&tokenize(block)), body))
    }

    /// Build from tokenized fields, ignoring unknown keys
    pub fn from_fields(fields: &IndexMap<String, String>) -> Self {
        let text = |key: &str| {
            fields
                .get(key)
                .map(|v| unquote(v).trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            title: text("title"),
            description: text("description"),
            date: text("date"),
            author: text("author"),
            tags: fields
                .get("tags")
                .map(|v| parse_inline_list(v))
                .unwrap_or_default(),
            featured: fields.get("featured").and_then(|v| parse_bool(v)),
            published: fields.get("published").and_then(|v| parse_bool(v)),
            slug: text("slug"),
            reading_time: text("readingTime").and_then(|v| v.parse().ok()),
            image: text("image"),
        }
    }

    /// Parse the date string into a sortable timestamp
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    // RFC 3339 / ISO 8601 with offset, normalized to UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter() {
        let content = r#"---
title: Hello World
description: "A first post"
date: 2024-01-15
author: 'Sam'
tags: [rust, "web", 'seo']
featured: true
published: false
readingTime: 7
image: /images/hello.png
layout: post
---

# Hello World

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.description.as_deref(), Some("A first post"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-15"));
        assert_eq!(fm.author.as_deref(), Some("Sam"));
        assert_eq!(fm.tags, vec!["rust", "web", "seo"]);
        assert_eq!(fm.featured, Some(true));
        assert_eq!(fm.published, Some(false));
        assert_eq!(fm.reading_time, Some(7));
        assert_eq!(fm.image.as_deref(), Some("/images/hello.png"));
        assert!(body.contains("This is the content."));
        assert!(!body.contains("layout"));
    }

    #[test]
    fn test_inline_list_strips_quotes_and_spaces() {
        assert_eq!(parse_inline_list("[a, b, c]"), vec!["a", "b", "c"]);
        assert_eq!(
            parse_inline_list(r#"[ "a" ,'b',  c ]"#),
            vec!["a", "b", "c"]
        );
        assert_eq!(parse_inline_list(r#"["x, y", z]"#), vec!["x, y", "z"]);
        assert_eq!(parse_inline_list("[a, , a, b]"), vec!["a", "b"]);
        assert!(parse_inline_list("[]").is_empty());
        assert_eq!(parse_inline_list("solo"), vec!["solo"]);
        assert!(parse_inline_list("").is_empty());
    }

    #[test]
    fn test_tokenize_skips_noise() {
        let fields = tokenize("# comment\n\ntitle: A: B\nnot a field\nweird key: x\nslug: a-b\n");
        assert_eq!(fields.get("title").map(String::as_str), Some("A: B"));
        assert_eq!(fields.get("slug").map(String::as_str), Some("a-b"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(FrontMatter::parse("# Just markdown\n\nbody").is_none());
        assert!(FrontMatter::parse("---\ntitle: never closed\n").is_none());
        assert!(FrontMatter::parse("----\ntitle: x\n---\n").is_none());
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = FrontMatter::parse("---\n---\nbody").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_closing_delimiter_must_be_whole_line() {
        let content = "---\ntitle: Rules\n----\n---extra: x\n---  \nbody";
        let (block, body) = split_front_matter(content).unwrap();
        assert_eq!(block, "title: Rules\n----\n---extra: x");
        assert_eq!(body, "body");

        assert!(split_front_matter("---\ntitle: Open\n----\nbody").is_none());
    }

    #[test]
    fn test_crlf_block() {
        let (fm, body) = FrontMatter::parse("---\r\ntitle: Windows\r\n---\r\nbody").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let (fm, _) =
            FrontMatter::parse("---\ntitle: \"\"\nfeatured: yes\nreadingTime: soon\n---\n")
                .unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(fm.featured, None);
        assert_eq!(fm.reading_time, None);
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-01-15".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");

        assert!(parse_date_string("2024-01-15 10:30:00").is_some());
        assert!(parse_date_string("2024/01/15").is_some());
        assert_eq!(
            parse_date_string("2024-01-15T10:30:00+02:00")
                .unwrap()
                .format("%H:%M")
                .to_string(),
            "08:30"
        );
        assert!(parse_date_string("last tuesday").is_none());
    }
}
