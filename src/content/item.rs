//! Content records built by the store

use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;

use super::frontmatter::parse_date_string;
use super::Category;

/// Metadata of a content document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMeta {
    pub title: String,
    pub description: String,
    /// Date as written in the front-matter
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    pub slug: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Parsed `date`, `None` when it does not parse
    #[serde(skip)]
    pub timestamp: Option<NaiveDateTime>,
}

impl ContentMeta {
    /// Create metadata with only the required fields set
    pub fn new(title: &str, date: &str, slug: &str, category: Category) -> Self {
        Self {
            title: title.to_string(),
            description: String::new(),
            date: date.to_string(),
            author: None,
            tags: Vec::new(),
            featured: None,
            published: None,
            slug: slug.to_string(),
            category,
            reading_time: None,
            image: None,
            timestamp: parse_date_string(date),
        }
    }

    /// Anything not explicitly unpublished counts as published
    pub fn is_published(&self) -> bool {
        self.published != Some(false)
    }

    pub fn is_featured(&self) -> bool {
        self.featured == Some(true)
    }
}

/// A loaded content document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    pub meta: ContentMeta,

    /// Rendered HTML body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Source path relative to the content directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Markdown body without front-matter
    #[serde(skip)]
    pub raw: String,
}

impl ContentItem {
    pub fn new(meta: ContentMeta) -> Self {
        Self {
            meta,
            content: None,
            path: None,
            raw: String::new(),
        }
    }

    /// Slug taken from the source file name
    pub fn path_slug(&self) -> Option<&str> {
        let path = self.path.as_deref()?;
        let file_name = path.rsplit(|c: char| c == '/' || c == '\\').next()?;
        Some(
            file_name
                .strip_suffix(".md")
                .or_else(|| file_name.strip_suffix(".markdown"))
                .unwrap_or(file_name),
        )
    }

    /// Whether `slug` names this item by file name or front-matter slug
    pub fn matches_slug(&self, slug: &str) -> bool {
        self.meta.slug == slug || self.path_slug() == Some(slug)
    }

    /// Same document: same category and slug
    pub fn is_same(&self, other: &ContentItem) -> bool {
        self.meta.category == other.meta.category && self.meta.slug == other.meta.slug
    }
}

/// Newest first; items without a valid date go last
pub fn newest_first(a: &ContentItem, b: &ContentItem) -> Ordering {
    match (a.meta.timestamp, b.meta.timestamp) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by [`newest_first`]
pub fn sort_by_date(items: &mut [ContentItem]) {
    items.sort_by(newest_first);
}

/// One page of a filtered content listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentCollection {
    pub items: Vec<ContentItem>,
    /// Size of the filtered set before pagination
    pub total: usize,
    pub categories: Vec<Category>,
    pub tags: Vec<String>,
}

impl ContentCollection {
    /// Number of pages of `limit` items needed for `total`
    pub fn total_pages(&self, limit: usize) -> usize {
        if limit == 0 {
            0
        } else {
            self.total.div_ceil(limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(slug: &str, date: &str) -> ContentItem {
        ContentItem::new(ContentMeta::new(slug, date, slug, Category::Insight))
    }

    #[test]
    fn test_published_defaults_to_true() {
        let mut meta = ContentMeta::new("A", "2024-01-01", "a", Category::Work);
        assert!(meta.is_published());
        meta.published = Some(true);
        assert!(meta.is_published());
        meta.published = Some(false);
        assert!(!meta.is_published());
    }

    #[test]
    fn test_invalid_dates_sort_last() {
        let mut items = vec![
            item("bad", "someday"),
            item("old", "2024-01-01"),
            item("none", ""),
            item("new", "2024-06-01"),
        ];
        sort_by_date(&mut items);
        let slugs: Vec<_> = items.iter().map(|i| i.meta.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old", "bad", "none"]);
    }

    #[test]
    fn test_path_slug() {
        let mut it = item("custom", "2024-01-01");
        it.path = Some("insights/my-post.md".to_string());
        assert_eq!(it.path_slug(), Some("my-post"));
        assert!(it.matches_slug("my-post"));
        assert!(it.matches_slug("custom"));
        assert!(!it.matches_slug("My-Post"));

        it.path = Some(r"insights\win.markdown".to_string());
        assert_eq!(it.path_slug(), Some("win"));
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let mut meta = ContentMeta::new("A", "2024-01-01", "a", Category::Insight);
        meta.reading_time = Some(3);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["readingTime"], 3);
        assert_eq!(json["category"], "insight");
        assert!(json.get("timestamp").is_none());
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn test_total_pages() {
        let collection = ContentCollection {
            items: Vec::new(),
            total: 21,
            categories: Vec::new(),
            tags: Vec::new(),
        };
        assert_eq!(collection.total_pages(10), 3);
        assert_eq!(collection.total_pages(0), 0);
    }
}
