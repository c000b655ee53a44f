//! Query layer - published views, pagination, related content and search
//!
//! The functions at the bottom of this module work on plain slices so they can
//! be exercised without a content directory. [`ContentQuery`] wires them to a
//! [`ContentStore`].

use std::collections::HashMap;

use crate::config::ContentConfig;
use crate::content::{
    sort_by_date, Category, ContentCollection, ContentItem, ContentStore, Result,
    PUBLISHED_CATEGORIES,
};
use crate::helpers::strip_html;

/// Queries over the documents of a content store
pub struct ContentQuery {
    store: ContentStore,
    featured_limit: usize,
    related_limit: usize,
    per_page: usize,
}

impl ContentQuery {
    pub fn new(store: ContentStore, config: &ContentConfig) -> Self {
        Self {
            store,
            featured_limit: config.featured_posts_limit,
            related_limit: config.related_posts_limit,
            per_page: config.posts_per_page,
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Default page size for listings
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Default number of related items
    pub fn related_limit(&self) -> usize {
        self.related_limit
    }

    /// Published work, projects and insights, newest first
    pub fn get_all_published_content(&self) -> Result<Vec<ContentItem>> {
        let mut all = Vec::new();
        for category in PUBLISHED_CATEGORIES {
            let items = self.store.load_content(*category)?;
            all.extend(items.into_iter().filter(|item| item.meta.is_published()));
        }
        sort_by_date(&mut all);
        Ok(all)
    }

    /// Published items marked `featured`, up to the configured limit
    pub fn get_featured_content(&self) -> Result<Vec<ContentItem>> {
        Ok(self
            .get_all_published_content()?
            .into_iter()
            .filter(|item| item.meta.is_featured())
            .take(self.featured_limit)
            .collect())
    }

    /// One page of a category's published items (1-indexed)
    pub fn get_content_by_category(
        &self,
        category: Category,
        page: usize,
        limit: usize,
    ) -> Result<ContentCollection> {
        let items = self.store.load_content(category)?;
        Ok(paginate(published(items), page, limit))
    }

    /// Published items sharing tags with `item`, best match first
    pub fn get_related_content(&self, item: &ContentItem, limit: usize) -> Result<Vec<ContentItem>> {
        let all = self.get_all_published_content()?;
        Ok(related(&all, item, limit))
    }

    /// Case-insensitive substring search over published content
    pub fn search_content(&self, query: &str) -> Result<Vec<ContentItem>> {
        let all = self.get_all_published_content()?;
        Ok(search(&all, query))
    }

    /// Tag usage across published content, most used first
    pub fn tag_counts(&self) -> Result<Vec<(String, usize)>> {
        Ok(tag_counts(&self.get_all_published_content()?))
    }
}

/// Keep items that are not explicitly unpublished
pub fn published(items: Vec<ContentItem>) -> Vec<ContentItem> {
    items
        .into_iter()
        .filter(|item| item.meta.is_published())
        .collect()
}

/// Slice `[(page-1)*limit, page*limit)` and aggregate tags and categories
/// over the whole input.
pub fn paginate(items: Vec<ContentItem>, page: usize, limit: usize) -> ContentCollection {
    let mut tags: Vec<String> = Vec::new();
    let mut categories: Vec<Category> = Vec::new();
    for item in &items {
        for tag in &item.meta.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        if !categories.contains(&item.meta.category) {
            categories.push(item.meta.category);
        }
    }

    let total = items.len();
    let page_items = match page.checked_sub(1) {
        Some(index) => items
            .into_iter()
            .skip(index.saturating_mul(limit))
            .take(limit)
            .collect(),
        None => Vec::new(),
    };

    ContentCollection {
        items: page_items,
        total,
        categories,
        tags,
    }
}

/// Rank `all` by tags shared with `item`.
///
/// The item itself is never returned. Without tags the most recent other
/// items are returned instead; otherwise items sharing no tag are dropped and
/// ties keep their input order.
pub fn related(all: &[ContentItem], item: &ContentItem, limit: usize) -> Vec<ContentItem> {
    let others = all.iter().filter(|other| !other.is_same(item));
    let current_tags = &item.meta.tags;

    if current_tags.is_empty() {
        return others.take(limit).cloned().collect();
    }

    let mut scored: Vec<(usize, &ContentItem)> = others
        .map(|other| {
            let score = other
                .meta
                .tags
                .iter()
                .filter(|tag| current_tags.contains(tag))
                .count();
            (score, other)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, other)| other.clone())
        .collect()
}

/// Items whose title, description, tags or body text contain `query`,
/// ignoring case. Input order is kept.
pub fn search(items: &[ContentItem], query: &str) -> Vec<ContentItem> {
    let needle = query.to_lowercase();

    items
        .iter()
        .filter(|item| {
            let meta = &item.meta;
            meta.title.to_lowercase().contains(&needle)
                || meta.description.to_lowercase().contains(&needle)
                || meta.tags.join(" ").to_lowercase().contains(&needle)
                || item
                    .content
                    .as_deref()
                    .is_some_and(|html| strip_html(html).to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Count tag occurrences, sorted by count then name
pub fn tag_counts(items: &[ContentItem]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        for tag in &item.meta.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}
