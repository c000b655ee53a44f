//! Content store - discovers markdown documents and builds content items

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use walkdir::WalkDir;

use super::error::{ContentError, Result};
use super::item::{sort_by_date, ContentItem, ContentMeta};
use super::{Category, CategoryResolver, FrontMatter, MarkdownRenderer};
use crate::config::{CacheMode, SiteConfig};
use crate::helpers::calculate_reading_time;

/// Loads content documents from the content directory
pub struct ContentStore {
    root: PathBuf,
    resolver: CategoryResolver,
    renderer: MarkdownRenderer,
    mode: CacheMode,
    /// Document set read at open / last reload (startup mode only)
    snapshot: RwLock<Arc<Vec<ContentItem>>>,
}

impl ContentStore {
    /// Open a store over `root` using the site configuration
    pub fn open(config: &SiteConfig, root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            root: root.into(),
            resolver: CategoryResolver::new(&config.category_map),
            renderer: MarkdownRenderer::with_theme(&config.highlight.theme),
            mode: config.content.cache,
            snapshot: RwLock::new(Arc::new(Vec::new())),
        };

        if store.mode == CacheMode::Startup {
            store.reload()?;
        }

        Ok(store)
    }

    /// Content root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_mode(&self) -> CacheMode {
        self.mode
    }

    /// Re-read the content directory into the snapshot.
    /// Returns the number of documents loaded.
    pub fn reload(&self) -> Result<usize> {
        let items = self.scan()?;
        let count = items.len();
        let mut snapshot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *snapshot = Arc::new(items);
        tracing::info!("Loaded {} documents from {:?}", count, self.root);
        Ok(count)
    }

    /// All loaded documents, newest first
    pub fn documents(&self) -> Result<Arc<Vec<ContentItem>>> {
        match self.mode {
            CacheMode::Startup => {
                let snapshot = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
                Ok(Arc::clone(&snapshot))
            }
            CacheMode::PerCall => Ok(Arc::new(self.scan()?)),
        }
    }

    /// Load all documents of one category, newest first
    pub fn load_content(&self, category: Category) -> Result<Vec<ContentItem>> {
        Ok(self
            .documents()?
            .iter()
            .filter(|item| item.meta.category == category)
            .cloned()
            .collect())
    }

    /// Load a single document by category and slug.
    ///
    /// The slug matches either the file name or the front-matter `slug`.
    /// `Ok(None)` means no such document.
    pub fn load_content_item(&self, category: Category, slug: &str) -> Result<Option<ContentItem>> {
        Ok(self
            .documents()?
            .iter()
            .find(|item| item.meta.category == category && item.matches_slug(slug))
            .cloned())
    }

    /// Walk the content directory and parse every categorized document
    pub fn scan(&self) -> Result<Vec<ContentItem>> {
        if !self.root.exists() {
            tracing::warn!("Content directory {:?} does not exist", self.root);
            return Ok(Vec::new());
        }

        let mut items = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                tracing::error!("Failed to enumerate content: {}", e);
                ContentError::from(e)
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let Some(category) = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .and_then(|dir| self.resolver.resolve(dir))
            else {
                tracing::debug!("Skipping {:?}: directory is not a category", path);
                continue;
            };

            let source = fs::read_to_string(path).map_err(|source| {
                tracing::error!("Failed to read {:?}: {}", path, source);
                ContentError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

            let relative = path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            match parse_document(&source, &relative, category, Some(&self.renderer)) {
                Some(item) => items.push(item),
                None => tracing::debug!("Skipping {:?}: missing front-matter or title", path),
            }
        }

        sort_by_date(&mut items);
        Ok(items)
    }
}

/// Build a content item from a document's source text.
///
/// Returns `None` for documents without front-matter or without a title;
/// those are left out of every listing.
pub fn parse_document(
    source: &str,
    relative_path: &str,
    category: Category,
    renderer: Option<&MarkdownRenderer>,
) -> Option<ContentItem> {
    let (fm, body) = FrontMatter::parse(source)?;
    let title = fm.title?;

    let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    let file_slug = file_name
        .strip_suffix(".md")
        .or_else(|| file_name.strip_suffix(".markdown"))
        .unwrap_or(file_name);
    let slug = fm.slug.unwrap_or_else(|| file_slug.to_string());

    let mut meta = ContentMeta::new(&title, fm.date.as_deref().unwrap_or(""), &slug, category);
    meta.description = fm.description.unwrap_or_default();
    meta.author = fm.author;
    meta.tags = fm.tags;
    meta.featured = fm.featured;
    meta.published = fm.published;
    meta.image = fm.image;
    meta.reading_time = fm.reading_time.or_else(|| Some(calculate_reading_time(body)));

    let mut item = ContentItem::new(meta);
    item.content = renderer.map(|r| r.render_body(body));
    item.path = Some(relative_path.to_string());
    item.raw = body.to_string();
    Some(item)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
