//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. The structs below are the
//! serializable views handed to them.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::{ContentConfig, SiteConfig};
use crate::content::{Category, CategoryInfo, ContentItem};
use crate::helpers::{date_iso, format_date, generate_excerpt, strip_html};
use crate::navigation::{NavigationItem, FOOTER_NAVIGATION, MAIN_NAVIGATION, SOCIAL_LINKS};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Only rendered markdown and JSON-LD are inserted verbatim; every other
        // string is piped through `escape` in the templates
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("listing.html", include_str!("site/listing.html")),
            ("detail.html", include_str!("site/detail.html")),
            ("search.html", include_str!("site/search.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
            ("partials/card.html", include_str!("site/partials/card.html")),
            ("partials/tags.html", include_str!("site/partials/tags.html")),
            (
                "partials/pager.html",
                include_str!("site/partials/pager.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub url: String,
    pub language: String,
    pub author: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub href: String,
    pub label: String,
    pub description: Option<String>,
    pub external: bool,
    pub active: bool,
}

impl NavLink {
    fn from_item(item: &NavigationItem, path: &str) -> Self {
        Self {
            href: item.href.to_string(),
            label: item.label.to_string(),
            description: item.description.map(str::to_string),
            external: item.external,
            active: item.is_active(path),
        }
    }
}

/// Layout data shared by every page
#[derive(Debug, Clone, Serialize)]
pub struct ChromeData {
    pub site: SiteData,
    pub path: String,
    pub main_nav: Vec<NavLink>,
    pub footer_nav: Vec<NavLink>,
    pub social_links: Vec<NavLink>,
    pub year: i32,
}

impl ChromeData {
    pub fn new(config: &SiteConfig, path: &str) -> Self {
        let links = |items: &[NavigationItem]| {
            items
                .iter()
                .map(|item| NavLink::from_item(item, path))
                .collect()
        };

        Self {
            site: SiteData {
                title: config.title.clone(),
                description: config.description.clone(),
                url: config.url.trim_end_matches('/').to_string(),
                language: config.language.clone(),
                author: config.author.clone(),
            },
            path: path.to_string(),
            main_nav: links(MAIN_NAVIGATION),
            footer_nav: links(FOOTER_NAVIGATION),
            social_links: links(SOCIAL_LINKS),
            year: chrono::Local::now().year(),
        }
    }
}

/// A content item as shown on cards and detail pages
#[derive(Debug, Clone, Serialize)]
pub struct ItemData {
    pub title: String,
    pub description: String,
    pub date: String,
    pub date_iso: String,
    pub date_display: String,
    pub author: String,
    pub url: String,
    pub category: Category,
    pub category_title: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub reading_time: Option<u32>,
    pub image: Option<String>,
    pub featured: bool,
}

impl ItemData {
    pub fn from_item(item: &ContentItem, config: &ContentConfig) -> Self {
        let meta = &item.meta;
        let info = meta.category.info();

        let excerpt = if meta.description.is_empty() {
            let source = item
                .content
                .as_deref()
                .map(strip_html)
                .unwrap_or_else(|| item.raw.clone());
            generate_excerpt(&source, config.excerpt_length)
        } else {
            meta.description.clone()
        };

        Self {
            title: meta.title.clone(),
            description: meta.description.clone(),
            date: meta.date.clone(),
            date_iso: date_iso(&meta.date),
            date_display: format_date(&meta.date, &config.date_format),
            author: meta
                .author
                .clone()
                .unwrap_or_else(|| config.default_author.clone()),
            url: item_url(item),
            category: meta.category,
            category_title: info.title.to_string(),
            tags: meta.tags.clone(),
            excerpt,
            reading_time: meta.reading_time,
            image: meta.image.clone(),
            featured: meta.is_featured(),
        }
    }

    pub fn from_items(items: &[ContentItem], config: &ContentConfig) -> Vec<Self> {
        items
            .iter()
            .map(|item| Self::from_item(item, config))
            .collect()
    }
}

/// Site-relative URL of an item's detail page
pub fn item_url(item: &ContentItem) -> String {
    format!("{}/{}", item.meta.category.info().path, item.meta.slug)
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub current: usize,
    pub total_pages: usize,
    pub total: usize,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

impl PaginationData {
    pub fn new(base_path: &str, current: usize, total: usize, per_page: usize) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        let page_url = |page: usize| {
            if page == 1 {
                base_path.to_string()
            } else {
                format!("{}?page={}", base_path, page)
            }
        };

        Self {
            current,
            total_pages,
            total,
            prev_url: (current > 1 && current <= total_pages + 1).then(|| page_url(current - 1)),
            next_url: (current >= 1 && current < total_pages).then(|| page_url(current + 1)),
        }
    }
}

/// Category heading data for listing pages
#[derive(Debug, Clone, Serialize)]
pub struct CategoryData {
    pub name: Category,
    #[serde(flatten)]
    pub info: CategoryInfo,
}

impl From<Category> for CategoryData {
    fn from(name: Category) -> Self {
        Self {
            name,
            info: name.info(),
        }
    }
}
