//! schema.org structured data (JSON-LD) for pages
//!
//! Every generator is a pure mapping from content items and the site identity
//! to a serializable record. Nothing here performs I/O.

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::ContentItem;
use crate::helpers::word_count;

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Site-wide identity merged into every record
#[derive(Debug, Clone, PartialEq)]
pub struct SiteIdentity {
    pub name: String,
    pub url: String,
    pub logo: String,
    pub author_name: String,
    pub language: String,
}

impl From<&SiteConfig> for SiteIdentity {
    fn from(config: &SiteConfig) -> Self {
        Self {
            name: config.title.clone(),
            url: config.url.trim_end_matches('/').to_string(),
            logo: config.logo.clone(),
            author_name: config.author.clone(),
            language: config.language.clone(),
        }
    }
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self::from(&SiteConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    pub logo: ImageObject,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPageRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPosting {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    pub description: String,
    pub image: String,
    pub date_published: String,
    pub date_modified: String,
    pub author: Person,
    pub publisher: Organization,
    pub main_entity_of_page: WebPageRef,
    pub keywords: String,
    pub article_section: String,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_required: Option<String>,
    pub in_language: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    pub description: String,
    pub image: String,
    pub date_published: String,
    pub date_modified: String,
    pub author: Person,
    pub publisher: Organization,
    pub main_entity_of_page: WebPageRef,
    pub keywords: String,
    pub word_count: usize,
    pub in_language: String,
    pub url: String,
}

/// Post entry inside a [`Blog`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostSummary {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    pub description: String,
    pub image: String,
    pub date_published: String,
    pub author: Person,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    pub author: Person,
    pub publisher: Organization,
    pub blog_post: Vec<BlogPostSummary>,
    pub in_language: String,
}

/// Name and URL of one breadcrumb step
#[derive(Debug, Clone, PartialEq)]
pub struct Crumb {
    pub name: String,
    pub url: String,
}

impl Crumb {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub position: usize,
    pub name: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url_template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchAction {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub target: EntryPoint,
    #[serde(rename = "query-input")]
    pub query_input: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSite {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    pub author: Person,
    pub publisher: Organization,
    pub in_language: String,
    pub potential_action: SearchAction,
}

/// Structured data generators bound to one site identity
#[derive(Debug, Clone, Default)]
pub struct StructuredData {
    site: SiteIdentity,
}

impl StructuredData {
    pub fn new(site: SiteIdentity) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteIdentity {
        &self.site
    }

    /// Publishing organization
    pub fn organization(&self) -> Organization {
        Organization {
            kind: "Organization",
            name: self.site.name.clone(),
            url: self.site.url.clone(),
            logo: ImageObject {
                kind: "ImageObject",
                url: self.site.logo.clone(),
            },
        }
    }

    /// Author record; falls back to the site author
    pub fn person(&self, author: Option<&str>) -> Person {
        Person {
            kind: "Person",
            name: author
                .filter(|name| !name.is_empty())
                .unwrap_or(self.site.author_name.as_str())
                .to_string(),
            url: self.site.url.clone(),
        }
    }

    /// Make an image reference absolute against the site URL
    pub fn normalize_image_url(&self, image: Option<&str>, default: Option<&str>) -> String {
        let Some(image) = image.filter(|i| !i.is_empty()) else {
            return default
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}/images/default-og.jpg", self.site.url));
        };

        if image.starts_with("http") {
            image.to_string()
        } else {
            self.absolute_url(image)
        }
    }

    /// Join a site-relative path to the site URL with exactly one slash
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}/{}", self.site.url, path.trim_start_matches('/'))
    }

    fn page_url(&self, base_path: &str, slug: &str) -> String {
        self.absolute_url(&format!("{}/{}", base_path.trim_end_matches('/'), slug))
    }

    /// BlogPosting for an insight or blog detail page
    pub fn blog_posting(&self, post: &ContentItem, base_path: &str) -> BlogPosting {
        let meta = &post.meta;
        let url = self.page_url(base_path, &meta.slug);

        BlogPosting {
            context: SCHEMA_CONTEXT,
            kind: "BlogPosting",
            headline: meta.title.clone(),
            description: meta.description.clone(),
            image: self.normalize_image_url(meta.image.as_deref(), None),
            date_published: meta.date.clone(),
            date_modified: meta.date.clone(),
            author: self.person(meta.author.as_deref()),
            publisher: self.organization(),
            main_entity_of_page: WebPageRef {
                kind: "WebPage",
                id: url.clone(),
            },
            keywords: meta.tags.join(", "),
            article_section: meta
                .tags
                .first()
                .cloned()
                .unwrap_or_else(|| "General".to_string()),
            word_count: word_count(&post.raw),
            time_required: meta.reading_time.map(|minutes| format!("PT{}M", minutes)),
            in_language: self.site.language.clone(),
            url,
        }
    }

    /// Article for case studies, projects and resources
    pub fn article(&self, content: &ContentItem, base_path: &str) -> Article {
        let meta = &content.meta;
        let url = self.page_url(base_path, &meta.slug);

        Article {
            context: SCHEMA_CONTEXT,
            kind: "Article",
            headline: meta.title.clone(),
            description: meta.description.clone(),
            image: self.normalize_image_url(meta.image.as_deref(), None),
            date_published: meta.date.clone(),
            date_modified: meta.date.clone(),
            author: self.person(meta.author.as_deref()),
            publisher: self.organization(),
            main_entity_of_page: WebPageRef {
                kind: "WebPage",
                id: url.clone(),
            },
            keywords: meta.tags.join(", "),
            word_count: word_count(&content.raw),
            in_language: self.site.language.clone(),
            url,
        }
    }

    /// Blog record for a listing page, with at most `max_posts` entries
    pub fn blog(
        &self,
        posts: &[ContentItem],
        page_url: &str,
        title: &str,
        description: &str,
        max_posts: usize,
    ) -> Blog {
        Blog {
            context: SCHEMA_CONTEXT,
            kind: "Blog",
            name: title.to_string(),
            description: description.to_string(),
            url: page_url.to_string(),
            author: self.person(None),
            publisher: self.organization(),
            blog_post: posts
                .iter()
                .take(max_posts)
                .map(|post| BlogPostSummary {
                    kind: "BlogPosting",
                    headline: post.meta.title.clone(),
                    description: post.meta.description.clone(),
                    image: self.normalize_image_url(post.meta.image.as_deref(), None),
                    date_published: post.meta.date.clone(),
                    author: self.person(post.meta.author.as_deref()),
                    url: self.page_url(post.meta.category.info().path, &post.meta.slug),
                })
                .collect(),
            in_language: self.site.language.clone(),
        }
    }

    /// Breadcrumb trail; relative URLs are made absolute
    pub fn breadcrumb_list(&self, crumbs: &[Crumb]) -> BreadcrumbList {
        BreadcrumbList {
            context: SCHEMA_CONTEXT,
            kind: "BreadcrumbList",
            item_list_element: crumbs
                .iter()
                .enumerate()
                .map(|(index, crumb)| ListItem {
                    kind: "ListItem",
                    position: index + 1,
                    name: crumb.name.clone(),
                    item: if crumb.url.starts_with("http") {
                        crumb.url.clone()
                    } else {
                        self.absolute_url(&crumb.url)
                    },
                })
                .collect(),
        }
    }

    /// WebSite record for the home page, with a search action
    pub fn website(&self) -> WebSite {
        WebSite {
            context: SCHEMA_CONTEXT,
            kind: "WebSite",
            name: self.site.name.clone(),
            url: self.site.url.clone(),
            author: self.person(None),
            publisher: self.organization(),
            in_language: self.site.language.clone(),
            potential_action: SearchAction {
                kind: "SearchAction",
                target: EntryPoint {
                    kind: "EntryPoint",
                    url_template: format!("{}/search?q={{search_term_string}}", self.site.url),
                },
                query_input: "required name=search_term_string",
            },
        }
    }
}

/// Embed a record in a JSON-LD script tag
pub fn to_script_tag<T: Serialize>(record: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(record)?.replace("</", "<\\/");
    Ok(format!(
        r#"<script type="application/ld+json">{}</script>"#,
        json
    ))
}
