//! Site navigation tables

use serde::Serialize;

/// A link in one of the site's navigation bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub href: &'static str,
    pub label: &'static str,
    pub external: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl NavigationItem {
    const fn internal(href: &'static str, label: &'static str) -> Self {
        Self {
            href,
            label,
            external: false,
            description: None,
        }
    }

    const fn described(href: &'static str, label: &'static str, description: &'static str) -> Self {
        Self {
            href,
            label,
            external: false,
            description: Some(description),
        }
    }

    const fn external(href: &'static str, label: &'static str) -> Self {
        Self {
            href,
            label,
            external: true,
            description: None,
        }
    }

    /// Whether this entry should be highlighted for `path`
    pub fn is_active(&self, path: &str) -> bool {
        if self.external {
            return false;
        }
        if self.href == "/" {
            return path == "/";
        }
        path == self.href
            || path
                .strip_prefix(self.href)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

pub const MAIN_NAVIGATION: &[NavigationItem] = &[
    NavigationItem::described("/", "Overview", "Home page overview"),
    NavigationItem::described("/work", "Work", "Portfolio and projects"),
    NavigationItem::described("/insights", "Insights", "Blog posts and articles"),
    NavigationItem::described("/resources", "Resources", "Useful resources and tools"),
    NavigationItem::described("/about", "About", "About me and my story"),
    NavigationItem::described("/contact", "Contact", "Contact me and get in touch"),
];

pub const FOOTER_NAVIGATION: &[NavigationItem] = &[
    NavigationItem::internal("/privacy", "Privacy Policy"),
    NavigationItem::internal("/terms", "Terms of Service"),
    NavigationItem::internal("/contact", "Contact"),
];

pub const SOCIAL_LINKS: &[NavigationItem] = &[
    NavigationItem::external("https://twitter.com/khoobkar", "Twitter"),
    NavigationItem::external("https://linkedin.com/company/khoobkar", "LinkedIn"),
    NavigationItem::external("https://github.com/khoobkar", "GitHub"),
];
