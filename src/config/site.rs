//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::helpers::is_valid_date_format;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site identity
    pub title: String,
    pub description: String,
    pub url: String,
    pub logo: String,
    pub author: String,
    pub language: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Content
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Extra directory name -> category aliases
    #[serde(default)]
    pub category_map: HashMap<String, String>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Khoobkar".to_string(),
            description: "Design and engineering studio".to_string(),
            url: "https://khoobkar.com".to_string(),
            logo: "https://khoobkar.com/lib/assets/logo.png".to_string(),
            author: "Hessam Khoobkar".to_string(),
            language: "en-US".to_string(),

            content_dir: "src/content".to_string(),
            public_dir: "static".to_string(),

            content: ContentConfig::default(),
            highlight: HighlightConfig::default(),

            category_map: HashMap::new(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail at render time
    pub fn validate(&self) -> Result<()> {
        if !is_valid_date_format(&self.content.date_format) {
            anyhow::bail!(
                "Invalid content.date_format {:?}: not a chrono format string",
                self.content.date_format
            );
        }
        Ok(())
    }
}

/// How the content store holds the document set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// Read every document once when the store opens
    #[default]
    Startup,
    /// Walk the content directory again on every query
    PerCall,
}

/// Listing and excerpt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub posts_per_page: usize,
    pub excerpt_length: usize,
    /// chrono format string used by templates
    pub date_format: String,
    pub default_author: String,
    pub featured_posts_limit: usize,
    pub related_posts_limit: usize,
    pub cache: CacheMode,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            excerpt_length: 160,
            date_format: "%B %d, %Y".to_string(),
            default_author: "Khoobkar Team".to_string(),
            featured_posts_limit: 3,
            related_posts_limit: 4,
            cache: CacheMode::Startup,
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Khoobkar");
        assert_eq!(config.content.posts_per_page, 10);
        assert_eq!(config.content.featured_posts_limit, 3);
        assert_eq!(config.content.related_posts_limit, 4);
        assert_eq!(config.content.cache, CacheMode::Startup);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Studio
url: https://studio.example
content_dir: content
content:
  posts_per_page: 5
  cache: per-call
category_map:
  articles: insight
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Studio");
        assert_eq!(config.url, "https://studio.example");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.content.posts_per_page, 5);
        assert_eq!(config.content.excerpt_length, 160);
        assert_eq!(config.content.cache, CacheMode::PerCall);
        assert_eq!(config.category_map.get("articles").unwrap(), "insight");
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
    }

    #[test]
    fn test_load_rejects_bad_date_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "content:\n  date_format: \"%Q\"\n").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("date_format"));

        fs::write(&path, "content:\n  date_format: \"%d/%m/%Y\"\n").unwrap();
        assert!(SiteConfig::load(&path).is_ok());
    }
}
