//! folio-rs: markdown content engine for a portfolio site
//!
//! Content lives in category directories of markdown files with a
//! front-matter header. This crate loads, queries and renders that content,
//! generates schema.org JSON-LD for it and serves the result over HTTP.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod navigation;
pub mod query;
pub mod seo;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main application: configuration and resolved directories
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content (markdown) directory
    pub content_dir: PathBuf,
    /// Static files directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Open the content store and wrap it in a query layer
    pub fn open_query(&self) -> Result<query::ContentQuery> {
        let store = content::ContentStore::open(&self.config, &self.content_dir)?;
        Ok(query::ContentQuery::new(store, &self.config.content))
    }
}
