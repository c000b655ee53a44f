//! Content categories and the directory alias table

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Canonical content category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Projects,
    Insight,
    Resources,
    Blog,
}

/// Directory name -> canonical category.
///
/// Every content directory is resolved through this table; a directory that
/// is not listed here (or in `category_map`) belongs to no category.
pub const CATEGORY_ALIASES: &[(&str, Category)] = &[
    ("case-studies", Category::Work),
    ("work", Category::Work),
    ("insights", Category::Insight),
    ("insight", Category::Insight),
    ("projects", Category::Projects),
    ("resources", Category::Resources),
    ("blog", Category::Blog),
];

/// Categories unioned by the "all published content" views
pub const PUBLISHED_CATEGORIES: &[Category] =
    &[Category::Work, Category::Projects, Category::Insight];

/// Display information for a category listing
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CategoryInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Projects,
        Category::Insight,
        Category::Resources,
        Category::Blog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Projects => "projects",
            Category::Insight => "insight",
            Category::Resources => "resources",
            Category::Blog => "blog",
        }
    }

    /// Directory new documents of this category are written to
    pub fn directory(&self) -> &'static str {
        match self {
            Category::Work => "case-studies",
            Category::Insight => "insights",
            other => other.as_str(),
        }
    }

    pub fn info(&self) -> CategoryInfo {
        match self {
            Category::Work => CategoryInfo {
                title: "Work",
                description: "Our portfolio and project showcases",
                path: "/work",
                icon: "💼",
            },
            Category::Projects => CategoryInfo {
                title: "Projects",
                description: "Side projects, experiments and open source",
                path: "/projects",
                icon: "🧪",
            },
            Category::Insight => CategoryInfo {
                title: "Insights",
                description: "Insights, thoughts, and updates from our team",
                path: "/insights",
                icon: "📝",
            },
            Category::Resources => CategoryInfo {
                title: "Resources",
                description: "Useful tools, guides, and resources for developers",
                path: "/resources",
                icon: "🛠️",
            },
            Category::Blog => CategoryInfo {
                title: "Blog Posts",
                description: "Notes and updates from the studio",
                path: "/blog",
                icon: "📰",
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts canonical names and directory aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve_alias(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Look a directory name up in the built-in alias table
pub fn resolve_alias(dir: &str) -> Option<Category> {
    CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == dir)
        .map(|(_, category)| *category)
}

/// Alias table extended with the site's `category_map`
#[derive(Debug, Clone, Default)]
pub struct CategoryResolver {
    extra: HashMap<String, Category>,
}

impl CategoryResolver {
    /// Build from `category_map`; entries naming an unknown category are dropped
    pub fn new(category_map: &HashMap<String, String>) -> Self {
        let mut extra = HashMap::new();
        for (dir, target) in category_map {
            match target.parse::<Category>() {
                Ok(category) => {
                    extra.insert(dir.clone(), category);
                }
                Err(e) => tracing::warn!("Ignoring category_map entry {:?}: {}", dir, e),
            }
        }
        Self { extra }
    }

    pub fn resolve(&self, dir: &str) -> Option<Category> {
        resolve_alias(dir).or_else(|| self.extra.get(dir).copied())
    }
}
