//! Content module - front-matter, categories, the content store and rendering

mod category;
mod error;
mod frontmatter;
mod item;
mod markdown;
mod store;

pub use category::{
    resolve_alias, Category, CategoryInfo, CategoryResolver, UnknownCategory, CATEGORY_ALIASES,
    PUBLISHED_CATEGORIES,
};
pub use error::{ContentError, Result};
pub use frontmatter::{parse_date_string, parse_inline_list, split_front_matter, tokenize, FrontMatter};
pub use item::{newest_first, sort_by_date, ContentCollection, ContentItem, ContentMeta};
pub use markdown::{escape_digit_comparisons, html_escape, strip_first_heading, MarkdownRenderer};
pub use store::{parse_document, ContentStore};
