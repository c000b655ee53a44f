//! List site content

use anyhow::Result;

use crate::content::{Category, ContentItem};
use crate::Folio;

/// List content by category, `all` published content, or `tags`
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let query = folio.open_query()?;

    match content_type {
        "all" => {
            let items = query.get_all_published_content()?;
            println!("Published ({}):", items.len());
            print_items(&items);
        }
        "tag" | "tags" => {
            let tags = query.tag_counts()?;
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        other => {
            let category: Category = other.parse().map_err(|_| {
                anyhow::anyhow!(
                    "Unknown type: {}. Available: work, projects, insight, resources, blog, all, tags",
                    other
                )
            })?;
            let items = query.store().load_content(category)?;
            println!("{} ({}):", category.info().title, items.len());
            print_items(&items);
        }
    }

    Ok(())
}

fn print_items(items: &[ContentItem]) {
    for item in items {
        println!("  {}", format_line(item));
    }
}

/// `date - title [path]`, with unpublished items marked
fn format_line(item: &ContentItem) -> String {
    let date = item
        .meta
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let draft = if item.meta.is_published() { "" } else { " (draft)" };
    format!(
        "{} - {}{} [{}]",
        date,
        item.meta.title,
        draft,
        item.path.as_deref().unwrap_or("")
    )
}
