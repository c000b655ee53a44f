//! Create a new content document

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::Category;
use crate::Folio;

/// Write a front-matter skeleton to `<content_dir>/<category dir>/<slug>.md`
pub fn create_item(
    folio: &Folio,
    title: &str,
    category: Category,
    tags: &[String],
) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable file name", title);
    }

    let target_dir = folio.content_dir.join(category.directory());
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    fs::write(&file_path, skeleton(title, &date, &folio.config.content.default_author, tags))?;

    tracing::info!("Created {} document {:?}", category, file_path);
    Ok(file_path)
}

fn skeleton(title: &str, date: &str, author: &str, tags: &[String]) -> String {
    format!(
        r#"---
title: {title}
description: ""
date: {date}
author: {author}
tags: [{tags}]
featured: false
published: true
---

# {title}
"#,
        tags = tags.join(", ")
    )
}

/// Run the new command
pub fn run(folio: &Folio, title: &str, category: &str, tags: Option<&str>) -> Result<()> {
    let category: Category = category.parse()?;
    let tags: Vec<String> = tags
        .map(|list| {
            list.split(',')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let path = create_item(folio, title, category, &tags)?;
    println!("Created: {:?}", path);
    Ok(())
}
