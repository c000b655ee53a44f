//! Search published content from the command line

use anyhow::Result;

use crate::Folio;

pub fn run(folio: &Folio, query: &str) -> Result<()> {
    let results = folio.open_query()?.search_content(query)?;

    println!("{} result(s) for {:?}:", results.len(), query);
    for item in results {
        println!(
            "  [{}] {} - {}/{}",
            item.meta.category,
            item.meta.title,
            item.meta.category.info().path,
            item.meta.slug
        );
    }

    Ok(())
}
