//! Content store and query layer over real directory trees

use std::fs;
use std::path::Path;

use folio_rs::config::{CacheMode, SiteConfig};
use folio_rs::content::{Category, ContentStore};
use folio_rs::query::ContentQuery;
use folio_rs::Folio;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn doc(title: &str, date: &str, extra: &str) -> String {
    format!("---\ntitle: {}\ndate: {}\n{}---\n# {}\n\nSome body text.\n", title, date, extra, title)
}

fn open(dir: &TempDir, mode: CacheMode) -> ContentQuery {
    let mut config = SiteConfig::default();
    config.content_dir = "content".to_string();
    config.content.cache = mode;
    Folio::with_config(dir.path().to_path_buf(), config)
        .open_query()
        .unwrap()
}

#[test]
fn test_newest_first() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    write(&content, "insights/older.md", &doc("Older", "2024-01-01", ""));
    write(&content, "insights/newer.md", &doc("Newer", "2024-06-01", ""));

    let query = open(&dir, CacheMode::Startup);
    let items = query.store().load_content(Category::Insight).unwrap();
    let titles: Vec<_> = items.iter().map(|i| i.meta.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
}

#[test]
fn test_missing_front_matter_is_excluded() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    write(&content, "insights/notes.md", "# Just notes\n\nNo header here.\n");
    write(&content, "insights/untitled.md", "---\ndate: 2024-01-01\n---\nbody\n");
    write(&content, "insights/real.md", &doc("Real", "2024-01-01", ""));

    let query = open(&dir, CacheMode::Startup);
    let store = query.store();
    let items = store.load_content(Category::Insight).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].meta.slug, "real");
    assert!(store
        .load_content_item(Category::Insight, "notes")
        .unwrap()
        .is_none());
    assert!(store
        .load_content_item(Category::Insight, "untitled")
        .unwrap()
        .is_none());
}

#[test]
fn test_alias_directories() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    write(&content, "case-studies/a.md", &doc("A", "2024-01-01", ""));
    write(&content, "work/b.md", &doc("B", "2024-01-02", ""));
    write(&content, "insight/c.md", &doc("C", "2024-01-03", ""));
    write(&content, "insights/d.md", &doc("D", "2024-01-04", ""));
    write(&content, "projects/e.md", &doc("E", "2024-01-05", ""));
    write(&content, "resources/f.md", &doc("F", "2024-01-06", ""));
    write(&content, "blog/g.md", &doc("G", "2024-01-07", ""));
    write(&content, "drafts/h.md", &doc("H", "2024-01-08", ""));

    let query = open(&dir, CacheMode::Startup);
    let store = query.store();
    let slugs = |category| -> Vec<String> {
        store
            .load_content(category)
            .unwrap()
            .into_iter()
            .map(|i| i.meta.slug)
            .collect()
    };
    assert_eq!(slugs(Category::Work), vec!["b", "a"]);
    assert_eq!(slugs(Category::Insight), vec!["d", "c"]);
    assert_eq!(slugs(Category::Projects), vec!["e"]);
    assert_eq!(slugs(Category::Resources), vec!["f"]);
    assert_eq!(slugs(Category::Blog), vec!["g"]);
    assert_eq!(store.documents().unwrap().len(), 7);
}

#[test]
fn test_category_map_from_config() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "_config.yml",
        "content_dir: content\ncategory_map:\n  articles: insight\n",
    );
    write(&dir.path().join("content"), "articles/x.md", &doc("X", "2024-01-01", ""));

    let folio = Folio::new(dir.path()).unwrap();
    let query = folio.open_query().unwrap();
    let items = query.store().load_content(Category::Insight).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].path.as_deref(), Some("articles/x.md"));
}

#[test]
fn test_published_views() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    write(&content, "work/a.md", &doc("A", "2024-03-01", "featured: true\ntags: [rust]\n"));
    write(&content, "projects/b.md", &doc("B", "2024-02-01", "tags: [rust, web]\n"));
    write(&content, "insights/c.md", &doc("C", "2024-04-01", "published: false\n"));
    write(&content, "insights/d.md", &doc("D", "2024-01-01", "featured: true\n"));
    write(&content, "resources/e.md", &doc("E", "2024-05-01", "featured: true\n"));

    let query = open(&dir, CacheMode::Startup);

    let all: Vec<_> = query
        .get_all_published_content()
        .unwrap()
        .into_iter()
        .map(|i| i.meta.slug)
        .collect();
    assert_eq!(all, vec!["a", "b", "d"]);

    let featured: Vec<_> = query
        .get_featured_content()
        .unwrap()
        .into_iter()
        .map(|i| i.meta.slug)
        .collect();
    assert_eq!(featured, vec!["a", "d"]);

    let item = query
        .store()
        .load_content_item(Category::Work, "a")
        .unwrap()
        .unwrap();
    let related = query.get_related_content(&item, 4).unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].meta.slug, "b");

    let found = query.search_content("RUST").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(query.search_content("body text").unwrap().len(), 3);
    assert!(query.search_content("nothing like this").unwrap().is_empty());
}

#[test]
fn test_featured_content_is_truncated_to_limit() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    for day in 1..=5 {
        write(
            &content,
            &format!("work/featured-{}.md", day),
            &doc(&format!("Featured {}", day), &format!("2024-02-0{}", day), "featured: true\n"),
        );
    }
    write(&content, "insights/plain.md", &doc("Plain", "2024-03-01", ""));

    let query = open(&dir, CacheMode::Startup);
    let featured: Vec<_> = query
        .get_featured_content()
        .unwrap()
        .into_iter()
        .map(|i| i.meta.slug)
        .collect();
    assert_eq!(featured, vec!["featured-5", "featured-4", "featured-3"]);

    let mut config = SiteConfig::default();
    config.content_dir = "content".to_string();
    config.content.featured_posts_limit = 1;
    let query = Folio::with_config(dir.path().to_path_buf(), config)
        .open_query()
        .unwrap();
    let featured = query.get_featured_content().unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].meta.slug, "featured-5");
}

#[test]
fn test_pages_concatenate_to_full_set() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    for day in 1..=5 {
        write(
            &content,
            &format!("insights/post-{}.md", day),
            &doc(&format!("Post {}", day), &format!("2024-01-0{}", day), ""),
        );
    }

    let query = open(&dir, CacheMode::Startup);
    let full = query
        .get_content_by_category(Category::Insight, 1, 100)
        .unwrap();
    assert_eq!(full.total, 5);

    let mut pages = Vec::new();
    for page in 1..=3 {
        let collection = query
            .get_content_by_category(Category::Insight, page, 2)
            .unwrap();
        assert_eq!(collection.total, 5);
        assert_eq!(collection.total_pages(2), 3);
        pages.extend(collection.items);
    }
    assert_eq!(pages, full.items);

    let beyond = query
        .get_content_by_category(Category::Insight, 4, 2)
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);
}

#[test]
fn test_startup_cache_needs_reload() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    write(&content, "insights/first.md", &doc("First", "2024-01-01", ""));

    let query = open(&dir, CacheMode::Startup);
    write(&content, "insights/second.md", &doc("Second", "2024-02-01", ""));
    assert_eq!(query.store().load_content(Category::Insight).unwrap().len(), 1);

    assert_eq!(query.store().reload().unwrap(), 2);
    assert_eq!(query.store().load_content(Category::Insight).unwrap().len(), 2);
}

#[test]
fn test_per_call_reads_fresh_content() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    write(&content, "insights/first.md", &doc("First", "2024-01-01", ""));

    let query = open(&dir, CacheMode::PerCall);
    assert_eq!(query.store().load_content(Category::Insight).unwrap().len(), 1);

    write(&content, "insights/second.md", &doc("Second", "2024-02-01", ""));
    let items = query.store().load_content(Category::Insight).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].meta.title, "Second");
}

#[test]
fn test_missing_content_dir_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = ContentStore::open(&SiteConfig::default(), dir.path().join("nope")).unwrap();
    assert!(store.documents().unwrap().is_empty());
}

#[test]
fn test_rendered_body() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("content");
    write(
        &content,
        "insights/code.md",
        "---\ntitle: Code\ndate: 2024-01-01\n---\n# Code\n\nLoad < 5 seconds.\n\n```rust\nfn main() {}\n```\n",
    );

    let query = open(&dir, CacheMode::Startup);
    let item = query
        .store()
        .load_content_item(Category::Insight, "code")
        .unwrap()
        .unwrap();
    let html = item.content.unwrap();
    assert!(!html.contains("<h1>"));
    assert!(html.contains("&lt; 5"));
    assert!(html.contains(r#"<figure class="highlight language-rust">"#));
    assert_eq!(item.meta.reading_time, Some(1));
}
