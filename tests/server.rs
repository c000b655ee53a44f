//! HTTP routes served from a temporary site

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use folio_rs::server::{create_router, AppState};
use folio_rs::Folio;
use tempfile::TempDir;
use tower::ServiceExt;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn site() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/content/insights/hello-world.md",
        "---\ntitle: Hello World\ndescription: First post\ndate: 2024-06-01\ntags: [rust, web]\nfeatured: true\n---\n# Hello World\n\nWelcome to the site.\n",
    );
    write(
        root,
        "src/content/insights/hidden.md",
        "---\ntitle: Hidden\ndate: 2024-05-01\npublished: false\n---\nSecret.\n",
    );
    write(
        root,
        "src/content/case-studies/rebrand.md",
        "---\ntitle: Rebrand\ndate: 2024-01-01\ntags: [design]\nimage: /images/rebrand.png\n---\nA case study.\n",
    );
    write(root, "static/app.css", "body { margin: 0; }");

    let folio = Folio::new(root).unwrap();
    let state = Arc::new(AppState::new(&folio).unwrap());
    (dir, create_router(state))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_home_page() {
    let (_dir, router) = site();
    let (status, html) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Hello World"));
    assert!(html.contains("Rebrand"));
    assert!(!html.contains("Hidden"));
    assert!(html.contains(r#""@type":"WebSite""#));
}

#[tokio::test]
async fn test_listing_page() {
    let (_dir, router) = site();
    let (status, html) = get(&router, "/insights").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<a href="&#x2F;insights&#x2F;hello-world">Hello World</a>"#));
    assert!(!html.contains("Hidden"));
    assert!(html.contains(r#""@type":"Blog""#));
    assert!(html.contains(r#""@type":"BreadcrumbList""#));

    let (status, _) = get(&router, "/insights?page=9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_pages() {
    let (_dir, router) = site();

    let (status, html) = get(&router, "/insights/hello-world").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<p>Welcome to the site.</p>"));
    assert!(html.contains(r#""@type":"BlogPosting""#));

    let (status, html) = get(&router, "/work/rebrand").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#""@type":"Article""#));
    assert!(html.contains("https://khoobkar.com/images/rebrand.png"));
}

#[tokio::test]
async fn test_missing_detail_pages() {
    let (_dir, router) = site();

    let (status, html) = get(&router, "/insights/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Post not found"));

    let (status, html) = get(&router, "/insights/hidden").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Post not found"));

    let (status, html) = get(&router, "/work/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Case study not found"));

    let (status, html) = get(&router, "/resources/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Resource not found"));

    let (status, html) = get(&router, "/projects/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Project not found"));
}

#[tokio::test]
async fn test_missing_page_escapes_requested_path() {
    let (_dir, router) = site();
    let (status, html) = get(
        &router,
        "/insights/%22%3E%3Cscript%3Ealert(1)%3C%2Fscript%3E",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Post not found"));
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(!html.contains(r#""><script"#));
    assert!(html.contains("&quot;&gt;&lt;script&gt;alert(1)&lt;&#x2F;script&gt;"));
}

#[tokio::test]
async fn test_search_page() {
    let (_dir, router) = site();
    let (status, html) = get(&router, "/search?q=welcome").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("1 result for"));
    assert!(html.contains("Hello World"));
}

#[tokio::test]
async fn test_api() {
    let (_dir, router) = site();

    let (status, body) = get(&router, "/api/contents").await;
    assert_eq!(status, StatusCode::OK);
    let items: serde_json::Value = serde_json::from_str(&body).unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["meta"]["slug"], "hello-world");
    assert_eq!(items[0]["meta"]["readingTime"], 1);

    let (status, body) = get(&router, "/api/contents/case-studies?page=1&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    let collection: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(collection["total"], 1);
    assert_eq!(collection["categories"][0], "work");
    assert_eq!(collection["tags"][0], "design");

    let (status, _) = get(&router, "/api/contents/podcasts").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_fallback() {
    let (_dir, router) = site();

    let (status, body) = get(&router, "/app.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "body { margin: 0; }");

    let (status, html) = get(&router, "/no/such/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Page not found"));
}
