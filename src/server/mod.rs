//! HTTP server - rendered pages, the JSON API and static files

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tera::Context;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{CacheMode, SiteConfig};
use crate::content::{Category, ContentItem};
use crate::query::{paginate, published, tag_counts, ContentQuery};
use crate::seo::{to_script_tag, Crumb, SiteIdentity, StructuredData};
use crate::templates::{
    item_url, CategoryData, ChromeData, ItemData, PaginationData, TemplateRenderer,
};
use crate::Folio;

/// Shared state behind every handler
pub struct AppState {
    pub query: ContentQuery,
    pub renderer: TemplateRenderer,
    pub seo: StructuredData,
    pub config: SiteConfig,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(folio: &Folio) -> Result<Self> {
        Ok(Self {
            query: folio.open_query()?,
            renderer: TemplateRenderer::new()?,
            seo: StructuredData::new(SiteIdentity::from(&folio.config)),
            config: folio.config.clone(),
            public_dir: folio.public_dir.clone(),
        })
    }

    fn render_page(&self, template: &str, path: &str, mut context: Context) -> Result<String> {
        context.insert("chrome", &ChromeData::new(&self.config, path));
        if !context.contains_key("json_ld") {
            context.insert("json_ld", &Vec::<String>::new());
        }
        self.renderer.render(template, &context)
    }

    /// 404 page; falls back to plain text if the template fails
    fn not_found(&self, path: &str, message: &str) -> Response {
        let mut context = Context::new();
        context.insert("message", message);
        match self.render_page("not_found.html", path, context) {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render 404 page: {:#}", e);
                (StatusCode::NOT_FOUND, message.to_string()).into_response()
            }
        }
    }
}

/// Handler error, rendered as a 500
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

type HandlerResult = std::result::Result<Response, AppError>;

/// Run a query against the store. Per-call stores read the disk, so the
/// work is moved off the async runtime.
async fn with_query<T, F>(state: &Arc<AppState>, f: F) -> std::result::Result<T, AppError>
where
    F: FnOnce(&ContentQuery) -> crate::content::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match state.query.store().cache_mode() {
        CacheMode::Startup => Ok(f(&state.query)?),
        CacheMode::PerCall => {
            let state = Arc::clone(state);
            Ok(tokio::task::spawn_blocking(move || f(&state.query)).await??)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<usize>,
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Message shown when a detail page has no document
fn missing_message(category: Category) -> &'static str {
    match category {
        Category::Insight | Category::Blog => "Post not found",
        Category::Work => "Case study not found",
        Category::Resources => "Resource not found",
        Category::Projects => "Project not found",
    }
}

/// Create the site router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(home_handler))
        .route("/search", get(search_handler))
        .route("/api/contents", get(api_all_handler))
        .route("/api/contents/:category", get(api_category_handler));

    for category in Category::ALL {
        let base = category.info().path;
        router = router
            .route(
                base,
                get(
                    move |state: State<Arc<AppState>>, params: Query<PageParams>| {
                        listing_handler(state, category, params)
                    },
                ),
            )
            .route(
                &format!("{}/:slug", base),
                get(move |state: State<Arc<AppState>>, slug: Path<String>| {
                    detail_handler(state, category, slug)
                }),
            );
    }

    router
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    let latest_count = state.query.per_page();
    let (featured, latest) = with_query(&state, move |query| {
        let featured = query.get_featured_content()?;
        let mut latest = query.get_all_published_content()?;
        latest.truncate(latest_count);
        Ok((featured, latest))
    })
    .await?;

    let content = &state.config.content;
    let mut context = Context::new();
    context.insert("featured", &ItemData::from_items(&featured, content));
    context.insert("latest", &ItemData::from_items(&latest, content));
    context.insert(
        "json_ld",
        &vec![
            to_script_tag(&state.seo.website())?,
            to_script_tag(&state.seo.organization())?,
        ],
    );

    Ok(Html(state.render_page("home.html", "/", context)?).into_response())
}

async fn listing_handler(
    State(state): State<Arc<AppState>>,
    category: Category,
    Query(params): Query<PageParams>,
) -> HandlerResult {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or_else(|| state.query.per_page());
    let info = category.info();

    let (collection, tags) = with_query(&state, move |query| {
        let items = published(query.store().load_content(category)?);
        let tags: Vec<String> = tag_counts(&items)
            .into_iter()
            .map(|(tag, _)| tag)
            .collect();
        Ok((paginate(items, page, limit), tags))
    })
    .await?;

    if page > 1 && collection.items.is_empty() {
        return Ok(state.not_found(info.path, "Page not found"));
    }

    let page_url = if page > 1 {
        state
            .seo
            .absolute_url(&format!("{}?page={}", info.path, page))
    } else {
        state.seo.absolute_url(info.path)
    };
    let blog = state.seo.blog(
        &collection.items,
        &page_url,
        info.title,
        info.description,
        limit,
    );
    let breadcrumbs = state.seo.breadcrumb_list(&[
        Crumb::new("Home", "/"),
        Crumb::new(info.title, info.path),
    ]);

    let content = &state.config.content;
    let mut context = Context::new();
    context.insert("category", &CategoryData::from(category));
    context.insert("tags", &tags);
    context.insert("items", &ItemData::from_items(&collection.items, content));
    context.insert(
        "pagination",
        &PaginationData::new(info.path, page, collection.total, limit),
    );
    context.insert(
        "json_ld",
        &vec![to_script_tag(&blog)?, to_script_tag(&breadcrumbs)?],
    );

    Ok(Html(state.render_page("listing.html", info.path, context)?).into_response())
}

async fn detail_handler(
    State(state): State<Arc<AppState>>,
    category: Category,
    Path(slug): Path<String>,
) -> HandlerResult {
    let info = category.info();
    let path = format!("{}/{}", info.path, slug);
    let related_limit = state.query.related_limit();

    let found = with_query(&state, move |query| {
        // Drafts (`published: false`) are not served, even by direct URL
        let item = match query.store().load_content_item(category, &slug)? {
            Some(item) if item.meta.is_published() => item,
            _ => return Ok(None),
        };
        let related = query.get_related_content(&item, related_limit)?;
        Ok(Some((item, related)))
    })
    .await?;

    let Some((item, related)) = found else {
        tracing::debug!("No {} document for {}", category, path);
        return Ok(state.not_found(&path, missing_message(category)));
    };

    let record = match category {
        Category::Insight | Category::Blog => {
            to_script_tag(&state.seo.blog_posting(&item, info.path))?
        }
        _ => to_script_tag(&state.seo.article(&item, info.path))?,
    };
    let breadcrumbs = state.seo.breadcrumb_list(&[
        Crumb::new("Home", "/"),
        Crumb::new(info.title, info.path),
        Crumb::new(item.meta.title.clone(), item_url(&item)),
    ]);

    let content = &state.config.content;
    let mut context = Context::new();
    context.insert("item", &ItemData::from_item(&item, content));
    context.insert("category", &CategoryData::from(category));
    context.insert("body", item.content.as_deref().unwrap_or_default());
    context.insert("related", &ItemData::from_items(&related, content));
    context.insert("json_ld", &vec![record, to_script_tag(&breadcrumbs)?]);

    Ok(Html(state.render_page("detail.html", &path, context)?).into_response())
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> HandlerResult {
    let term = params.q.unwrap_or_default().trim().to_string();

    let results = if term.is_empty() {
        Vec::new()
    } else {
        let needle = term.clone();
        with_query(&state, move |query| query.search_content(&needle)).await?
    };
    tracing::debug!("Search {:?}: {} results", term, results.len());

    let mut context = Context::new();
    context.insert("query", &term);
    context.insert(
        "results",
        &ItemData::from_items(&results, &state.config.content),
    );

    Ok(Html(state.render_page("search.html", "/search", context)?).into_response())
}

async fn api_all_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    let items: Vec<ContentItem> =
        with_query(&state, |query| query.get_all_published_content()).await?;
    Ok(Json(items).into_response())
}

async fn api_category_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<PageParams>,
) -> HandlerResult {
    let category: Category = match name.parse() {
        Ok(category) => category,
        Err(e) => {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response())
        }
    };
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or_else(|| state.query.per_page());

    let collection = with_query(&state, move |query| {
        query.get_content_by_category(category, page, limit)
    })
    .await?;

    Ok(Json(collection).into_response())
}

/// Serve static files from the public directory, 404 page otherwise
async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();

    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => state.not_found(&path, "Page not found"),
        Err(e) => {
            tracing::error!("Failed to serve {}: {}", path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    let state = Arc::new(AppState::new(folio)?);
    let app = create_router(Arc::clone(&state));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);

    if watch {
        match state.query.store().cache_mode() {
            CacheMode::Startup => {
                println!("Watching {:?} for changes...", folio.content_dir);
                let content_dir = folio.content_dir.clone();
                let state = Arc::clone(&state);
                tokio::task::spawn_blocking(move || {
                    if let Err(e) = watch_and_reload(content_dir, state) {
                        tracing::error!("File watcher error: {}", e);
                    }
                });
            }
            CacheMode::PerCall => {
                tracing::info!("Per-call cache mode reads content on every request; not watching")
            }
        }
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the content directory and refresh the store snapshot on change
fn watch_and_reload(content_dir: PathBuf, state: Arc<AppState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", content_dir);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git")
                        && !path_str.contains(".DS_Store")
                        && !path_str.ends_with('~')
                });
                if !changed {
                    continue;
                }

                for event in &events {
                    tracing::info!("File changed: {}", event.path.display());
                }
                match state.query.store().reload() {
                    Ok(count) => println!("Reloaded {} documents", count),
                    Err(e) => tracing::error!("Reload failed: {}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}
