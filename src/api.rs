//! HTTP surface for the readability cache.
//!
//! - `GET /` and `GET /recent?limit=n` – Most recently extracted URLs, newest first.
//! - `GET /popular?limit=n` – Most viewed URLs with their view counts.
//! - `GET /read/{url}` – Article for `url`, with `/` escaped as `%2F` inside the segment.
//!   Always answers 200; failures are reported in the record's `errorMessage`.
//! - `POST /read` – Form field `url`; redirects (303) to the matching `/read/...` path.
//! - `GET /metrics` – Retrieval counters.
//!
//! Listings answer 500 when the cache store is unavailable.

use crate::config;
use crate::metrics::MetricsSnapshot;
use crate::reader::{ReaderApi, ReaderError};
use crate::store::RankedArticle;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const READ_PREFIX: &str = "/read/";
const MAX_LIST_LIMIT: usize = 100;

/// Build the HTTP router exposing the reader API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: ReaderApi + 'static,
{
    Router::new()
        .route("/", get(list_recent::<S>))
        .route("/recent", get(list_recent::<S>))
        .route("/popular", get(list_popular::<S>))
        .route("/read", post(read_redirect))
        .route("/read/*url", get(read_article::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .with_state(service)
}

/// Escape `/` so a URL fits in a single routed path segment.
fn escape(url: &str) -> String {
    url.replace('/', "%2F")
}

/// Reverse [`escape`]. Other percent-escapes are left untouched so the key stays canonical.
fn unescape(segment: &str) -> String {
    segment.replace("%2F", "/").replace("%2f", "/")
}

/// Recover the article URL from the raw request URI, re-attaching any query string.
fn target_url(uri: &Uri) -> Option<String> {
    let escaped = uri.path().strip_prefix(READ_PREFIX)?;
    if escaped.is_empty() {
        return None;
    }
    let mut url = unescape(escaped);
    if let Some(query) = uri.query() {
        url.push('?');
        url.push_str(query);
    }
    Some(url)
}

/// Fetch an article, serving it from the cache when possible.
async fn read_article<S>(State(service): State<Arc<S>>, uri: Uri) -> Response
where
    S: ReaderApi,
{
    let Some(url) = target_url(&uri) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let record = service.retrieve(&url).await;
    tracing::info!(
        url = %record.url,
        degraded = record.is_degraded(),
        "Read request completed"
    );
    Json(record).into_response()
}

/// Form body for `POST /read`.
#[derive(Deserialize)]
struct ReadForm {
    url: String,
}

/// Redirect a submitted URL to its routed `/read/...` path.
async fn read_redirect(Form(form): Form<ReadForm>) -> Response {
    let url = form.url.trim();
    if url.is_empty() {
        return (StatusCode::BAD_REQUEST, "missing url").into_response();
    }
    let location = format!("{READ_PREFIX}{}", escape(url));
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            "url contains characters that cannot be routed",
        )
            .into_response(),
    }
}

/// Query string accepted by the listing endpoints.
#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    limit: Option<usize>,
}

impl ListParams {
    fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or_else(config::recent_limit)
            .clamp(1, MAX_LIST_LIMIT)
    }
}

/// Response body for the recent listing.
#[derive(Serialize)]
struct RecentResponse {
    recents: Vec<String>,
}

async fn list_recent<S>(
    State(service): State<Arc<S>>,
    Query(params): Query<ListParams>,
) -> Result<Json<RecentResponse>, AppError>
where
    S: ReaderApi,
{
    let recents = service.list_recent(params.effective_limit()).await?;
    Ok(Json(RecentResponse { recents }))
}

/// Response body for the popular listing.
#[derive(Serialize)]
struct PopularResponse {
    articles: Vec<RankedArticle>,
}

async fn list_popular<S>(
    State(service): State<Arc<S>>,
    Query(params): Query<ListParams>,
) -> Result<Json<PopularResponse>, AppError>
where
    S: ReaderApi,
{
    let articles = service.top_viewed(params.effective_limit()).await?;
    Ok(Json(PopularResponse { articles }))
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: ReaderApi,
{
    Json(service.metrics_snapshot())
}

struct AppError(ReaderError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

impl From<ReaderError> for AppError {
    fn from(inner: ReaderError) -> Self {
        Self(inner)
    }
}
