use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use httpmock::{Method::GET, MockServer};
use readability_cache::{
    api,
    extractor::HttpExtractor,
    reader::ReaderService,
    store::{ArticleStore, MemoryStore},
};
use tower::ServiceExt;

const ARTICLE_PAGE: &str = r#"<html>
<head><title>Example</title></head>
<body>
  <nav>Home | About</nav>
  <article><p>Hi</p></article>
</body>
</html>"#;

fn reader(store: &Arc<MemoryStore>) -> ReaderService {
    let extractor = HttpExtractor::new().expect("http extractor");
    ReaderService::new(store.clone(), Arc::new(extractor))
}

fn escape(url: &str) -> String {
    url.replace('/', "%2F")
}

#[tokio::test]
async fn first_read_extracts_and_second_read_hits_cache() {
    let server = MockServer::start_async().await;
    let page = server
        .mock_async(|when, then| {
            when.method(GET).path("/a");
            then.status(200)
                .header("content-type", "text/html")
                .body(ARTICLE_PAGE);
        })
        .await;

    let store = Arc::new(MemoryStore::new());
    let reader = reader(&store);
    let url = server.url("/a");

    let first = reader.retrieve(&url).await;
    assert_eq!(first.url, url);
    assert_eq!(first.title, "Example");
    assert_eq!(first.content, "<p>Hi</p>");
    assert_eq!(first.error_message, "");
    assert_eq!(store.recent(1).await.expect("recent"), vec![url.clone()]);

    let second = reader.retrieve(&url).await;
    assert_eq!(second, first);
    page.assert_hits_async(1).await;
    assert_eq!(store.views(&url).await, Some(1));
    assert_eq!(store.recent(10).await.expect("recent").len(), 1);
}

#[tokio::test]
async fn upstream_failure_is_not_cached() {
    let server = MockServer::start_async().await;
    let page = server
        .mock_async(|when, then| {
            when.method(GET).path("/broken");
            then.status(502);
        })
        .await;

    let store = Arc::new(MemoryStore::new());
    let reader = reader(&store);
    let url = server.url("/broken");

    for _ in 0..2 {
        let record = reader.retrieve(&url).await;
        assert!(record.is_degraded());
        assert!(record.title.is_empty());
        assert!(record.content.is_empty());
    }

    page.assert_hits_async(2).await;
    assert!(!store.contains(&url).await);
    assert!(store.recent(10).await.expect("recent").is_empty());
}

#[tokio::test]
async fn slow_upstream_yields_timeout_record() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .header("content-type", "text/html")
                .body(ARTICLE_PAGE)
                .delay(Duration::from_secs(3));
        })
        .await;

    let store = Arc::new(MemoryStore::new());
    let reader = reader(&store).with_extract_timeout(Duration::from_millis(200));
    let url = server.url("/slow");

    let record = reader.retrieve(&url).await;
    assert!(record.error_message.contains("timed out"), "{record:?}");
    assert!(!store.recent(10).await.expect("recent").contains(&url));
}

#[tokio::test]
async fn http_surface_serves_fresh_then_cached_article() {
    let server = MockServer::start_async().await;
    let page = server
        .mock_async(|when, then| {
            when.method(GET).path("/story");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(ARTICLE_PAGE);
        })
        .await;

    let store = Arc::new(MemoryStore::new());
    let app = api::create_router(Arc::new(reader(&store)));
    let url = server.url("/story");
    let path = format!("/read/{}", escape(&url));

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri(&path)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["url"], url.as_str());
        assert_eq!(json["title"], "Example");
        assert_eq!(json["errorMessage"], "");
    }
    page.assert_hits_async(1).await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/popular")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["articles"][0]["url"], url.as_str());
    assert_eq!(json["articles"][0]["views"], 1);
}
