//! HTTP extractor fetching pages with `reqwest`.

use crate::extractor::{ExtractedArticle, ExtractionError, Extractor, readability};
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("readability-cache/", env!("CARGO_PKG_VERSION"));

/// Fetches pages over HTTP(S) and runs them through the readability heuristics.
#[derive(Clone)]
pub struct HttpExtractor {
    client: Client,
}

impl HttpExtractor {
    /// Build an extractor with a shared connection pool.
    pub fn new() -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ExtractionError::Network)?;
        Ok(Self { client })
    }
}

fn parse_article_url(raw: &str) -> Result<Url, ExtractionError> {
    let invalid = |reason: String| ExtractionError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn is_html(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "text/html" || essence == "application/xhtml+xml"
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<ExtractedArticle, ExtractionError> {
        let target = parse_article_url(url)?;
        let map_error = |error: reqwest::Error| {
            if error.is_timeout() {
                ExtractionError::Timeout(timeout)
            } else {
                ExtractionError::Network(error)
            }
        };

        let response = self
            .client
            .get(target)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, %status, "Upstream returned non-success status");
            return Err(ExtractionError::UpstreamStatus(status));
        }

        // A missing content type is sniffed as HTML by browsers; do the same.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(content_type) = content_type.filter(|value| !is_html(value)) {
            return Err(ExtractionError::NotHtml(content_type));
        }

        // Redirects may move the document; resolve links against where it ended up.
        let base = response.url().clone();
        let body = response.text().await.map_err(map_error)?;
        let article = readability::parse_document(&body, &base)?;
        tracing::debug!(
            url,
            title = %article.title,
            content_bytes = article.content.len(),
            "Extracted article"
        );
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};

    const PAGE: &str = "<html><head><title>Example</title></head>\
                        <body><article><p>Hi</p></article></body></html>";

    #[tokio::test]
    async fn extracts_title_and_content() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/story");
                then.status(200)
                    .header("content-type", "text/html; charset=utf-8")
                    .body(PAGE);
            })
            .await;

        let extractor = HttpExtractor::new().expect("extractor");
        let article = extractor
            .extract(&server.url("/story"), Duration::from_secs(5))
            .await
            .expect("extract");

        mock.assert_async().await;
        assert_eq!(article.title, "Example");
        assert_eq!(article.content, "<p>Hi</p>");
    }

    #[tokio::test]
    async fn rejects_non_html_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data.json");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("{}");
            })
            .await;

        let extractor = HttpExtractor::new().expect("extractor");
        let error = extractor
            .extract(&server.url("/data.json"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(error, ExtractionError::NotHtml(kind) if kind == "application/json"));
    }

    #[tokio::test]
    async fn surfaces_upstream_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/gone");
                then.status(404);
            })
            .await;

        let extractor = HttpExtractor::new().expect("extractor");
        let error = extractor
            .extract(&server.url("/gone"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ExtractionError::UpstreamStatus(status) if status.as_u16() == 404
        ));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200)
                    .header("content-type", "text/html")
                    .body(PAGE)
                    .delay(Duration::from_secs(3));
            })
            .await;

        let extractor = HttpExtractor::new().expect("extractor");
        let timeout = Duration::from_millis(200);
        let error = extractor
            .extract(&server.url("/slow"), timeout)
            .await
            .unwrap_err();
        assert!(matches!(error, ExtractionError::Timeout(limit) if limit == timeout));
    }

    #[tokio::test]
    async fn invalid_urls_are_rejected_without_fetching() {
        let extractor = HttpExtractor::new().expect("extractor");
        for url in ["not a url", "ftp://files.test/a.html", "/relative/path"] {
            let error = extractor
                .extract(url, Duration::from_secs(1))
                .await
                .unwrap_err();
            assert!(
                matches!(error, ExtractionError::InvalidUrl { .. }),
                "{url}: {error}"
            );
        }
    }

    #[test]
    fn html_content_types() {
        assert!(is_html("text/html"));
        assert!(is_html("Text/HTML; charset=ISO-8859-1"));
        assert!(is_html("application/xhtml+xml"));
        assert!(!is_html("text/plain"));
        assert!(!is_html("application/pdf"));
    }
}
