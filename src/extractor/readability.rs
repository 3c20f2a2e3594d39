//! Readability heuristics: pick the title and main content block out of an HTML document.

use crate::extractor::{ExtractedArticle, ExtractionError};
use ammonia::{Builder, UrlRelative};
use scraper::{Html, Selector};
use url::Url;

/// Sources for the title, most specific first.
const TITLE_SELECTORS: [&str; 3] = [r#"meta[property="og:title"]"#, "title", "h1"];
/// Containers that usually wrap the article body, most specific first.
const CONTENT_SELECTORS: [&str; 4] = ["article", "main", r#"[role="main"]"#, "body"];
/// Page chrome dropped together with its text.
static NOISE_TAGS: [&str; 5] = ["nav", "aside", "footer", "header", "form"];

/// Derive the title and sanitized body of `html`, resolving relative links against `base`.
pub fn parse_document(html: &str, base: &Url) -> Result<ExtractedArticle, ExtractionError> {
    let document = Html::parse_document(html);
    let title = extract_title(&document)?;
    let content = find_content(&document, base)?.ok_or_else(|| {
        ExtractionError::Parse("document contains no readable content".to_string())
    })?;

    Ok(ExtractedArticle { title, content })
}

fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css)
        .map_err(|error| ExtractionError::Parse(format!("invalid selector {css}: {error:?}")))
}

fn extract_title(document: &Html) -> Result<String, ExtractionError> {
    for css in TITLE_SELECTORS {
        let selector = selector(css)?;
        for element in document.select(&selector) {
            let raw = match element.value().name() {
                "meta" => element.value().attr("content").unwrap_or_default().to_string(),
                _ => element.text().collect::<String>(),
            };
            let title = collapse_whitespace(&raw);
            if !title.is_empty() {
                return Ok(title);
            }
        }
    }
    Ok(String::new())
}

/// Sanitized markup of the first candidate container that still shows text once cleaned.
///
/// Containers holding only scripts or page chrome are skipped, so a decoy `<article>` falls
/// through to `main`, `[role=main]` and finally `body`.
fn find_content(document: &Html, base: &Url) -> Result<Option<String>, ExtractionError> {
    for css in CONTENT_SELECTORS {
        let selector = selector(css)?;
        let cleaned = document
            .select(&selector)
            .map(|element| sanitize(&element.inner_html(), base))
            .find(|content| has_visible_text(content));
        if cleaned.is_some() {
            return Ok(cleaned);
        }
    }
    Ok(None)
}

fn sanitize(fragment: &str, base: &Url) -> String {
    let mut builder = Builder::default();
    builder
        .rm_tags(NOISE_TAGS.iter())
        .add_clean_content_tags(NOISE_TAGS.iter())
        .url_relative(UrlRelative::RewriteWithBase(base.clone()));
    builder.clean(fragment).to_string().trim().to_string()
}

fn has_visible_text(fragment: &str) -> bool {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .any(|text| !text.trim().is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
