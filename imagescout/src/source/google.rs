//! Google Images source adapter.
//!
//! Queries the Google image-search results page and extracts candidate
//! URLs from two places: `"ou":"..."` references embedded in the page's
//! script data (the original full-size URLs) and plain `img` tags.
//! No API key required; results are capped to keep downstream probing
//! cheap.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::filter::{dedupe_preserving_order, is_plausible_image_url};
use super::types::{ImageSource, SourceError};
use crate::http::{AsyncHttpClient, BoxFuture};
use crate::query::ProductQuery;

/// Maximum number of URLs this source yields per search.
const RESULT_CAP: usize = 10;

/// Prior confidence for Google image results.
const CONFIDENCE: f64 = 0.9;

fn ou_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""ou":"([^"]+)""#).expect("valid regex"))
}

fn img_src_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<img[^>]+?(?:data-src|src)="(https?://[^"]+)""#).expect("valid regex")
    })
}

/// Undoes the JSON-string escaping Google applies to embedded URLs.
fn unescape_embedded_url(url: &str) -> String {
    url.replace("\\u003d", "=").replace("\\u0026", "&")
}

/// Extracts the raw `"ou":"..."` URL references from a results page.
///
/// Shared with the marketplace adapter, which applies its own domain
/// filter on top.
pub(super) fn extract_embedded_urls(page: &str) -> Vec<String> {
    ou_regex()
        .captures_iter(page)
        .map(|c| unescape_embedded_url(&c[1]))
        .collect()
}

/// Google Images search source.
pub struct GoogleImagesSource<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> GoogleImagesSource<C> {
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    fn build_url(&self, query: &ProductQuery) -> String {
        let term = query.search_term("product");
        format!(
            "https://www.google.com/search?q={}&tbm=isch&safe=active",
            urlencoding::encode(&term)
        )
    }

    /// Extracts plausible image URLs from a results page.
    fn extract_urls(page: &str) -> Vec<String> {
        let mut urls = Vec::new();

        for url in extract_embedded_urls(page) {
            if is_plausible_image_url(&url) {
                urls.push(url);
            }
        }

        for capture in img_src_regex().captures_iter(page) {
            let url = capture[1].to_string();
            if is_plausible_image_url(&url) {
                urls.push(url);
            }
        }

        let mut urls = dedupe_preserving_order(urls);
        urls.truncate(RESULT_CAP);
        urls
    }
}

impl<C: AsyncHttpClient> ImageSource for GoogleImagesSource<C> {
    fn name(&self) -> &str {
        "google"
    }

    fn confidence(&self) -> f64 {
        CONFIDENCE
    }

    fn search<'a>(
        &'a self,
        query: &'a ProductQuery,
    ) -> BoxFuture<'a, Result<Vec<String>, SourceError>> {
        Box::pin(async move {
            let url = self.build_url(query);
            let response = self.http_client.get(&url).await?;
            let page = String::from_utf8_lossy(&response.body);
            let urls = Self::extract_urls(&page);
            debug!(source = self.name(), found = urls.len(), "search complete");
            Ok(urls)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockHttpClient;
    use crate::http::HttpError;

    fn sample_page() -> String {
        concat!(
            r#"<html><script>var data = ["#,
            r#"{"ou":"https://cdn.example.com/products/widget.jpg","ow":800},"#,
            r#"{"ou":"https://cdn.example.com/escaped.jpg?a=1&2","ow":600},"#,
            r#"{"ou":"https://cdn.example.com/logo.png"}"#,
            r#"];</script>"#,
            r#"<img data-src="https://img.example.com/images/thumb1.jpeg">"#,
            r#"<img src="https://img.example.com/products/widget.jpg">"#,
            r#"<img src="/relative/skipped.jpg">"#,
            r#"</html>"#,
        )
        .to_string()
    }

    #[test]
    fn test_extract_urls_from_script_and_img_tags() {
        let urls = GoogleImagesSource::<MockHttpClient>::extract_urls(&sample_page());

        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/products/widget.jpg",
                "https://cdn.example.com/escaped.jpg?a=1&2",
                "https://img.example.com/images/thumb1.jpeg",
                "https://img.example.com/products/widget.jpg",
            ]
        );
    }

    #[test]
    fn test_extract_urls_caps_results() {
        let mut page = String::new();
        for i in 0..30 {
            page.push_str(&format!(r#"{{"ou":"https://c.example.com/p{}.jpg"}}"#, i));
        }
        let urls = GoogleImagesSource::<MockHttpClient>::extract_urls(&page);
        assert_eq!(urls.len(), RESULT_CAP);
    }

    #[tokio::test]
    async fn test_search_success() {
        let mock = MockHttpClient::with_body("text/html", sample_page().as_bytes());
        let source = GoogleImagesSource::new(mock);
        let query = ProductQuery::new("widget", "acme").unwrap();

        let urls = source.search(&query).await.unwrap();
        assert!(!urls.is_empty());
        assert_eq!(source.name(), "google");
    }

    #[tokio::test]
    async fn test_search_propagates_http_error() {
        let mock = MockHttpClient {
            response: Err(HttpError::Transport("connection refused".to_string())),
        };
        let source = GoogleImagesSource::new(mock);
        let query = ProductQuery::new("widget", "").unwrap();

        let result = source.search(&query).await;
        assert!(matches!(result, Err(SourceError::Http(_))));
    }

    #[test]
    fn test_build_url_encodes_query() {
        let mock = MockHttpClient::with_body("text/html", b"");
        let source = GoogleImagesSource::new(mock);
        let query = ProductQuery::new("surf excel", "unilever").unwrap();

        let url = source.build_url(&query);
        assert_eq!(
            url,
            "https://www.google.com/search?q=unilever%20surf%20excel%20product&tbm=isch&safe=active"
        );
    }
}
