//! Wikipedia source adapter.
//!
//! Asks the Wikipedia REST page-summary API for the article matching the
//! product, yielding its thumbnail and original image. When the summary
//! lookup finds nothing, falls back to scanning the search results page
//! for `upload.wikimedia.org` images.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::filter::{dedupe_preserving_order, is_plausible_image_url};
use super::types::{ImageSource, SourceError};
use crate::http::{AsyncHttpClient, BoxFuture};
use crate::query::ProductQuery;

/// Maximum number of URLs this source yields per search.
const RESULT_CAP: usize = 3;

/// Prior confidence for Wikipedia results.
const CONFIDENCE: f64 = 0.7;

fn wikimedia_img_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<img[^>]+?src="((?:https:)?//upload\.wikimedia\.org/[^"]+)""#)
            .expect("valid regex")
    })
}

/// Subset of the REST page-summary response the adapter reads.
#[derive(Debug, Deserialize)]
struct PageSummary {
    thumbnail: Option<ImageRef>,
    #[serde(rename = "originalimage")]
    original_image: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    source: String,
}

/// Wikipedia page-summary source.
pub struct WikipediaSource<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> WikipediaSource<C> {
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    fn summary_url(&self, query: &ProductQuery) -> String {
        let term = query.search_term("");
        format!(
            "https://en.wikipedia.org/api/rest_v1/page/summary/{}",
            urlencoding::encode(&term)
        )
    }

    fn search_url(&self, query: &ProductQuery) -> String {
        let term = query.search_term("");
        format!(
            "https://en.wikipedia.org/wiki/Special:Search?search={}&go=Go",
            urlencoding::encode(&term)
        )
    }

    fn extract_summary_urls(body: &[u8]) -> Result<Vec<String>, SourceError> {
        let summary: PageSummary =
            serde_json::from_slice(body).map_err(|e| SourceError::Parse(e.to_string()))?;

        let mut urls = Vec::new();
        if let Some(thumbnail) = summary.thumbnail {
            urls.push(thumbnail.source);
        }
        if let Some(original) = summary.original_image {
            urls.push(original.source);
        }
        Ok(dedupe_preserving_order(urls))
    }

    fn extract_page_urls(page: &str) -> Vec<String> {
        let urls: Vec<String> = wikimedia_img_regex()
            .captures_iter(page)
            .map(|c| {
                let url = &c[1];
                // Protocol-relative src attributes are common on Wikipedia.
                if let Some(rest) = url.strip_prefix("//") {
                    format!("https://{}", rest)
                } else {
                    url.to_string()
                }
            })
            .filter(|u| is_plausible_image_url(u))
            .collect();

        let mut urls = dedupe_preserving_order(urls);
        urls.truncate(RESULT_CAP);
        urls
    }
}

impl<C: AsyncHttpClient> ImageSource for WikipediaSource<C> {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn confidence(&self) -> f64 {
        CONFIDENCE
    }

    fn search<'a>(
        &'a self,
        query: &'a ProductQuery,
    ) -> BoxFuture<'a, Result<Vec<String>, SourceError>> {
        Box::pin(async move {
            // Summary API first; a missing article is a 404, not a failure
            // of the whole source.
            match self.http_client.get(&self.summary_url(query)).await {
                Ok(response) => {
                    if let Ok(urls) = Self::extract_summary_urls(&response.body) {
                        if !urls.is_empty() {
                            debug!(source = self.name(), found = urls.len(), "summary hit");
                            return Ok(urls);
                        }
                    }
                }
                Err(e) => {
                    debug!(source = self.name(), error = %e, "summary lookup missed");
                }
            }

            let response = self.http_client.get(&self.search_url(query)).await?;
            let page = String::from_utf8_lossy(&response.body);
            let urls = Self::extract_page_urls(&page);
            debug!(source = self.name(), found = urls.len(), "search complete");
            Ok(urls)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::{MockHttpClient, ScriptedHttpClient};
    use crate::http::{HttpError, HttpResponse};
    use bytes::Bytes;

    #[test]
    fn test_extract_summary_urls() {
        let body = br#"{
            "title": "Widget",
            "thumbnail": {"source": "https://upload.wikimedia.org/t/widget.jpg", "width": 320},
            "originalimage": {"source": "https://upload.wikimedia.org/o/widget.jpg", "width": 1200}
        }"#;

        let urls = WikipediaSource::<MockHttpClient>::extract_summary_urls(body).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://upload.wikimedia.org/t/widget.jpg",
                "https://upload.wikimedia.org/o/widget.jpg",
            ]
        );
    }

    #[test]
    fn test_extract_summary_urls_without_images() {
        let body = br#"{"title": "Widget"}"#;
        let urls = WikipediaSource::<MockHttpClient>::extract_summary_urls(body).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn test_extract_page_urls_resolves_protocol_relative() {
        let page = concat!(
            r#"<img src="//upload.wikimedia.org/wikipedia/commons/thumb/widget.jpg">"#,
            r#"<img src="https://upload.wikimedia.org/wikipedia/commons/photo.png">"#,
            r#"<img src="https://en.wikipedia.org/static/logo.png">"#,
        );

        let urls = WikipediaSource::<MockHttpClient>::extract_page_urls(page);
        assert_eq!(
            urls,
            vec![
                "https://upload.wikimedia.org/wikipedia/commons/thumb/widget.jpg",
                "https://upload.wikimedia.org/wikipedia/commons/photo.png",
            ]
        );
    }

    #[tokio::test]
    async fn test_search_uses_summary_api_first() {
        let body = br#"{"thumbnail": {"source": "https://upload.wikimedia.org/t/x.jpg"}}"#;
        let mock = MockHttpClient::with_body("application/json", body);
        let source = WikipediaSource::new(mock);
        let query = ProductQuery::new("widget", "").unwrap();

        let urls = source.search(&query).await.unwrap();
        assert_eq!(urls, vec!["https://upload.wikimedia.org/t/x.jpg"]);
    }

    #[tokio::test]
    async fn test_search_falls_back_to_search_page() {
        let mock = ScriptedHttpClient::new();
        let query = ProductQuery::new("widget", "").unwrap();
        let source = WikipediaSource::new(mock);

        // Summary 404s, search page has one wikimedia image.
        source.http_client.script(
            &source.summary_url(&query),
            vec![Err(HttpError::Status {
                url: "summary".to_string(),
                status: 404,
            })],
        );
        source.http_client.script(
            &source.search_url(&query),
            vec![Ok(HttpResponse {
                content_type: Some("text/html".to_string()),
                body: Bytes::from_static(
                    br#"<img src="//upload.wikimedia.org/wikipedia/commons/w.jpg">"#,
                ),
            })],
        );

        let urls = source.search(&query).await.unwrap();
        assert_eq!(
            urls,
            vec!["https://upload.wikimedia.org/wikipedia/commons/w.jpg"]
        );
    }
}
