//! Bing Images source adapter.
//!
//! Queries the Bing image-search results page. Bing marks result images
//! with the `mimg` class; when none are present (markup changes, consent
//! interstitials) the adapter falls back to scanning all `img` tags.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::filter::{dedupe_preserving_order, is_plausible_image_url};
use super::types::{ImageSource, SourceError};
use crate::http::{AsyncHttpClient, BoxFuture};
use crate::query::ProductQuery;

/// Maximum number of URLs this source yields per search.
const RESULT_CAP: usize = 8;

/// Prior confidence for Bing image results.
const CONFIDENCE: f64 = 0.8;

fn mimg_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<img[^>]+class="[^"]*mimg[^"]*"[^>]*?(?:data-src|src)="(https?://[^"]+)""#)
            .expect("valid regex")
    })
}

fn img_src_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<img[^>]+?(?:data-src|src)="(https?://[^"]+)""#).expect("valid regex")
    })
}

/// Bing Images search source.
pub struct BingImagesSource<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> BingImagesSource<C> {
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    fn build_url(&self, query: &ProductQuery) -> String {
        let term = query.search_term("product");
        format!(
            "https://www.bing.com/images/search?q={}&form=HDRSC2",
            urlencoding::encode(&term)
        )
    }

    fn extract_urls(page: &str) -> Vec<String> {
        let mut urls: Vec<String> = mimg_regex()
            .captures_iter(page)
            .map(|c| c[1].to_string())
            .filter(|u| is_plausible_image_url(u))
            .collect();

        // Result-image markup not found; fall back to any img tag.
        if urls.is_empty() {
            urls = img_src_regex()
                .captures_iter(page)
                .map(|c| c[1].to_string())
                .filter(|u| is_plausible_image_url(u))
                .collect();
        }

        let mut urls = dedupe_preserving_order(urls);
        urls.truncate(RESULT_CAP);
        urls
    }
}

impl<C: AsyncHttpClient> ImageSource for BingImagesSource<C> {
    fn name(&self) -> &str {
        "bing"
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
