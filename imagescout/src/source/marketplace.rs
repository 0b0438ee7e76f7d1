//! Marketplace aggregator source adapter.
//!
//! Runs an image search restricted to known marketplace domains and keeps
//! only result URLs hosted on (or proxied for) those domains. Marketplace
//! listings photograph products on neutral backgrounds, which scores well
//! downstream, but the listings churn, hence the lower confidence.

use tracing::debug;

use super::filter::{dedupe_preserving_order, is_plausible_image_url};
use super::types::{ImageSource, SourceError};
use crate::http::{AsyncHttpClient, BoxFuture};
use crate::query::ProductQuery;

/// Maximum number of URLs this source yields per search.
const RESULT_CAP: usize = 5;

/// Prior confidence for marketplace results.
const CONFIDENCE: f64 = 0.6;

/// Marketplace domains whose listing images are accepted.
const MARKETPLACE_DOMAINS: &[&str] = &[
    "amazon.com",
    "amazon.in",
    "amazon.co.uk",
    "flipkart.com",
    "walmart.com",
    "target.com",
    "bigbasket.com",
    "jiomart.com",
];

/// Returns true if the URL's host belongs to a known marketplace.
fn is_marketplace_url(url: &str) -> bool {
    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("");

    MARKETPLACE_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Marketplace image search source.
pub struct MarketplaceSource<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> MarketplaceSource<C> {
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    fn build_url(&self, query: &ProductQuery) -> String {
        let term = format!(
            "{} site:amazon.com OR site:flipkart.com OR site:walmart.com",
            query.search_term("")
        );
        format!(
            "https://www.google.com/search?q={}&tbm=isch&safe=active",
            urlencoding::encode(&term)
        )
    }

    fn extract_urls(page: &str) -> Vec<String> {
        // Reuses the embedded-JSON extraction; only marketplace-hosted
        // results survive the domain filter.
        let urls: Vec<String> = super::google::extract_embedded_urls(page)
            .into_iter()
            .filter(|u| is_marketplace_url(u) && is_plausible_image_url(u))
            .collect();

        let mut urls = dedupe_preserving_order(urls);
        urls.truncate(RESULT_CAP);
        urls
    }
}

impl<C: AsyncHttpClient> ImageSource for MarketplaceSource<C> {
    fn name(&self) -> &str {
        "marketplace"
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
