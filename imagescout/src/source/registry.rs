//! Source registry.
//!
//! Holds the sources an acquisition queries, in priority order. Priority
//! determines merge order during deduplication: a URL found by two
//! sources is attributed to the earlier-registered one.

use std::sync::Arc;

use super::bing::BingImagesSource;
use super::google::GoogleImagesSource;
use super::marketplace::MarketplaceSource;
use super::types::ImageSource;
use super::wiki::WikipediaSource;
use crate::http::AsyncHttpClient;

/// Ordered collection of registered image sources.
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn ImageSource>>,
}

impl SourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Creates a registry with the default source set in priority order:
    /// google, bing, wikipedia, marketplace.
    ///
    /// The client is shared across all sources; pass an `Arc`-wrapped
    /// pooled client.
    pub fn with_default_sources<C>(http_client: C) -> Self
    where
        C: AsyncHttpClient + Clone + 'static,
    {
        let mut registry = Self::new();
        registry.register(Arc::new(GoogleImagesSource::new(http_client.clone())));
        registry.register(Arc::new(BingImagesSource::new(http_client.clone())));
        registry.register(Arc::new(WikipediaSource::new(http_client.clone())));
        registry.register(Arc::new(MarketplaceSource::new(http_client)));
        registry
    }

    /// Appends a source at the lowest priority position.
    pub fn register(&mut self, source: Arc<dyn ImageSource>) {
        self.sources.push(source);
    }

    /// Registered sources in priority order.
    pub fn sources(&self) -> &[Arc<dyn ImageSource>] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
