//! Metadata prober.
//!
//! Fetches candidate bytes to obtain pixel dimensions, byte size, and
//! encoding format, then applies the pure scoring function. Probes run
//! concurrently up to a bounded limit; results are keyed by candidate
//! identity so completion order never affects the final ranking.

use std::io::Cursor;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::scoring::quality_score;
use super::weights::ScoreWeights;
use crate::candidate::{Candidate, ImageFormat, ImageMetadata, ScoredCandidate};
use crate::http::AsyncHttpClient;

/// Default timeout for one metadata fetch.
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Default number of concurrent probes.
const DEFAULT_CONCURRENCY: usize = 4;

/// Fetches and scores candidate metadata with bounded concurrency.
pub struct MetadataProber<C: AsyncHttpClient> {
    http_client: C,
    timeout: Duration,
    concurrency: usize,
}

impl<C: AsyncHttpClient> MetadataProber<C> {
    /// Creates a prober with default timeout and concurrency.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the concurrent probe limit (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Probes and scores every candidate, returning them in discovery
    /// order. A fetch or decode failure yields a zero-metadata candidate
    /// with `fetch_error` set rather than an error.
    pub async fn score_candidates(
        &self,
        candidates: Vec<Candidate>,
        weights: &ScoreWeights,
        cancel: &CancellationToken,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = stream::iter(candidates)
            .map(|candidate| self.probe(candidate, weights, cancel))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        scored.sort_by_key(|c| c.discovery_order());
        scored
    }

    async fn probe(
        &self,
        candidate: Candidate,
        weights: &ScoreWeights,
        cancel: &CancellationToken,
    ) -> ScoredCandidate {
        if cancel.is_cancelled() {
            return ScoredCandidate::failed(candidate, "cancelled");
        }

        let fetch = tokio::time::timeout(self.timeout, self.http_client.get(&candidate.url));
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                return ScoredCandidate::failed(candidate, "cancelled");
            }
            result = fetch => match result {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => return ScoredCandidate::failed(candidate, e.to_string()),
                Err(_) => return ScoredCandidate::failed(candidate, "metadata fetch timed out"),
            },
        };

        let byte_size = response.body.len() as u64;

        let reader = match image::ImageReader::new(Cursor::new(response.body.as_ref()))
            .with_guessed_format()
        {
            Ok(reader) => reader,
            Err(e) => return ScoredCandidate::failed(candidate, format!("decode failed: {}", e)),
        };
        let format = reader.format().map(ImageFormat::from_decoded);

        let (width, height) = match reader.into_dimensions() {
            Ok(dimensions) => dimensions,
            Err(e) => return ScoredCandidate::failed(candidate, format!("decode failed: {}", e)),
        };

        let metadata = ImageMetadata {
            width,
            height,
            byte_size,
            format,
        };
        let score = quality_score(width, height, byte_size, format, weights);
        debug!(
            url = %candidate.url,
            width,
            height,
            byte_size,
            score,
            "candidate probed"
        );

        ScoredCandidate::scored(candidate, metadata, score)
    }
}
