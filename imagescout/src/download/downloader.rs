//! Downloader implementation.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::policy::RetryPolicy;
use crate::candidate::{ImageFormat, ScoredCandidate};
use crate::http::{AsyncHttpClient, HttpError};
use crate::store::{ImageStore, StoreError};

/// Default timeout for one download attempt.
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 15;

/// Minimum stored size for a download to count as real image content.
pub const DEFAULT_MIN_IMAGE_BYTES: u64 = 1024;

/// Fatal downloader outcomes.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Every ranked candidate exhausted its attempts.
    #[error("all candidates exhausted ({0} tried)")]
    AllCandidatesExhausted(usize),

    /// The ranked list was empty.
    #[error("no candidates to download")]
    NoCandidates,

    /// The acquisition was cancelled mid-download.
    #[error("download cancelled")]
    Cancelled,
}

/// Per-attempt transient failures. Absorbed by the retry loop and only
/// surfaced through logs.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The fetch exceeded the attempt timeout.
    #[error("download timed out")]
    Timeout,

    /// The underlying HTTP request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response did not declare an image content type.
    #[error("content type {0:?} is not an image")]
    NotAnImage(Option<String>),

    /// The body did not decode as a structurally valid image.
    #[error("image validation failed: {0}")]
    Decode(String),

    /// The body was smaller than the minimum stored size.
    #[error("image too small: {size} bytes (min {min})")]
    TooSmall { size: u64, min: u64 },

    /// The storage boundary rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The cancellation token fired mid-attempt.
    #[error("attempt cancelled")]
    Cancelled,
}

/// A successful download: where it landed and which candidate won.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// Path of the stored image.
    pub path: PathBuf,
    /// Index into the ranked list of the candidate that downloaded.
    pub candidate_index: usize,
    /// Format the stored image decoded as.
    pub format: ImageFormat,
}

/// Downloads the best available candidate through the storage boundary.
///
/// Candidate attempts are strictly sequential; speculative parallel
/// downloads are deliberately not supported so retry and backoff stay
/// deterministic and bandwidth is not wasted on losing candidates.
pub struct ImageDownloader<C: AsyncHttpClient, S: ImageStore> {
    http_client: C,
    store: S,
    policy: RetryPolicy,
    timeout: Duration,
    min_bytes: u64,
}

impl<C: AsyncHttpClient, S: ImageStore> ImageDownloader<C, S> {
    /// Creates a downloader with the default retry policy, timeout, and
    /// minimum size threshold.
    pub fn new(http_client: C, store: S) -> Self {
        Self {
            http_client,
            store,
            policy: RetryPolicy::default(),
            timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            min_bytes: DEFAULT_MIN_IMAGE_BYTES,
        }
    }

    /// Sets the retry policy applied per candidate.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the minimum accepted image size in bytes.
    pub fn with_min_bytes(mut self, min_bytes: u64) -> Self {
        self.min_bytes = min_bytes;
        self
    }

    /// Downloads the first candidate that fetches, validates, and stores
    /// successfully, walking `ranked` strictly in order.
    ///
    /// `key_stem` is the filename stem derived from the product identity;
    /// the decoded format's extension is appended on store.
    ///
    /// # Errors
    ///
    /// [`DownloadError::AllCandidatesExhausted`] when every candidate used
    /// up its attempts, [`DownloadError::Cancelled`] when the token fired.
    /// Higher-ranked candidates are never retried after the downloader has
    /// advanced past them.
    pub async fn acquire(
        &self,
        ranked: &[ScoredCandidate],
        key_stem: &str,
        cancel: &CancellationToken,
    ) -> Result<DownloadOutcome, DownloadError> {
        if ranked.is_empty() {
            return Err(DownloadError::NoCandidates);
        }

        for (index, candidate) in ranked.iter().enumerate() {
            debug!(url = %candidate.url(), rank = index, "trying candidate");

            for attempt in 1..=self.policy.max_attempts() {
                if cancel.is_cancelled() {
                    return Err(DownloadError::Cancelled);
                }

                match self.attempt(candidate, key_stem, cancel).await {
                    Ok(outcome) => {
                        info!(
                            url = %candidate.url(),
                            path = %outcome.path.display(),
                            attempt,
                            "image stored"
                        );
                        return Ok(DownloadOutcome {
                            candidate_index: index,
                            ..outcome
                        });
                    }
                    Err(AttemptError::Cancelled) => return Err(DownloadError::Cancelled),
                    Err(e) => {
                        warn!(
                            url = %candidate.url(),
                            attempt,
                            error = %e,
                            "download attempt failed"
                        );
                        match self.policy.delay_for_attempt(attempt) {
                            Some(delay) => {
                                tokio::select! {
                                    _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
                                    _ = tokio::time::sleep(delay) => {}
                                }
                            }
                            None => break,
                        }
                    }
                }
            }

            debug!(url = %candidate.url(), "candidate exhausted, advancing");
        }

        Err(DownloadError::AllCandidatesExhausted(ranked.len()))
    }

    /// One fetch-validate-store attempt for a candidate.
    async fn attempt(
        &self,
        candidate: &ScoredCandidate,
        key_stem: &str,
        cancel: &CancellationToken,
    ) -> Result<DownloadOutcome, AttemptError> {
        let fetch = tokio::time::timeout(self.timeout, self.http_client.get(candidate.url()));
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(AttemptError::Cancelled),
            result = fetch => match result {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => return Err(AttemptError::Http(e)),
                Err(_) => return Err(AttemptError::Timeout),
            },
        };

        let declares_image = response
            .content_type
            .as_deref()
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !declares_image {
            return Err(AttemptError::NotAnImage(response.content_type));
        }

        let size = response.body.len() as u64;
        if size < self.min_bytes {
            return Err(AttemptError::TooSmall {
                size,
                min: self.min_bytes,
            });
        }

        // Full structural decode; a truncated or corrupt body fails here
        // instead of landing on disk.
        image::load_from_memory(&response.body)
            .map_err(|e| AttemptError::Decode(e.to_string()))?;
        let format = image::guess_format(&response.body)
            .map(ImageFormat::from_decoded)
            .unwrap_or_default();

        // Never start a storage write after cancellation.
        if cancel.is_cancelled() {
            return Err(AttemptError::Cancelled);
        }

        let key = format!("{}.{}", key_stem, format.extension());
        let path = self.store.write(&key, response.body.to_vec()).await?;

        let stored = self.store.size(&path).await?;
        if stored < self.min_bytes {
            return Err(AttemptError::TooSmall {
                size: stored,
                min: self.min_bytes,
            });
        }

        Ok(DownloadOutcome {
            path,
            candidate_index: 0,
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use crate::http::tests::ScriptedHttpClient;
    use crate::http::HttpResponse;
    use crate::store::DiskStore;
    use bytes::Bytes;
    use std::io::Cursor;

    fn jpeg_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_fn(256, 256, |x, y| {
            image::Rgb([
                (x * 7 % 256) as u8,
                (y * 13 % 256) as u8,
                ((x + y) * 5 % 256) as u8,
            ])
        });
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        assert!(buf.len() as u64 > DEFAULT_MIN_IMAGE_BYTES);
        buf
    }

    fn image_response(body: Vec<u8>) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse {
            content_type: Some("image/jpeg".to_string()),
            body: Bytes::from(body),
        })
    }

    fn html_response() -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse {
            content_type: Some("text/html".to_string()),
            body: Bytes::from_static(b"<html>blocked</html>"),
        })
    }

    fn ranked(urls: &[&str]) -> Vec<ScoredCandidate> {
        urls.iter()
            .enumerate()
            .map(|(i, url)| {
                let mut c = ScoredCandidate::failed(Candidate::new(*url, "google", i), "unset");
                c.fetch_error = None;
                c.score = 1.0 - i as f64 * 0.1;
                c
            })
            .collect()
    }

    fn downloader(
        http: ScriptedHttpClient,
        store: DiskStore,
    ) -> ImageDownloader<ScriptedHttpClient, DiskStore> {
        // No backoff delay to keep tests fast.
        ImageDownloader::new(http, store)
            .with_policy(RetryPolicy::fixed(3, Duration::from_millis(0)))
    }

    #[tokio::test]
    async fn test_first_candidate_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let http = ScriptedHttpClient::new();
        http.script("http://a/img.jpg", vec![image_response(jpeg_bytes())]);

        let dl = downloader(http, DiskStore::new(dir.path()));
        let outcome = dl
            .acquire(
                &ranked(&["http://a/img.jpg"]),
                "widget",
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.candidate_index, 0);
        assert_eq!(outcome.format, ImageFormat::Jpeg);
        assert!(outcome.path.ends_with("widget.jpg"));
        assert!(outcome.path.exists());
    }

    #[tokio::test]
    async fn test_falls_through_to_third_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let http = ScriptedHttpClient::new();
        http.script("http://a/1.jpg", vec![html_response()]);
        http.script("http://a/2.jpg", vec![html_response()]);
        http.script("http://a/3.jpg", vec![image_response(jpeg_bytes())]);

        let dl = downloader(http, DiskStore::new(dir.path()));
        let list = ranked(&["http://a/1.jpg", "http://a/2.jpg", "http://a/3.jpg"]);
        let outcome = dl
            .acquire(&list, "widget", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.candidate_index, 2);
        // Failing candidates were each tried up to the attempt cap.
        assert_eq!(dl.http_client.hits("http://a/1.jpg"), 3);
        assert_eq!(dl.http_client.hits("http://a/2.jpg"), 3);
        assert_eq!(dl.http_client.hits("http://a/3.jpg"), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_then_success_on_retry() {
        let dir = tempfile::tempdir().unwrap();
        let http = ScriptedHttpClient::new();
        http.script(
            "http://a/img.jpg",
            vec![
                Err(HttpError::Timeout {
                    url: "http://a/img.jpg".to_string(),
                }),
                image_response(jpeg_bytes()),
            ],
        );

        let dl = downloader(http, DiskStore::new(dir.path()));
        let outcome = dl
            .acquire(
                &ranked(&["http://a/img.jpg"]),
                "widget",
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.candidate_index, 0);
        assert_eq!(dl.http_client.hits("http://a/img.jpg"), 2);
    }

    #[tokio::test]
    async fn test_all_candidates_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let http = ScriptedHttpClient::new();
        http.script("http://a/1.jpg", vec![html_response()]);
        http.script("http://a/2.jpg", vec![html_response()]);

        let dl = downloader(http, DiskStore::new(dir.path()));
        let result = dl
            .acquire(
                &ranked(&["http://a/1.jpg", "http://a/2.jpg"]),
                "widget",
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(
            result,
            Err(DownloadError::AllCandidatesExhausted(2))
        ));
        // Nothing was written.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_undersized_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let http = ScriptedHttpClient::new();
        // Tiny but decodable PNG-like body still under the size floor.
        http.script(
            "http://a/tiny.png",
            vec![Ok(HttpResponse {
                content_type: Some("image/png".to_string()),
                body: Bytes::from(vec![0u8; 100]),
            })],
        );

        let dl = downloader(http, DiskStore::new(dir.path()));
        let result = dl
            .acquire(
                &ranked(&["http://a/tiny.png"]),
                "widget",
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(DownloadError::AllCandidatesExhausted(1))));
    }

    #[tokio::test]
    async fn test_corrupt_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let http = ScriptedHttpClient::new();
        http.script(
            "http://a/corrupt.jpg",
            vec![Ok(HttpResponse {
                content_type: Some("image/jpeg".to_string()),
                body: Bytes::from(vec![0xFFu8; 4096]),
            })],
        );

        let dl = downloader(http, DiskStore::new(dir.path()));
        let result = dl
            .acquire(
                &ranked(&["http://a/corrupt.jpg"]),
                "widget",
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(DownloadError::AllCandidatesExhausted(1))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_download_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let http = ScriptedHttpClient::new();
        http.script("http://a/img.jpg", vec![image_response(jpeg_bytes())]);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let dl = downloader(http, DiskStore::new(dir.path()));
        let result = dl
            .acquire(&ranked(&["http://a/img.jpg"]), "widget", &cancel)
            .await;

        assert!(matches!(result, Err(DownloadError::Cancelled)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_ranked_list() {
        let dir = tempfile::tempdir().unwrap();
        let dl = downloader(ScriptedHttpClient::new(), DiskStore::new(dir.path()));

        let result = dl.acquire(&[], "widget", &CancellationToken::new()).await;
        assert!(matches!(result, Err(DownloadError::NoCandidates)));
    }
}
