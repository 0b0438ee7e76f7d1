//! HTTP client abstraction for testability.
//!
//! All network access in the pipeline goes through the [`AsyncHttpClient`]
//! trait. This allows dependency injection and easier testing by enabling
//! mock HTTP clients in tests, and lets one pooled [`ReqwestClient`] be
//! shared read-only across acquisition calls.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

/// Default timeout for HTTP requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Browser-like User-Agent sent with every request.
///
/// Image search pages and CDNs routinely reject requests with a bare
/// library User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept header matching what a browser sends for mixed page/image fetches.
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur during an HTTP fetch.
#[derive(Debug, Error, Clone)]
pub enum HttpError {
    /// The request exceeded the client timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Connection, TLS, or protocol failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// The client itself could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Build(String),
}

/// A fetched HTTP response body plus the headers the pipeline cares about.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Value of the `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
    /// The full response body.
    pub body: Bytes,
}

/// Trait for HTTP GET operations.
///
/// Dyn-compatible via [`BoxFuture`] so sources, the scorer, and the
/// downloader can all share one client behind `Arc<dyn AsyncHttpClient>`.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the body with its
    /// declared content type, or an error for timeouts, transport
    /// failures, and non-2xx statuses.
    fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, HttpError>>;
}

impl<T: AsyncHttpClient + ?Sized> AsyncHttpClient for std::sync::Arc<T> {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
        (**self).get(url)
    }
}

/// Real HTTP client implementation using reqwest.
///
/// The underlying reqwest client pools connections, so cloning or wrapping
/// this in an `Arc` and sharing it across sources is cheap and encouraged.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new client with the default timeout and browser-like headers.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
        let url = url.to_string();
        let client = self.client.clone();
        Box::pin(async move {
            let response = client.get(&url).send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout { url: url.clone() }
                } else {
                    HttpError::Transport(e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(HttpError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            let body = response.bytes().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout { url: url.clone() }
                } else {
                    HttpError::Transport(e.to_string())
                }
            })?;

            Ok(HttpResponse { content_type, body })
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock HTTP client that serves a fixed response for every URL.
    pub struct MockHttpClient {
        pub response: Result<HttpResponse, HttpError>,
    }

    impl MockHttpClient {
        pub fn with_body(content_type: &str, body: &[u8]) -> Self {
            Self {
                response: Ok(HttpResponse {
                    content_type: Some(content_type.to_string()),
                    body: Bytes::copy_from_slice(body),
                }),
            }
        }
    }

    impl AsyncHttpClient for MockHttpClient {
        fn get(&self, _url: &str) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    /// Mock HTTP client that serves scripted per-URL response sequences.
    ///
    /// Each `get` for a URL pops the next scripted response; once a URL's
    /// script is exhausted the last response repeats. Tracks total request
    /// counts per URL so tests can assert attempt caps.
    pub struct ScriptedHttpClient {
        scripts: Mutex<HashMap<String, VecDeque<Result<HttpResponse, HttpError>>>>,
        hits: Mutex<HashMap<String, usize>>,
        total: AtomicUsize,
    }

    impl ScriptedHttpClient {
        pub fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
                hits: Mutex::new(HashMap::new()),
                total: AtomicUsize::new(0),
            }
        }

        pub fn script(&self, url: &str, responses: Vec<Result<HttpResponse, HttpError>>) {
            self.scripts
                .lock()
                .unwrap()
                .insert(url.to_string(), responses.into());
        }

        pub fn hits(&self, url: &str) -> usize {
            self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
        }

        pub fn total_requests(&self) -> usize {
            self.total.load(Ordering::SeqCst)
        }
    }

    impl AsyncHttpClient for ScriptedHttpClient {
        fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
            self.total.fetch_add(1, Ordering::SeqCst);
            *self.hits.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

            let mut scripts = self.scripts.lock().unwrap();
            let response = match scripts.get_mut(url) {
                Some(queue) => {
                    if queue.len() > 1 {
                        queue.pop_front().unwrap()
                    } else {
                        queue.front().cloned().unwrap_or_else(|| {
                            Err(HttpError::Transport("script exhausted".to_string()))
                        })
                    }
                }
                None => Err(HttpError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            };
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockHttpClient::with_body("image/jpeg", &[1, 2, 3, 4]);

        let result = mock.get("http://example.com").await;
        assert!(result.is_ok());
        let response = result.unwrap();
        assert_eq!(response.body.as_ref(), &[1, 2, 3, 4]);
        assert_eq!(response.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockHttpClient {
            response: Err(HttpError::Transport("Connection refused".to_string())),
        };

        let result = mock.get("http://example.com").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_scripted_client_sequences() {
        let mock = ScriptedHttpClient::new();
        mock.script(
            "http://example.com/a",
            vec![
                Err(HttpError::Timeout {
                    url: "http://example.com/a".to_string(),
                }),
                Ok(HttpResponse {
                    content_type: Some("image/png".to_string()),
                    body: Bytes::from_static(&[9, 9]),
                }),
            ],
        );

        assert!(mock.get("http://example.com/a").await.is_err());
        assert!(mock.get("http://example.com/a").await.is_ok());
        // Last response repeats once the script is exhausted.
        assert!(mock.get("http://example.com/a").await.is_ok());
        assert_eq!(mock.hits("http://example.com/a"), 3);
    }

    #[tokio::test]
    async fn test_scripted_client_unknown_url_is_404() {
        let mock = ScriptedHttpClient::new();
        let result = mock.get("http://example.com/missing").await;
        match result {
            Err(HttpError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected 404 status error, got {:?}", other),
        }
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::new().is_ok());
        assert!(ReqwestClient::with_timeout(Duration::from_secs(5)).is_ok());
    }
}
