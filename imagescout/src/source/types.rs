//! Source trait and error type.

use thiserror::Error;

use crate::http::{BoxFuture, HttpError};
use crate::query::ProductQuery;

/// Errors a source can report for one search.
///
/// Source errors never abort an acquisition; the orchestrator treats a
/// failed source as having contributed zero results.
#[derive(Debug, Error, Clone)]
pub enum SourceError {
    /// The search request exceeded its time budget.
    #[error("search timed out")]
    Timeout,

    /// The underlying HTTP request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response arrived but could not be interpreted.
    #[error("failed to parse results: {0}")]
    Parse(String),
}

/// An external system that can be queried for candidate image URLs.
///
/// Implementations must be `Send + Sync`; the orchestrator queries all
/// registered sources concurrently. The trait is dyn-compatible via
/// [`BoxFuture`] so registries can hold `Arc<dyn ImageSource>`.
///
/// # Contract
///
/// - An empty result list is success, not an error.
/// - Each adapter applies its own URL-plausibility filter before yielding;
///   the pipeline only re-validates candidates at the byte level.
/// - `search` must be restartable: calling it again re-runs the query.
pub trait ImageSource: Send + Sync {
    /// Stable tag identifying this source ("google", "bing", ...).
    ///
    /// The tag becomes the `source` field of every candidate the source
    /// yields, so it must be unique within a registry.
    fn name(&self) -> &str;

    /// Prior confidence in this source's results, in [0, 1].
    ///
    /// Used to order sources when building a default registry; it is not
    /// part of the per-image quality score.
    fn confidence(&self) -> f64;

    /// Whether this source fabricates placeholder results rather than
    /// finding genuine product images. Fallback sources never count
    /// toward the minimum-sources invariant.
    fn is_fallback(&self) -> bool {
        false
    }

    /// Searches for candidate image URLs for the given product.
    fn search<'a>(
        &'a self,
        query: &'a ProductQuery,
    ) -> BoxFuture<'a, Result<Vec<String>, SourceError>>;
}
