//! ImageScout - multi-source product image acquisition.
//!
//! ImageScout finds a representative image for a named product by
//! querying several independent, unreliable external image sources in
//! parallel, merging and deduplicating their results, scoring candidates
//! for fitness, and downloading the best one to local storage with
//! verification and retry.
//!
//! # Pipeline
//!
//! ```text
//! AcquisitionOrchestrator
//!     │
//!     ├── SourceRegistry ── ImageSource (google, bing, wikipedia, ...)
//!     ├── merge (deduplication)
//!     ├── MetadataProber + quality_score
//!     ├── rank (selection)
//!     └── ImageDownloader ── ImageStore (DiskStore)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use imagescout::{AcquireConfig, AcquisitionOrchestrator, ProductQuery};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = AcquireConfig::default().with_download(true);
//! let orchestrator = AcquisitionOrchestrator::with_defaults("product_images", config)?;
//!
//! let query = ProductQuery::new("Surf Excel 1kg", "Unilever")?;
//! let result = orchestrator.acquire(&query, None, &CancellationToken::new()).await;
//! println!("{}", result);
//! ```

pub mod acquire;
pub mod candidate;
pub mod download;
pub mod http;
pub mod logging;
pub mod merge;
pub mod query;
pub mod score;
pub mod select;
pub mod source;
pub mod store;

pub use acquire::{AcquireConfig, AcquireError, AcquisitionOrchestrator, AcquisitionResult};
pub use candidate::{Candidate, ImageFormat, ScoredCandidate};
pub use download::{ImageDownloader, RetryPolicy};
pub use http::{AsyncHttpClient, ReqwestClient};
pub use query::ProductQuery;
pub use score::{quality_score, MetadataProber, ScoreWeights};
pub use select::rank;
pub use source::{FallbackSource, ImageSource, SourceRegistry};
pub use store::{DiskStore, ImageStore};
