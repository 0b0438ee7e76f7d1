//! Verified image download with retry and ranked fallback.
//!
//! The [`ImageDownloader`] walks a ranked candidate list strictly in
//! order, retrying each candidate under one parametrized [`RetryPolicy`]
//! before advancing to the next. Every accepted image is byte-validated
//! before it is persisted through the storage boundary.

mod downloader;
mod policy;

pub use downloader::{AttemptError, DownloadError, DownloadOutcome, ImageDownloader};
pub use policy::RetryPolicy;
