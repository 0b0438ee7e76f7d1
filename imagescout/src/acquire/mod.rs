//! Acquisition orchestration.
//!
//! This module coordinates one request/response cycle through the
//! pipeline stages:
//!
//! ```text
//! Searching → MinSourcesCheck → Deduplicating → Scoring → Selecting
//!           → Downloading (optional) → Done
//! ```
//!
//! Source queries fan out concurrently with a per-source timeout; the
//! orchestrator joins them, enforces the minimum-sources invariant, and
//! produces one immutable [`AcquisitionResult`].

mod config;
mod error;
mod orchestrator;
mod result;
mod stage;

pub use config::AcquireConfig;
pub use error::AcquireError;
pub use orchestrator::AcquisitionOrchestrator;
pub use result::AcquisitionResult;
pub use stage::AcquisitionStage;
