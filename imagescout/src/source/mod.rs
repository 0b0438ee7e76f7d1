//! Image source abstraction.
//!
//! This module provides the [`ImageSource`] trait and adapters for the
//! external systems the pipeline queries for candidate URLs (image search
//! engines, Wikipedia, marketplace listings, and an explicit low-confidence
//! placeholder generator).
//!
//! # Registration
//!
//! Sources are registered on a [`SourceRegistry`] in priority order; the
//! orchestrator consumes the registry and never hard-codes a source. Adding
//! a source means implementing the trait and registering it.

mod bing;
mod fallback;
mod filter;
mod google;
mod marketplace;
mod registry;
mod types;
mod wiki;

pub use bing::BingImagesSource;
pub use fallback::FallbackSource;
pub use filter::is_plausible_image_url;
pub use google::GoogleImagesSource;
pub use marketplace::MarketplaceSource;
pub use registry::SourceRegistry;
pub use types::{ImageSource, SourceError};
pub use wiki::WikipediaSource;
