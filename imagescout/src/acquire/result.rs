//! Acquisition result type.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::candidate::ScoredCandidate;
use crate::query::ProductQuery;

/// Immutable outcome of one acquisition call.
///
/// Serializes to a structured record with camelCase field names for
/// machine consumption; the `Display` impl renders the same data as a
/// human-readable summary. Both are derived views, computed from the
/// same fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionResult {
    pub success: bool,
    pub product_name: String,
    pub brand_name: String,
    /// All scored candidates in ranked (download fallback) order.
    pub ranked_candidates: Vec<ScoredCandidate>,
    /// The winning candidate, when one exists.
    pub chosen: Option<ScoredCandidate>,
    /// Where the image landed, only when a download succeeded.
    pub local_path: Option<PathBuf>,
    /// Genuine sources that returned at least one result.
    pub sources_searched: BTreeSet<String>,
    pub error: Option<String>,
}

impl AcquisitionResult {
    /// A failed acquisition carrying whatever was gathered before the
    /// fatal error.
    pub fn failure(
        query: &ProductQuery,
        sources_searched: BTreeSet<String>,
        ranked_candidates: Vec<ScoredCandidate>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            product_name: query.product_name().to_string(),
            brand_name: query.brand_name().to_string(),
            ranked_candidates,
            chosen: None,
            local_path: None,
            sources_searched,
            error: Some(error.into()),
        }
    }

    /// A successful acquisition.
    pub fn success(
        query: &ProductQuery,
        sources_searched: BTreeSet<String>,
        ranked_candidates: Vec<ScoredCandidate>,
        chosen: Option<ScoredCandidate>,
        local_path: Option<PathBuf>,
    ) -> Self {
        Self {
            success: true,
            product_name: query.product_name().to_string(),
            brand_name: query.brand_name().to_string(),
            ranked_candidates,
            chosen,
            local_path,
            sources_searched,
            error: None,
        }
    }
}

impl fmt::Display for AcquisitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Product: {}", self.product_name)?;
        let brand = if self.brand_name.is_empty() {
            "N/A"
        } else {
            self.brand_name.as_str()
        };
        writeln!(f, "Brand: {}", brand)?;
        writeln!(f, "Success: {}", self.success)?;

        let sources: Vec<&str> = self.sources_searched.iter().map(|s| s.as_str()).collect();
        writeln!(f, "Sources searched: {}", sources.join(", "))?;
        writeln!(f, "Candidates ranked: {}", self.ranked_candidates.len())?;

        if let Some(chosen) = &self.chosen {
            writeln!(f, "Best image:")?;
            writeln!(f, "  URL: {}", chosen.url())?;
            writeln!(f, "  Source: {}", chosen.source())?;
            writeln!(f, "  Score: {:.2}", chosen.score)?;
            writeln!(f, "  Dimensions: {}x{}", chosen.width, chosen.height)?;
            if let Some(format) = chosen.format {
                writeln!(f, "  Format: {}", format)?;
            }
        }

        if let Some(path) = &self.local_path {
            writeln!(f, "Downloaded to: {}", path.display())?;
        }

        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }

        Ok(())
    }
}
