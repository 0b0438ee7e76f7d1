//! Acquisition pipeline stages.

use std::fmt;

/// The stage an acquisition is currently in.
///
/// Stages advance strictly forward; cancellation is honored at every
/// stage boundary. `Downloading` is skipped in search-only mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionStage {
    /// Querying all registered sources concurrently.
    Searching,
    /// Verifying enough sources returned results.
    MinSourcesCheck,
    /// Merging per-source URL lists into unique candidates.
    Deduplicating,
    /// Probing candidate metadata and scoring.
    Scoring,
    /// Ranking candidates.
    Selecting,
    /// Fetching and persisting the best candidate.
    Downloading,
    /// Terminal stage.
    Done,
}

impl fmt::Display for AcquisitionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Searching => "searching",
            Self::MinSourcesCheck => "min-sources-check",
            Self::Deduplicating => "deduplicating",
            Self::Scoring => "scoring",
            Self::Selecting => "selecting",
            Self::Downloading => "downloading",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}
