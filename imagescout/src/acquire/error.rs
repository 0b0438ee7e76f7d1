//! Fatal acquisition errors.
//!
//! Per-source failures, per-candidate probe failures, and per-attempt
//! download failures are all absorbed inside the pipeline; only these
//! variants surface as a failed [`crate::acquire::AcquisitionResult`].

use thiserror::Error;

/// Errors that fail an acquisition as a whole.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// Fewer sources returned results than the configured minimum.
    #[error("insufficient sources")]
    InsufficientSources { searched: usize, required: usize },

    /// Every source came back empty; nothing survived the merge.
    #[error("no images found from any source")]
    NoCandidates,

    /// Download mode was requested and every ranked candidate exhausted
    /// its attempts.
    #[error("all candidates exhausted")]
    AllCandidatesExhausted,

    /// The caller cancelled the acquisition.
    #[error("acquisition cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_sources_message_is_stable() {
        // Machine consumers match on this exact string.
        let err = AcquireError::InsufficientSources {
            searched: 1,
            required: 2,
        };
        assert_eq!(err.to_string(), "insufficient sources");
    }
}
