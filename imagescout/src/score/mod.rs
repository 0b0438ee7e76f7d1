//! Candidate quality scoring.
//!
//! Two halves: a pure scoring function over image metadata
//! ([`quality_score`]) and a network-bound prober ([`MetadataProber`])
//! that fetches candidate bytes to obtain that metadata. The split keeps
//! the scoring function independently unit-testable.

mod prober;
mod scoring;
mod weights;

pub use prober::MetadataProber;
pub use scoring::quality_score;
pub use weights::ScoreWeights;
