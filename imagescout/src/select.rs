//! Candidate ranking.
//!
//! Orders scored candidates for download: best first, the rest retained
//! as the fallback order.

use std::cmp::Ordering;

use crate::candidate::ScoredCandidate;

/// Ranks candidates descending by score, ties broken ascending by
/// discovery order. Stable, so equal keys keep their relative order.
///
/// The head of the returned list is the chosen candidate; the whole list
/// is the downloader's fallback order.
pub fn rank(mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.discovery_order().cmp(&b.discovery_order()))
    });
    candidates
}
