//! Candidate merging and deduplication.
//!
//! Merges the per-source URL lists into one ordered, URL-unique candidate
//! list. Pure function, no I/O; deterministic for identical inputs.

use std::collections::HashSet;

use crate::candidate::Candidate;

/// Merges per-source URL lists into a deduplicated candidate list.
///
/// Lists are walked in the order given (source priority order);
/// `discovery_order` increases monotonically across the whole merge, and
/// a URL seen under an earlier discovery order wins — later duplicates
/// are dropped along with their source attribution.
pub fn merge(lists: &[(String, Vec<String>)]) -> Vec<Candidate> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut candidates = Vec::new();
    let mut discovery_order = 0;

    for (source, urls) in lists {
        for url in urls {
            if seen.insert(url.as_str()) {
                candidates.push(Candidate::new(url.clone(), source.clone(), discovery_order));
                discovery_order += 1;
            }
        }
    }

    candidates
}
