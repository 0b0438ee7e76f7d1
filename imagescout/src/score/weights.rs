//! Scoring weights and band boundaries.
//!
//! The numeric values are heuristic tuning defaults carried over from
//! production use; tests assert ordering properties rather than exact
//! constants, so retuning them is safe.

/// Shorter-side minimum for the ideal resolution band.
pub const IDEAL_MIN_SHORT: u32 = 400;
/// Longer-side maximum for the ideal resolution band.
pub const IDEAL_MAX_LONG: u32 = 1200;
/// Shorter-side minimum for the acceptable resolution band.
pub const GOOD_MIN_SHORT: u32 = 200;
/// Longer-side maximum for the acceptable resolution band.
pub const GOOD_MAX_LONG: u32 = 2000;
/// Shorter-side floor below which resolution contributes nothing.
pub const MIN_SHORT: u32 = 100;

/// Aspect ratio (long:short) treated as square-ish.
pub const IDEAL_ASPECT: f64 = 1.5;
/// Aspect ratio beyond which the aspect contribution drops to zero.
pub const GOOD_ASPECT: f64 = 2.0;

/// Ideal byte-size band: 10 KB – 500 KB.
pub const IDEAL_BYTES: std::ops::RangeInclusive<u64> = 10_000..=500_000;
/// Acceptable byte-size band: 5 KB – 1 MB.
pub const GOOD_BYTES: std::ops::RangeInclusive<u64> = 5_000..=1_000_000;

/// Weights of the four scoring criteria. They sum to 1.0 so the overall
/// score lands in [0, 1] without rescaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Weight of the resolution band criterion.
    pub resolution: f64,
    /// Weight of the aspect ratio criterion.
    pub aspect: f64,
    /// Weight of the byte-size band criterion.
    pub byte_size: f64,
    /// Weight of the encoding format criterion.
    pub format: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            resolution: 0.4,
            aspect: 0.2,
            byte_size: 0.2,
            format: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoreWeights::default();
        let sum = w.resolution + w.aspect + w.byte_size + w.format;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
