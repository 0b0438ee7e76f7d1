//! Pure quality scoring function.

use crate::candidate::ImageFormat;

use super::weights::{
    ScoreWeights, GOOD_ASPECT, GOOD_BYTES, GOOD_MAX_LONG, GOOD_MIN_SHORT, IDEAL_ASPECT,
    IDEAL_BYTES, IDEAL_MAX_LONG, IDEAL_MIN_SHORT, MIN_SHORT,
};

/// Computes a deterministic quality score in [0, 1] from image metadata.
///
/// Four criteria contribute, weighted by [`ScoreWeights`]:
/// - resolution band (square-ish product-photo sizes preferred),
/// - aspect ratio (long:short),
/// - encoded byte size,
/// - encoding format.
///
/// `format` is `None` when the image's metadata could not be obtained; an
/// unknown-but-present format still earns its (low) format factor, while
/// an absent one earns nothing, so an unreadable candidate scores 0.0.
pub fn quality_score(
    width: u32,
    height: u32,
    byte_size: u64,
    format: Option<ImageFormat>,
    weights: &ScoreWeights,
) -> f64 {
    let mut score = 0.0;

    let short = width.min(height);
    let long = width.max(height);

    if short >= IDEAL_MIN_SHORT && long <= IDEAL_MAX_LONG {
        score += weights.resolution;
    } else if short >= GOOD_MIN_SHORT && long <= GOOD_MAX_LONG {
        score += weights.resolution * 0.75;
    } else if short >= MIN_SHORT {
        score += weights.resolution * 0.375;
    }

    if short > 0 {
        let aspect = long as f64 / short as f64;
        if aspect <= IDEAL_ASPECT {
            score += weights.aspect;
        } else if aspect <= GOOD_ASPECT {
            score += weights.aspect * 0.5;
        }
    }

    if IDEAL_BYTES.contains(&byte_size) {
        score += weights.byte_size;
    } else if GOOD_BYTES.contains(&byte_size) {
        score += weights.byte_size * 0.5;
    }

    if let Some(format) = format {
        score += weights.format * format.quality_factor();
    }

    score.clamp(0.0, 1.0)
}
