//! Candidate image types flowing through the acquisition pipeline.
//!
//! A [`Candidate`] is one discovered URL plus its provenance; the
//! [`crate::score`] stage extends it into a [`ScoredCandidate`] exactly
//! once, after which it is treated as immutable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Encoding format of a candidate image, as decoded from its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
    /// Decodable but none of the formats the scorer distinguishes.
    #[default]
    Other,
}

impl ImageFormat {
    /// Maps a decoded `image` crate format onto the pipeline's enum.
    pub fn from_decoded(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => Self::Jpeg,
            image::ImageFormat::Png => Self::Png,
            image::ImageFormat::WebP => Self::Webp,
            image::ImageFormat::Gif => Self::Gif,
            _ => Self::Other,
        }
    }

    /// Relative quality factor of the format, multiplied into the format
    /// weight when scoring. JPEG is the preferred delivery format for
    /// product photos; GIF and unrecognized formats rank lowest.
    pub fn quality_factor(&self) -> f64 {
        match self {
            Self::Jpeg => 1.0,
            Self::Png => 0.9,
            Self::Webp => 0.75,
            Self::Gif => 0.25,
            Self::Other => 0.25,
        }
    }

    /// Filename extension used when persisting an image of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Other => "img",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// One discovered image URL plus its provenance.
///
/// Identity key is the URL, compared case-sensitively. `discovery_order`
/// is assigned by the merge stage and is unique across one acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub url: String,
    /// Name of the source that yielded this URL.
    pub source: String,
    #[serde(rename = "discoveryOrder")]
    pub discovery_order: usize,
}

impl Candidate {
    pub fn new(url: impl Into<String>, source: impl Into<String>, discovery_order: usize) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
            discovery_order,
        }
    }
}

/// Image metadata obtained by probing a candidate URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
    pub format: Option<ImageFormat>,
}

/// A candidate extended with probed metadata and its quality score.
///
/// When the metadata fetch fails, dimensions and size are zero, `format`
/// is `None`, the score is 0.0, and `fetch_error` records why. Such a
/// candidate still participates in ranking (it sorts after any scored
/// success) and remains eligible for download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
    pub format: Option<ImageFormat>,
    pub score: f64,
    pub fetch_error: Option<String>,
}

impl ScoredCandidate {
    /// A candidate whose probe succeeded.
    pub fn scored(candidate: Candidate, metadata: ImageMetadata, score: f64) -> Self {
        Self {
            candidate,
            width: metadata.width,
            height: metadata.height,
            byte_size: metadata.byte_size,
            format: metadata.format,
            score,
            fetch_error: None,
        }
    }

    /// A candidate whose metadata fetch or decode failed.
    pub fn failed(candidate: Candidate, error: impl Into<String>) -> Self {
        Self {
            candidate,
            width: 0,
            height: 0,
            byte_size: 0,
            format: None,
            score: 0.0,
            fetch_error: Some(error.into()),
        }
    }

    pub fn url(&self) -> &str {
        &self.candidate.url
    }

    pub fn source(&self) -> &str {
        &self.candidate.source
    }

    pub fn discovery_order(&self) -> usize {
        self.candidate.discovery_order
    }
}
