//! URL plausibility heuristics shared by the source adapters.
//!
//! These are cheap textual checks applied before a URL is yielded as a
//! candidate; actual image validity is only established downstream when
//! bytes are fetched.

/// Extensions that mark a URL as an image resource.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif", ".bmp"];

/// Path fragments that suggest an image resource even without an extension.
const IMAGE_PATTERNS: &[&str] = &[
    "image",
    "photo",
    "picture",
    "/img/",
    "/images/",
    "thumbnail",
    "product",
];

/// Fragments that mark page chrome rather than product imagery.
const EXCLUDE_PATTERNS: &[&str] = &["logo", "icon", "sprite", "button", "banner", "ad", "tracking"];

/// Returns true if the URL plausibly points at a product image.
///
/// A URL passes when it carries an image extension or an image-suggesting
/// path fragment, and none of the chrome/tracking fragments.
pub fn is_plausible_image_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    let lower = url.to_lowercase();

    let has_extension = IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext));
    let has_pattern = IMAGE_PATTERNS.iter().any(|p| lower.contains(p));
    let is_excluded = EXCLUDE_PATTERNS.iter().any(|p| lower.contains(p));

    (has_extension || has_pattern) && !is_excluded
}

/// Deduplicates URLs in place of their first occurrence, preserving order.
pub(super) fn dedupe_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}
