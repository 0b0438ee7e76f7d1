//! Storage key naming for acquired images.
//!
//! Single source of truth for how a product identity becomes a filename
//! stem. The downloader appends the extension of the decoded format.

/// Derives a filename stem from a product name and optional product id.
///
/// The name is lowercased and reduced to alphanumerics and underscores;
/// the product id, when given, keeps keys collision-safe across products
/// that share a display name.
///
/// # Examples
///
/// ```
/// use imagescout::store::file_stem;
///
/// assert_eq!(file_stem("Surf Excel 1kg", None), "surf_excel_1kg");
/// assert_eq!(file_stem("Lux Soap!", Some("P42")), "lux_soap_P42");
/// ```
pub fn file_stem(product_name: &str, product_id: Option<&str>) -> String {
    let cleaned: String = product_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let slug = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();

    match product_id {
        Some(id) => format!("{}_{}", slug, id),
        None => slug,
    }
}
