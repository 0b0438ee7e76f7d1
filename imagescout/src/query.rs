//! Product query describing what to search for.

use thiserror::Error;

/// Errors produced when constructing a [`ProductQuery`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The product name was empty or whitespace-only.
    #[error("product name must not be empty")]
    EmptyProductName,
}

/// A product to find an image for.
///
/// The brand is optional context that improves search accuracy; sources
/// fold it into their own query strings as they see fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    product_name: String,
    brand_name: String,
}

impl ProductQuery {
    /// Creates a query for the given product and optional brand.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyProductName`] if the product name is
    /// empty after trimming.
    pub fn new(
        product_name: impl Into<String>,
        brand_name: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let product_name = product_name.into();
        if product_name.trim().is_empty() {
            return Err(QueryError::EmptyProductName);
        }
        Ok(Self {
            product_name,
            brand_name: brand_name.into(),
        })
    }

    /// The product name.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// The brand name, possibly empty.
    pub fn brand_name(&self) -> &str {
        &self.brand_name
    }

    /// Builds a search term of the form `"{brand} {product} {suffix}"`,
    /// collapsing whichever parts are absent.
    pub fn search_term(&self, suffix: &str) -> String {
        let mut term = String::new();
        if !self.brand_name.trim().is_empty() {
            term.push_str(self.brand_name.trim());
            term.push(' ');
        }
        term.push_str(self.product_name.trim());
        if !suffix.is_empty() {
            term.push(' ');
            term.push_str(suffix);
        }
        term
    }
}
