use serde::{Deserialize, Serialize};

/// One accepted product listing from one site.
///
/// `price` keeps the site's display text (`"৳ 1,234.50"`), `numeric_price`
/// is the parsed sort key. A `ProductResult` only exists for candidates
/// whose price text parsed to a finite number, so `numeric_price` is never
/// NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResult {
    /// Name of the owning [`crate::SiteProfile`].
    pub site: String,
    pub product_title: String,
    /// Price exactly as displayed on the page.
    pub price: String,
    pub numeric_price: f64,
    /// Absolute product URL, or empty when the title element had no link.
    pub url: String,
    pub image_url: Option<String>,
    pub logo_url: String,
}

/// Merged, price-ascending answer for one query across all sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    /// The original query, verbatim.
    pub product_name: String,
    pub results: Vec<ProductResult>,
}
