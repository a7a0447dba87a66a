//! Price normalization and relevance filtering.
//!
//! This is the dominant filter in the pipeline: most discarded candidates
//! die here because their "price" cell held promotional or stock text
//! rather than a number.

use pricescope_core::{ProductResult, SiteProfile};

use crate::extract::RawCandidate;

/// Parses displayed price text into a numeric sort key.
///
/// Strips every character that is not an ASCII digit or a decimal point,
/// then parses the remainder as `f64`. Returns `None` when nothing numeric
/// remains ("Out of stock", "Call for price") or the remainder is not a
/// single well-formed number (`"1.234.50"` rejects).
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|price| price.is_finite())
}

/// Validates one candidate against the query and converts it into a
/// [`ProductResult`] stamped with the owning profile's name and logo.
///
/// Rejects candidates whose price text does not parse, and candidates whose
/// title does not contain the query as a case-insensitive substring (a
/// deliberately loose match: "phone" accepts "Smartphone Case"). Pure with
/// respect to its inputs; rejection is `None`, never an error.
#[must_use]
pub fn normalize(
    candidate: RawCandidate,
    profile: &SiteProfile,
    query: &str,
) -> Option<ProductResult> {
    let numeric_price = parse_price(&candidate.raw_price_text)?;

    if !candidate
        .title
        .to_lowercase()
        .contains(&query.to_lowercase())
    {
        return None;
    }

    Some(ProductResult {
        site: profile.name.clone(),
        product_title: candidate.title,
        price: candidate.raw_price_text,
        numeric_price,
        url: candidate.link,
        image_url: candidate.image_url,
        logo_url: profile.logo_url.clone(),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
