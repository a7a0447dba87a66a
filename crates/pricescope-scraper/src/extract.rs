//! Reduces a rendered results page to raw product candidates.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use pricescope_core::SiteProfile;

use crate::error::ScraperError;
use crate::fetch::RenderedPage;

/// An unvalidated record carved out of one results page, before price
/// parsing and relevance filtering. Owned by the extraction pass that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub title: String,
    /// Absolute product URL, or empty when the title element has no href.
    pub link: String,
    /// Price text as displayed; `"N/A"` when no price element lined up.
    pub raw_price_text: String,
    pub image_url: Option<String>,
}

/// Extracts raw candidates from a rendered page using the profile's three
/// selectors.
///
/// The selector lists are queried independently over the same document and
/// paired by match-list index: title *i* goes with price *i* and image *i*.
/// This positional zip is a structural assumption about each site's markup,
/// not a DOM-containment join; it holds only while the site emits those
/// nodes in matching per-product order. A missing price or image at index
/// *i* degrades that candidate to `"N/A"` / no image instead of dropping it.
///
/// Candidates are fully materialized (owned strings) so nothing borrows
/// from the document after this returns.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] when a profile selector fails to
/// parse as a CSS selector.
pub fn extract(
    page: &RenderedPage,
    profile: &SiteProfile,
) -> Result<Vec<RawCandidate>, ScraperError> {
    let title_selector = parse_selector(&profile.title_selector, profile)?;
    let price_selector = parse_selector(&profile.price_selector, profile)?;
    let image_selector = parse_selector(&profile.image_selector, profile)?;

    let document = Html::parse_document(&page.html);
    let base_url = Url::parse(&page.url).ok();

    let titles: Vec<ElementRef<'_>> = document.select(&title_selector).collect();
    let prices: Vec<ElementRef<'_>> = document.select(&price_selector).collect();
    let images: Vec<ElementRef<'_>> = document.select(&image_selector).collect();

    let candidates = titles
        .iter()
        .enumerate()
        .map(|(index, title_el)| {
            let title = element_text(title_el);
            let link = title_el
                .value()
                .attr("href")
                .map(|href| resolve(base_url.as_ref(), href))
                .unwrap_or_default();
            let raw_price_text = prices
                .get(index)
                .map(element_text)
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| "N/A".to_string());
            let image_url = images
                .get(index)
                .and_then(|el| el.value().attr("src"))
                .map(|src| resolve(base_url.as_ref(), src));

            RawCandidate {
                title,
                link,
                raw_price_text,
                image_url,
            }
        })
        .collect();

    Ok(candidates)
}

fn parse_selector(raw: &str, profile: &SiteProfile) -> Result<Selector, ScraperError> {
    Selector::parse(raw).map_err(|e| ScraperError::Selector {
        site: profile.name.clone(),
        selector: raw.to_string(),
        reason: e.to_string(),
    })
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves an href/src to an absolute URL against the page URL. Already
/// absolute values pass through; unresolvable values are returned as-is.
fn resolve(base: Option<&Url>, href: &str) -> String {
    if let Ok(absolute) = Url::parse(href) {
        return absolute.to_string();
    }
    base.and_then(|b| b.join(href).ok())
        .map_or_else(|| href.to_string(), |joined| joined.to_string())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
