//! Per-site scrape pipeline: fetch, extract, normalize, collect.

use pricescope_core::{ProductResult, SiteProfile};

use crate::error::ScraperError;
use crate::extract::extract;
use crate::fetch::{PageFetcher, ResourceBlockPolicy};
use crate::normalize::normalize;

/// Scrapes one site for one query. Never fails: any fetch, render, or
/// selector error is logged with the site name and absorbed into an empty
/// result, so one broken or slow site cannot take down the request. The
/// rendering context is released inside `fetcher.fetch` before extraction
/// starts.
pub async fn scrape_site(
    fetcher: &dyn PageFetcher,
    profile: &SiteProfile,
    policy: &ResourceBlockPolicy,
    query: &str,
) -> Vec<ProductResult> {
    match try_scrape_site(fetcher, profile, policy, query).await {
        Ok(results) => results,
        Err(error) => {
            tracing::warn!(
                site = %profile.name,
                %error,
                "site scrape failed, contributing no results"
            );
            Vec::new()
        }
    }
}

async fn try_scrape_site(
    fetcher: &dyn PageFetcher,
    profile: &SiteProfile,
    policy: &ResourceBlockPolicy,
    query: &str,
) -> Result<Vec<ProductResult>, ScraperError> {
    let url = profile.search_url(query);
    let page = fetcher.fetch(&url, policy).await?;
    let candidates = extract(&page, profile)?;
    let candidate_count = candidates.len();

    let results: Vec<ProductResult> = candidates
        .into_iter()
        .filter_map(|candidate| normalize(candidate, profile, query))
        .collect();

    tracing::debug!(
        site = %profile.name,
        candidates = candidate_count,
        accepted = results.len(),
        "site scrape finished"
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeFetcher;
    use crate::ResourceBlockPolicy;

    fn profile() -> SiteProfile {
        SiteProfile {
            name: "MockMart".to_string(),
            url_template: "https://mockmart.example/search?q=".to_string(),
            title_selector: ".name a".to_string(),
            price_selector: ".price".to_string(),
            image_selector: ".thumb img".to_string(),
            logo_url: "https://mockmart.example/logo.png".to_string(),
        }
    }

    const RESULTS_PAGE: &str = r#"
        <div class="item">
          <div class="name"><a href="/p/1">Smartphone X</a></div>
          <div class="price">$300</div>
          <div class="thumb"><img src="/img/1.jpg"></div>
        </div>
        <div class="item">
          <div class="name"><a href="/p/2">Phone Case</a></div>
          <div class="price">$10</div>
          <div class="thumb"><img src="/img/2.jpg"></div>
        </div>
        <div class="item">
          <div class="name"><a href="/p/3">Phone Charger</a></div>
          <div class="price">Out of stock</div>
          <div class="thumb"><img src="/img/3.jpg"></div>
        </div>
    "#;

    #[tokio::test]
    async fn scrape_site_filters_and_collects() {
        let fetcher = FakeFetcher::new().with_page("mockmart.example", RESULTS_PAGE);
        let results = scrape_site(
            &fetcher,
            &profile(),
            &ResourceBlockPolicy::default(),
            "phone",
        )
        .await;

        // The out-of-stock charger is dropped by price parsing.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].product_title, "Smartphone X");
        assert_eq!(results[0].site, "MockMart");
        assert_eq!(results[0].url, "https://mockmart.example/p/1");
        assert_eq!(results[1].product_title, "Phone Case");
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn scrape_site_builds_encoded_search_url() {
        let fetcher = FakeFetcher::new().with_page("q=phone%20case", RESULTS_PAGE);
        let results = scrape_site(
            &fetcher,
            &profile(),
            &ResourceBlockPolicy::default(),
            "phone case",
        )
        .await;
        assert!(!results.is_empty());
    }

    #[tokio::test]
    async fn scrape_site_absorbs_fetch_failure() {
        let fetcher = FakeFetcher::new().with_failure("mockmart.example");
        let results = scrape_site(
            &fetcher,
            &profile(),
            &ResourceBlockPolicy::default(),
            "phone",
        )
        .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn scrape_site_absorbs_selector_failure() {
        let mut bad_profile = profile();
        bad_profile.title_selector = "div[".to_string();
        let fetcher = FakeFetcher::new().with_page("mockmart.example", RESULTS_PAGE);
        let results = scrape_site(
            &fetcher,
            &bad_profile,
            &ResourceBlockPolicy::default(),
            "phone",
        )
        .await;
        assert!(results.is_empty());
    }
}
