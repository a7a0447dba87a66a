//! Fan-out/fan-in across the site registry.

use futures::stream::{self, StreamExt};

use pricescope_core::{AggregateResponse, ProductResult, ProfileRegistry, SiteProfile};

use crate::fetch::{PageFetcher, ResourceBlockPolicy};
use crate::scrape::scrape_site;

/// Scrapes one site, tagging the results with its registry `index` so the
/// fan-in can restore registry order. Named (rather than a closure) so the
/// compiler elaborates its higher-ranked lifetimes explicitly, which keeps
/// the aggregated future usable from `tokio::spawn`.
async fn scrape_indexed(
    fetcher: &dyn PageFetcher,
    index: usize,
    profile: &SiteProfile,
    policy: &ResourceBlockPolicy,
    query: &str,
) -> (usize, Vec<ProductResult>) {
    (index, scrape_site(fetcher, profile, policy, query).await)
}

/// Runs the site scraper for every registry profile and merges the results
/// into one price-ascending response.
///
/// Scrapes run concurrently, at most `max_concurrent` at a time (each one
/// holds a rendering context, which is memory-heavy). Completion order is
/// nondeterministic, so per-site results are first put back into registry
/// order and then stable-sorted by `numeric_price`; equal prices keep
/// registry order, then DOM order within a site. Per-site failures were
/// already absorbed by [`scrape_site`], so this cannot fail and an empty
/// result list is a valid outcome.
pub async fn aggregate(
    fetcher: &dyn PageFetcher,
    registry: &ProfileRegistry,
    policy: &ResourceBlockPolicy,
    max_concurrent: usize,
    query: &str,
) -> AggregateResponse {
    let max_concurrent = max_concurrent.max(1);

    let profiles = registry.profiles();
    let mut per_site: Vec<(usize, Vec<ProductResult>)> = stream::iter(0..profiles.len())
        .map(|index| scrape_indexed(fetcher, index, &profiles[index], policy, query))
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    per_site.sort_by_key(|(index, _)| *index);

    let mut results: Vec<ProductResult> = per_site
        .into_iter()
        .flat_map(|(_, site_results)| site_results)
        .collect();

    // `numeric_price` is finite by construction, so total_cmp matches the
    // naive ordering; the sort is stable, preserving the tie-break order
    // established above.
    results.sort_by(|a, b| a.numeric_price.total_cmp(&b.numeric_price));

    tracing::debug!(
        query,
        sites = registry.len(),
        results = results.len(),
        "aggregation finished"
    );

    AggregateResponse {
        product_name: query.to_string(),
        results,
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
