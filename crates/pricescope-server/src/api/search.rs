use axum::{extract::State, Json};
use serde::Deserialize;

use pricescope_core::AggregateResponse;
use pricescope_scraper::aggregate;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchRequest {
    #[serde(default)]
    product_name: Option<String>,
}

/// `POST /search`: aggregate price listings for one query.
///
/// A missing or blank `productName` is rejected before any scraping starts.
/// The aggregation itself runs in a spawned task: per-site failures are
/// already absorbed below this boundary, so the only way the task can go
/// down is an unexpected panic, which surfaces here as a join error and a
/// generic 500 instead of tearing down the server.
pub(super) async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let query = request.product_name.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::bad_request("Product name is required"));
    }

    tracing::info!(%query, sites = state.registry.len(), "search request");

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        aggregate(
            task_state.fetcher.as_ref(),
            &task_state.registry,
            &task_state.policy,
            task_state.max_concurrent_scrapes,
            &query,
        )
        .await
    });

    match task.await {
        Ok(response) => Ok(Json(response)),
        Err(error) => {
            tracing::error!(%error, "aggregation task failed");
            Err(ApiError::internal("Failed to scrape product data"))
        }
    }
}
