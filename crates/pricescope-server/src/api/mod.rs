mod search;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use pricescope_core::ProfileRegistry;
use pricescope_scraper::{PageFetcher, ResourceBlockPolicy};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ProfileRegistry>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub policy: ResourceBlockPolicy,
    pub max_concurrent_scrapes: usize,
}

/// Error body shape the frontend expects: a single `error` string.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: &'static str,
}

impl ApiError {
    pub(super) fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message,
        }
    }

    pub(super) fn internal(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

/// Builds the application router. Cross-origin access is limited to the
/// single configured frontend origin.
pub fn build_app(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/search", post(search::search))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
