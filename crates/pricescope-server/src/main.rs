mod api;

use std::sync::Arc;

use axum::http::HeaderValue;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use pricescope_scraper::{ChromeFetcher, ResourceBlockPolicy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pricescope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = Arc::new(pricescope_core::ProfileRegistry::load(&config.sites_path)?);
    tracing::info!(
        sites = registry.len(),
        path = %config.sites_path.display(),
        "loaded site registry"
    );

    let fetcher = Arc::new(ChromeFetcher::new(
        config.fetch_timeout_secs,
        &config.user_agent,
    ));
    let cors_origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| anyhow::anyhow!("invalid CORS origin \"{}\": {e}", config.cors_origin))?;

    let state = AppState {
        registry,
        fetcher,
        policy: ResourceBlockPolicy::from_app_config(&config),
        max_concurrent_scrapes: config.max_concurrent_scrapes,
    };
    let app = build_app(state, cors_origin);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
