//! Headless-Chrome implementation of [`PageFetcher`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::browser::tab::{RequestInterceptor, RequestPausedDecision};
use headless_chrome::browser::transport::{SessionId, Transport};
use headless_chrome::protocol::cdp::Fetch::events::RequestPausedEvent;
use headless_chrome::protocol::cdp::Fetch::{FailRequest, RequestPattern, RequestStage};
use headless_chrome::protocol::cdp::Network::{ErrorReason, ResourceType};
use headless_chrome::{Browser, LaunchOptions};

use crate::error::ScraperError;
use crate::fetch::{PageFetcher, RenderedPage, ResourceBlockPolicy};

/// Fetches pages through headless Chrome.
///
/// Every call launches a fresh browser, so no cookies, storage, or session
/// state carries over between queries. The browser is dropped when the call
/// returns, on success and failure alike. Navigation and content reads are
/// bounded by `timeout`.
pub struct ChromeFetcher {
    timeout: Duration,
    user_agent: String,
}

impl ChromeFetcher {
    #[must_use]
    pub fn new(timeout_secs: u64, user_agent: &str) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            user_agent: user_agent.to_string(),
        }
    }
}

#[async_trait]
impl PageFetcher for ChromeFetcher {
    async fn fetch(
        &self,
        url: &str,
        policy: &ResourceBlockPolicy,
    ) -> Result<RenderedPage, ScraperError> {
        let url = url.to_string();
        let policy = policy.clone();
        let timeout = self.timeout;
        let user_agent = self.user_agent.clone();

        // headless_chrome drives the browser over blocking channels; keep
        // that off the async worker threads.
        tokio::task::spawn_blocking(move || fetch_blocking(&url, &policy, timeout, &user_agent))
            .await
            .map_err(|e| ScraperError::Render {
                reason: e.to_string(),
            })?
    }
}

fn fetch_blocking(
    url: &str,
    policy: &ResourceBlockPolicy,
    timeout: Duration,
    user_agent: &str,
) -> Result<RenderedPage, ScraperError> {
    let fetch_err = |reason: String| ScraperError::Fetch {
        url: url.to_string(),
        reason,
    };

    let options = LaunchOptions::default_builder()
        .headless(true)
        .idle_browser_timeout(timeout)
        .build()
        .map_err(|e| fetch_err(e.to_string()))?;

    // Dropping `browser` closes the rendering context; every return path
    // below goes through that drop.
    let browser = Browser::new(options).map_err(|e| fetch_err(e.to_string()))?;
    let tab = browser.new_tab().map_err(|e| fetch_err(e.to_string()))?;
    tab.set_default_timeout(timeout);
    tab.set_user_agent(user_agent, None, None)
        .map_err(|e| fetch_err(e.to_string()))?;

    if policy.blocks_anything() {
        let patterns = [RequestPattern {
            url_pattern: Some("*".to_string()),
            resource_Type: None,
            request_stage: Some(RequestStage::Request),
        }];
        tab.enable_fetch(Some(&patterns), None)
            .map_err(|e| fetch_err(e.to_string()))?;
        tab.enable_request_interception(Arc::new(ResourceBlocker {
            policy: policy.clone(),
        }))
        .map_err(|e| fetch_err(e.to_string()))?;
    }

    tab.navigate_to(url).map_err(|e| fetch_err(e.to_string()))?;
    tab.wait_until_navigated()
        .map_err(|e| fetch_err(e.to_string()))?;

    let html = tab.get_content().map_err(|e| fetch_err(e.to_string()))?;
    let final_url = tab.get_url();

    Ok(RenderedPage {
        html,
        url: final_url,
    })
}

/// Fails paused requests whose resource type the policy blocks and lets
/// everything else continue untouched.
struct ResourceBlocker {
    policy: ResourceBlockPolicy,
}

impl RequestInterceptor for ResourceBlocker {
    fn intercept(
        &self,
        _transport: Arc<Transport>,
        _session_id: SessionId,
        event: RequestPausedEvent,
    ) -> RequestPausedDecision {
        let blocked = match event.params.resource_Type {
            ResourceType::Font => self.policy.block_fonts,
            ResourceType::Image => self.policy.block_images,
            ResourceType::Stylesheet => self.policy.block_stylesheets,
            _ => false,
        };

        if blocked {
            RequestPausedDecision::Fail(FailRequest {
                request_id: event.params.request_id,
                error_reason: ErrorReason::BlockedByClient,
            })
        } else {
            RequestPausedDecision::Continue(None)
        }
    }
}
