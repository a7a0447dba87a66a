//! Canned-page fetcher for exercising the pipeline without a browser.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::fetch::{PageFetcher, RenderedPage, ResourceBlockPolicy};

/// Serves canned documents keyed by URL fragment and records how often it
/// was called. URLs matching a registered failure fragment simulate a
/// navigation failure.
pub(crate) struct FakeFetcher {
    pages: Vec<(String, String)>,
    failures: Vec<String>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self {
            pages: Vec::new(),
            failures: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_page(mut self, url_fragment: &str, html: &str) -> Self {
        self.pages.push((url_fragment.to_string(), html.to_string()));
        self
    }

    pub(crate) fn with_failure(mut self, url_fragment: &str) -> Self {
        self.failures.push(url_fragment.to_string());
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(
        &self,
        url: &str,
        _policy: &ResourceBlockPolicy,
    ) -> Result<RenderedPage, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failures.iter().any(|fragment| url.contains(fragment)) {
            return Err(ScraperError::Fetch {
                url: url.to_string(),
                reason: "simulated navigation failure".to_string(),
            });
        }

        self.pages
            .iter()
            .find(|(fragment, _)| url.contains(fragment))
            .map(|(_, html)| RenderedPage {
                html: html.clone(),
                url: url.to_string(),
            })
            .ok_or_else(|| ScraperError::Fetch {
                url: url.to_string(),
                reason: "no canned page for url".to_string(),
            })
    }
}
